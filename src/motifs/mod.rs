pub mod forks;
pub mod hanging;
pub mod king;
pub mod mates;
pub mod overload;
pub mod rays;

use chess::{Color, File, Piece, Rank, Square};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Piece kind mirror with serde support; the rules engine's own type stays at
/// the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl From<Piece> for PieceKind {
    fn from(piece: Piece) -> Self {
        match piece {
            Piece::Pawn => PieceKind::Pawn,
            Piece::Knight => PieceKind::Knight,
            Piece::Bishop => PieceKind::Bishop,
            Piece::Rook => PieceKind::Rook,
            Piece::Queen => PieceKind::Queen,
            Piece::King => PieceKind::King,
        }
    }
}

impl PieceKind {
    pub fn to_piece(self) -> Piece {
        match self {
            PieceKind::Pawn => Piece::Pawn,
            PieceKind::Knight => Piece::Knight,
            PieceKind::Bishop => Piece::Bishop,
            PieceKind::Rook => Piece::Rook,
            PieceKind::Queen => Piece::Queen,
            PieceKind::King => Piece::King,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    White,
    Black,
}

impl From<Color> for Side {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }
}

impl Side {
    pub fn to_color(self) -> Color {
        match self {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

/// A board coordinate: file and rank indices 0–7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub file: u8,
    pub rank: u8,
}

impl From<Square> for Coord {
    fn from(square: Square) -> Self {
        Self {
            file: square.get_file().to_index() as u8,
            rank: square.get_rank().to_index() as u8,
        }
    }
}

impl Coord {
    pub fn to_square(self) -> Square {
        debug_assert!(self.file < 8 && self.rank < 8, "malformed coordinate {:?}", self);
        Square::make_square(
            Rank::from_index(self.rank as usize),
            File::from_index(self.file as usize),
        )
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_square())
    }
}

/// A piece standing on a square, as recorded inside a motif.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceAt {
    pub square: Coord,
    pub kind: PieceKind,
}

impl PieceAt {
    pub fn new(square: Square, piece: Piece) -> Self {
        Self {
            square: square.into(),
            kind: piece.into(),
        }
    }
}

/// Material judgement attached to motifs that support valuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TacticValue {
    /// Signed centipawns for the beneficiary.
    pub material_delta: i32,
    pub is_sound: bool,
    pub source: ValueSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    See,
    Heuristic,
}

impl TacticValue {
    pub fn from_see(material_delta: i32) -> Self {
        Self {
            material_delta,
            is_sound: material_delta > 0,
            source: ValueSource::See,
        }
    }

    pub fn heuristic(material_delta: i32) -> Self {
        Self {
            material_delta,
            is_sound: material_delta > 0,
            source: ValueSource::Heuristic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PinKind {
    /// The shielded piece is the king; the pinned piece cannot leave the ray.
    Absolute,
    /// Legal to move, but costly.
    Relative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub pinner: PieceAt,
    pub pinned: PieceAt,
    pub shielded: PieceAt,
    pub kind: PinKind,
    /// Beneficiary of the motif: the pinning side.
    pub color: Side,
    pub value: Option<TacticValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skewer {
    pub attacker: PieceAt,
    pub front: PieceAt,
    pub behind: PieceAt,
    /// True when the front piece is the enemy king.
    pub is_absolute: bool,
    pub color: Side,
    pub value: Option<TacticValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XRayAttack {
    pub attacker: PieceAt,
    pub through: PieceAt,
    pub target: PieceAt,
    pub color: Side,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XRayDefense {
    pub defender: PieceAt,
    /// The enemy piece the defense is projected through.
    pub through: PieceAt,
    pub protected: PieceAt,
    pub color: Side,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Significance {
    Check,
    Normal,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredAttack {
    pub attacker: PieceAt,
    /// Own piece whose departure would unveil the attack.
    pub blocker: PieceAt,
    pub target: PieceAt,
    pub significance: Significance,
    pub color: Side,
    pub value: Option<TacticValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fork {
    pub forker: PieceAt,
    pub targets: Vec<PieceAt>,
    pub is_check_fork: bool,
    pub is_royal_fork: bool,
    pub is_pin_fork: bool,
    pub color: Side,
    pub value: Option<TacticValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HangingPiece {
    pub piece: PieceAt,
    pub owner: Side,
    /// Beneficiary: the side that can win the piece.
    pub color: Side,
    pub can_retreat: bool,
    pub value: Option<TacticValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrappedPiece {
    pub piece: PieceAt,
    pub owner: Side,
    pub color: Side,
    pub value: Option<TacticValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyKind {
    /// Sole defender of an attacked friendly piece.
    DefendPiece,
    /// Sole cover of a pressured back-rank square.
    BackRankSquare,
    /// Sole cover of the square where a mate threat lands.
    MateBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duty {
    pub kind: DutyKind,
    pub square: Coord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverloadedPiece {
    pub piece: PieceAt,
    pub owner: Side,
    pub color: Side,
    pub duties: Vec<Duty>,
    pub value: Option<TacticValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturableDefender {
    pub defender: PieceAt,
    /// The piece whose defense collapses if the defender falls.
    pub charge: PieceAt,
    pub attacker: PieceAt,
    pub color: Side,
    pub value: Option<TacticValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackRankWeakness {
    pub king: Coord,
    pub owner: Side,
    /// Beneficiary: the invading side.
    pub color: Side,
    pub invader: PieceAt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposedKing {
    pub king: Coord,
    pub owner: Side,
    /// Beneficiary: the attacking side.
    pub color: Side,
    pub score: i32,
    pub components: king::KingDangerComponents,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MateThreat {
    /// Beneficiary: the side with mate in one.
    pub color: Side,
    pub from: Coord,
    pub to: Coord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatePatternKind {
    BackRank,
    Smothered,
    Anastasia,
    Arabian,
    Boden,
    Dovetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatePattern {
    pub pattern: MatePatternKind,
    /// Beneficiary: the mating side.
    pub color: Side,
    pub king: Coord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoubleCheck {
    /// Beneficiary: the checking side.
    pub color: Side,
    pub king: Coord,
    pub checkers: Vec<PieceAt>,
}

/// Identifies one motif inside a `TacticalMotifs` collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MotifId {
    pub kind: MotifKind,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotifKind {
    Pin,
    Fork,
    Skewer,
    XRayAttack,
    XRayDefense,
    DiscoveredAttack,
    HangingPiece,
    TrappedPiece,
    OverloadedPiece,
    CapturableDefender,
    BackRankWeakness,
    ExposedKing,
    MateThreat,
    MatePattern,
    DoubleCheck,
}

/// A cross-reference discovered by the chain pass: the attacking piece of
/// `dependent` stands on a square that another motif already compromises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotifChain {
    pub base: MotifId,
    pub dependent: MotifId,
    pub square: Coord,
}

/// How a square participates in a motif, for the reverse index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvolvementRole {
    Attacker,
    Target,
    Blocker,
    Defender,
    Shielded,
    King,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Involvement {
    pub motif: MotifId,
    pub role: InvolvementRole,
}

/// Every tactical fact derived from one position snapshot. Immutable once
/// built; the chain pass only appends to `chains`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TacticalMotifs {
    pub pins: Vec<Pin>,
    pub forks: Vec<Fork>,
    pub skewers: Vec<Skewer>,
    pub xray_attacks: Vec<XRayAttack>,
    pub xray_defenses: Vec<XRayDefense>,
    pub discovered_attacks: Vec<DiscoveredAttack>,
    pub hanging: Vec<HangingPiece>,
    pub trapped: Vec<TrappedPiece>,
    pub overloaded: Vec<OverloadedPiece>,
    pub capturable_defenders: Vec<CapturableDefender>,
    pub back_rank_weaknesses: Vec<BackRankWeakness>,
    pub exposed_kings: Vec<ExposedKing>,
    pub mate_threats: Vec<MateThreat>,
    pub mate_patterns: Vec<MatePattern>,
    pub double_checks: Vec<DoubleCheck>,
    pub chains: Vec<MotifChain>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_round_trip() {
        let coord: Coord = Square::E4.into();
        assert_eq!(coord, Coord { file: 4, rank: 3 });
        assert_eq!(coord.to_square(), Square::E4);
        assert_eq!(coord.to_string(), "e4");
    }

    #[test]
    fn test_tactic_value_soundness() {
        assert!(TacticValue::from_see(100).is_sound);
        assert!(!TacticValue::from_see(0).is_sound);
        assert!(!TacticValue::heuristic(-300).is_sound);
    }

    #[test]
    fn test_value_source_serialization() {
        let value = TacticValue::from_see(300);
        let json = serde_json::to_string(&value).unwrap();
        assert!(json.contains("\"see\""));
        let back: TacticValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_piece_kind_round_trip() {
        for piece in chess::ALL_PIECES {
            assert_eq!(PieceKind::from(piece).to_piece(), piece);
        }
    }
}
