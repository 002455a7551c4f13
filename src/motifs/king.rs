use chess::{
    BitBoard, Board, BoardStatus, Color, MoveGen, Piece, Rank, Square, ALL_COLORS, EMPTY,
};
use serde::{Deserialize, Serialize};

use crate::board::{attack_squares, attackers_of, board_with_turn, king_square_of};
use crate::motifs::{BackRankWeakness, DoubleCheck, ExposedKing, MateThreat, PieceAt};

/// Danger score at or above which an `ExposedKing` motif is emitted.
pub const EXPOSED_KING_THRESHOLD: i32 = 100;

/// Raw inputs to the king danger score, kept alongside the scalar so
/// downstream consumers can explain it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KingDangerComponents {
    /// Enemy non-pawn attacks landing in the king ring.
    pub zone_attacks: u32,
    /// Ring squares the enemy attacks and no friendly pawn covers.
    pub weak_squares: u32,
    /// Checking moves to unguarded squares, indexed by piece kind.
    pub safe_checks: [u32; 6],
    pub pawn_storm: u32,
    pub pawn_shelter: u32,
    pub knight_defender: bool,
    /// True when the attacking side has no queen.
    pub queen_absent: bool,
}

impl KingDangerComponents {
    /// Hand-tuned weighted sum. Monotonic in each component; a scalar, not a
    /// probability.
    pub fn score(&self) -> i32 {
        let checks: u32 = self.safe_checks.iter().sum();
        20 * self.zone_attacks as i32
            + 30 * self.weak_squares as i32
            + 25 * checks as i32
            + 15 * self.pawn_storm as i32
            - 20 * self.pawn_shelter as i32
            - 40 * i32::from(self.knight_defender)
            - 200 * i32::from(self.queen_absent)
    }
}

/// Danger assessment for the king of `owner`, or `None` when that side has
/// no king on the board.
pub fn king_danger(board: &Board, owner: Color) -> Option<(i32, KingDangerComponents)> {
    let king = king_square_of(board, owner)?;
    let enemy = !owner;
    let ring = chess::get_king_moves(king) | BitBoard::from_square(king);

    let mut components = KingDangerComponents::default();

    for square in *board.color_combined(enemy) {
        let Some(piece) = board.piece_on(square) else { continue };
        if piece == Piece::Pawn {
            continue;
        }
        components.zone_attacks += (attack_squares(board, square, piece, enemy) & ring).popcnt();
    }

    let own_pawns = *board.pieces(Piece::Pawn) & *board.color_combined(owner);
    for square in ring {
        if attackers_of(board, enemy, square) == EMPTY {
            continue;
        }
        if chess::get_pawn_attacks(square, enemy, own_pawns) == EMPTY {
            components.weak_squares += 1;
        }
    }

    components.safe_checks = safe_checks(board, owner);

    let king_file = king.get_file();
    let band = chess::get_file(king_file) | chess::get_adjacent_files(king_file);
    let king_rank = king.get_rank().to_index() as i32;

    let enemy_pawns = *board.pieces(Piece::Pawn) & *board.color_combined(enemy);
    for pawn in enemy_pawns & band {
        let distance = (pawn.get_rank().to_index() as i32 - king_rank).abs();
        if (1..=4).contains(&distance) {
            components.pawn_storm += (5 - distance) as u32;
        }
    }

    let shelter_rank = match owner {
        Color::White => king_rank + 1,
        Color::Black => king_rank - 1,
    };
    if (0..8).contains(&shelter_rank) {
        let shelter = chess::get_rank(Rank::from_index(shelter_rank as usize)) & band;
        components.pawn_shelter = (own_pawns & shelter).popcnt();
    }

    let own_knights = *board.pieces(Piece::Knight) & *board.color_combined(owner);
    components.knight_defender = own_knights & ring != EMPTY;
    components.queen_absent =
        *board.pieces(Piece::Queen) & *board.color_combined(enemy) == EMPTY;

    Some((components.score(), components))
}

/// Checking moves per attacking piece kind whose destination the defender
/// does not attack. Uses a perspective flip when it is the defender's turn;
/// degrades to zero when the flip is illegal.
fn safe_checks(board: &Board, owner: Color) -> [u32; 6] {
    let mut counts = [0u32; 6];
    let Some(position) = board_with_turn(board, !owner) else {
        return counts;
    };
    for m in MoveGen::new_legal(&position) {
        let after = position.make_move_new(m);
        if *after.checkers() == EMPTY {
            continue;
        }
        if attackers_of(board, owner, m.get_dest()) != EMPTY {
            continue;
        }
        if let Some(piece) = position.piece_on(m.get_source()) {
            counts[piece.to_index()] += 1;
        }
    }
    counts
}

/// Emits an `ExposedKing` for every king whose danger score reaches the
/// threshold.
pub fn find_exposed_kings(board: &Board) -> Vec<ExposedKing> {
    let mut exposed = Vec::new();
    for owner in ALL_COLORS {
        let Some(king) = king_square_of(board, owner) else { continue };
        let Some((score, components)) = king_danger(board, owner) else { continue };
        if score >= EXPOSED_KING_THRESHOLD {
            exposed.push(ExposedKing {
                king: king.into(),
                owner: owner.into(),
                color: (!owner).into(),
                score,
                components,
            });
        }
    }
    exposed
}

/// A king stuck on its home rank with no flight square, while an enemy heavy
/// piece can land on that rank with an unanswerable check.
pub fn find_back_rank_weaknesses(board: &Board) -> Vec<BackRankWeakness> {
    let mut weaknesses = Vec::new();

    for owner in ALL_COLORS {
        let Some(king) = king_square_of(board, owner) else { continue };
        let home = match owner {
            Color::White => Rank::First,
            Color::Black => Rank::Eighth,
        };
        if king.get_rank() != home {
            continue;
        }
        if has_flight_off_rank(board, king, owner, home) {
            continue;
        }
        if let Some(invader) = back_rank_invader(board, king, owner, home) {
            weaknesses.push(BackRankWeakness {
                king: king.into(),
                owner: owner.into(),
                color: (!owner).into(),
                invader,
            });
        }
    }

    weaknesses
}

fn has_flight_off_rank(board: &Board, king: Square, owner: Color, home: Rank) -> bool {
    for dest in chess::get_king_moves(king) {
        if dest.get_rank() == home {
            // an invader on the home rank covers these once the king steps
            continue;
        }
        if *board.color_combined(owner) & BitBoard::from_square(dest) != EMPTY {
            continue;
        }
        if attackers_of(board, !owner, dest) != EMPTY {
            continue;
        }
        return true;
    }
    false
}

/// First enemy rook or queen that can reach the home rank along clear lines
/// and check the king from an unguarded square.
fn back_rank_invader(board: &Board, king: Square, owner: Color, home: Rank) -> Option<PieceAt> {
    let occupied = *board.combined();
    let heavies = (*board.pieces(Piece::Rook) | *board.pieces(Piece::Queen))
        & *board.color_combined(!owner);
    let rank_squares = chess::get_rank(home);

    for square in heavies {
        let reach = chess::get_rook_moves(square, occupied) & rank_squares;
        for landing in reach {
            if landing == king {
                continue;
            }
            // cannot land on a friend of the invader
            if board.color_on(landing) == Some(!owner) {
                continue;
            }
            if chess::between(landing, king) & occupied != EMPTY {
                continue;
            }
            if attackers_of(board, owner, landing) != EMPTY {
                continue;
            }
            let piece = board.piece_on(square)?;
            return Some(PieceAt::new(square, piece));
        }
    }
    None
}

/// Both checkers of a double check; only the side to move can be in check in
/// a legal snapshot.
pub fn find_double_checks(board: &Board) -> Vec<DoubleCheck> {
    let checkers = *board.checkers();
    if checkers.popcnt() < 2 {
        return Vec::new();
    }
    let owner = board.side_to_move();
    let Some(king) = king_square_of(board, owner) else {
        return Vec::new();
    };
    let mut pieces = Vec::new();
    for square in checkers {
        if let Some(piece) = board.piece_on(square) {
            pieces.push(PieceAt::new(square, piece));
        }
    }
    vec![DoubleCheck {
        color: (!owner).into(),
        king: king.into(),
        checkers: pieces,
    }]
}

/// Every mate-in-one move available to either side, flipping the turn with a
/// null move where legal.
pub fn find_mate_threats(board: &Board) -> Vec<MateThreat> {
    let mut threats = Vec::new();
    for color in ALL_COLORS {
        let Some(position) = board_with_turn(board, color) else { continue };
        for m in MoveGen::new_legal(&position) {
            if position.make_move_new(m).status() == BoardStatus::Checkmate {
                threats.push(MateThreat {
                    color: color.into(),
                    from: m.get_source().into(),
                    to: m.get_dest().into(),
                });
            }
        }
    }
    threats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board_from_fen;
    use crate::motifs::{PieceKind, Side};
    use pretty_assertions::assert_eq;

    fn board(fen: &str) -> Board {
        board_from_fen(fen).unwrap()
    }

    #[test]
    fn test_safe_check_components() {
        // Lone rook against a cornered king: Rb8+ and Rh1+ both check from
        // unguarded squares; everything else is quiet.
        let b = board("7k/8/8/8/8/8/8/KR6 w - - 0 1");
        let (score, components) = king_danger(&b, Color::Black).unwrap();
        assert_eq!(
            components,
            KingDangerComponents {
                zone_attacks: 0,
                weak_squares: 0,
                safe_checks: [0, 0, 0, 2, 0, 0],
                pawn_storm: 0,
                pawn_shelter: 0,
                knight_defender: false,
                queen_absent: true,
            }
        );
        assert_eq!(score, 25 * 2 - 200);
    }

    #[test]
    fn test_storm_and_shelter() {
        let b = board("6k1/5ppp/8/6PP/8/8/8/K7 w - - 0 1");
        let (score, components) = king_danger(&b, Color::Black).unwrap();
        assert_eq!(components.pawn_storm, 4);
        assert_eq!(components.pawn_shelter, 3);
        assert_eq!(score, 15 * 4 - 20 * 3 - 200);
    }

    #[test]
    fn test_knight_defender() {
        let b = board("5nk1/8/8/8/8/8/8/K7 w - - 0 1");
        let (_, components) = king_danger(&b, Color::Black).unwrap();
        assert!(components.knight_defender);
    }

    #[test]
    fn test_exposed_king_emitted() {
        // Queen parked next to the bare king: ring attacks and weak squares
        // alone cross the threshold.
        let b = board("7k/8/8/6Q1/8/8/8/K7 w - - 0 1");
        let exposed = find_exposed_kings(&b);
        assert_eq!(exposed.len(), 1);
        let motif = &exposed[0];
        assert_eq!(motif.owner, Side::Black);
        assert_eq!(motif.color, Side::White);
        assert!(motif.score >= EXPOSED_KING_THRESHOLD);
        assert_eq!(motif.components.zone_attacks, 2);
        assert_eq!(motif.components.weak_squares, 2);
    }

    #[test]
    fn test_quiet_position_has_no_exposed_king() {
        let b = board("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert!(find_exposed_kings(&b).is_empty());
    }

    #[test]
    fn test_back_rank_weakness() {
        // Black king boxed behind f7/g7/h7 with a white rook free to land on
        // the eighth rank.
        let b = board("6k1/5ppp/8/8/8/8/8/4R2K w - - 0 1");
        let weaknesses = find_back_rank_weaknesses(&b);
        assert_eq!(weaknesses.len(), 1);
        let motif = &weaknesses[0];
        assert_eq!(motif.owner, Side::Black);
        assert_eq!(motif.color, Side::White);
        assert_eq!(motif.invader.square.to_square(), Square::E1);
        assert_eq!(motif.invader.kind, PieceKind::Rook);
    }

    #[test]
    fn test_on_rank_flight_is_no_escape() {
        // h8 looks open next to the king, but the rook checks along the
        // rank and keeps attacking through the vacated square: Re8 is mate,
        // so the weakness stands.
        let b = board("6k1/5ppp/8/8/8/8/8/4R2K w - - 0 1");
        let threats = find_mate_threats(&b);
        assert_eq!(threats.len(), 1);
        assert_eq!(threats[0].to.to_square(), Square::E8);
        assert_eq!(find_back_rank_weaknesses(&b).len(), 1);
    }

    #[test]
    fn test_luft_defuses_back_rank() {
        // g7 is open: the king has a flight square.
        let b = board("6k1/5p1p/8/8/8/8/8/4R2K w - - 0 1");
        assert!(find_back_rank_weaknesses(&b).is_empty());
    }

    #[test]
    fn test_double_check() {
        let b = board("4k3/8/5N2/8/8/8/8/4RK2 b - - 0 1");
        let found = find_double_checks(&b);
        assert_eq!(found.len(), 1);
        let motif = &found[0];
        assert_eq!(motif.color, Side::White);
        assert_eq!(motif.king.to_square(), Square::E8);
        assert_eq!(motif.checkers.len(), 2);
    }

    #[test]
    fn test_single_check_is_not_double() {
        let b = board("4k3/8/8/8/8/8/8/4RK2 b - - 0 1");
        assert!(find_double_checks(&b).is_empty());
    }

    #[test]
    fn test_mate_threat_scan() {
        // Ra8 is mate against the boxed-in king; no other move mates.
        let b = board("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
        let threats = find_mate_threats(&b);
        assert_eq!(threats.len(), 1);
        let threat = &threats[0];
        assert_eq!(threat.color, Side::White);
        assert_eq!(threat.from.to_square(), Square::A1);
        assert_eq!(threat.to.to_square(), Square::A8);
    }

    #[test]
    fn test_no_mate_threat_in_quiet_position() {
        let b = board("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert!(find_mate_threats(&b).is_empty());
    }
}
