use chess::{BitBoard, Board, BoardStatus, Color, Piece, Rank, Square, EMPTY};

use crate::board::{attack_squares, king_square_of};
use crate::motifs::{MatePattern, MatePatternKind};

/// Matches named checkmate shapes. Runs only on a confirmed checkmate; each
/// matcher is independent, so one position may carry several patterns.
pub fn find_mate_patterns(board: &Board) -> Vec<MatePattern> {
    if board.status() != BoardStatus::Checkmate {
        return Vec::new();
    }
    let mated = board.side_to_move();
    let Some(king) = king_square_of(board, mated) else {
        return Vec::new();
    };

    let mut patterns = Vec::new();
    let mut push = |kind: MatePatternKind| {
        patterns.push(MatePattern {
            pattern: kind,
            color: (!mated).into(),
            king: king.into(),
        });
    };

    if back_rank(board, king, mated) {
        push(MatePatternKind::BackRank);
    }
    if smothered(board, king, mated) {
        push(MatePatternKind::Smothered);
    }
    if anastasia(board, king, mated) {
        push(MatePatternKind::Anastasia);
    }
    if arabian(board, king, mated) {
        push(MatePatternKind::Arabian);
    }
    if boden(board, king, mated) {
        push(MatePatternKind::Boden);
    }
    if dovetail(board, king, mated) {
        push(MatePatternKind::Dovetail);
    }

    patterns
}

fn home_rank(color: Color) -> Rank {
    match color {
        Color::White => Rank::First,
        Color::Black => Rank::Eighth,
    }
}

fn single_checker(board: &Board, kind: Piece) -> Option<Square> {
    let checkers = *board.checkers();
    if checkers.popcnt() != 1 {
        return None;
    }
    let square = checkers.to_square();
    (board.piece_on(square) == Some(kind)).then_some(square)
}

fn heavy_checker(board: &Board) -> Option<Square> {
    single_checker(board, Piece::Rook).or_else(|| single_checker(board, Piece::Queen))
}

/// Heavy piece mates along the home rank while the king's forward flight
/// squares are blocked by its own pieces.
fn back_rank(board: &Board, king: Square, mated: Color) -> bool {
    let home = home_rank(mated);
    if king.get_rank() != home {
        return false;
    }
    let Some(checker) = heavy_checker(board) else {
        return false;
    };
    if checker.get_rank() != home {
        return false;
    }
    let own = *board.color_combined(mated);
    chess::get_king_moves(king)
        .filter(|d| d.get_rank() != home)
        .all(|d| own & BitBoard::from_square(d) != EMPTY)
}

/// Lone knight mates a king completely walled in by its own pieces.
fn smothered(board: &Board, king: Square, mated: Color) -> bool {
    if single_checker(board, Piece::Knight).is_none() {
        return false;
    }
    let own = *board.color_combined(mated);
    chess::get_king_moves(king).all(|d| own & BitBoard::from_square(d) != EMPTY)
}

/// Heavy piece mates down the edge file while a knight seals the two inward
/// flight squares.
fn anastasia(board: &Board, king: Square, mated: Color) -> bool {
    let file = king.get_file().to_index();
    if file != 0 && file != 7 {
        return false;
    }
    let Some(checker) = heavy_checker(board) else {
        return false;
    };
    if checker.get_file() != king.get_file() {
        return false;
    }
    mating_knight_coverage(board, king, mated, checker) >= 2
}

/// Flight squares that are empty, not the checker square, and attacked by a
/// mating-side knight.
fn mating_knight_coverage(board: &Board, king: Square, mated: Color, checker: Square) -> u32 {
    let knights = *board.pieces(Piece::Knight) & *board.color_combined(!mated);
    let mut sealed = EMPTY;
    for knight in knights {
        sealed |= chess::get_knight_moves(knight);
    }
    let flights =
        chess::get_king_moves(king) & !*board.combined() & !BitBoard::from_square(checker);
    (flights & sealed).popcnt()
}

/// Rook touching the cornered king, held by a knight.
fn arabian(board: &Board, king: Square, mated: Color) -> bool {
    const CORNERS: [Square; 4] = [Square::A1, Square::A8, Square::H1, Square::H8];
    if !CORNERS.contains(&king) {
        return false;
    }
    let Some(checker) = single_checker(board, Piece::Rook) else {
        return false;
    };
    if chess::get_king_moves(king) & BitBoard::from_square(checker) == EMPTY {
        return false;
    }
    let knights = *board.pieces(Piece::Knight) & *board.color_combined(!mated);
    knights
        .into_iter()
        .any(|n| chess::get_knight_moves(n) & BitBoard::from_square(checker) != EMPTY)
}

/// Two bishops mating on crossed diagonals.
fn boden(board: &Board, king: Square, mated: Color) -> bool {
    let Some(checker) = single_checker(board, Piece::Bishop) else {
        return false;
    };
    let bishops = *board.pieces(Piece::Bishop) & *board.color_combined(!mated);
    for bishop in bishops {
        if bishop == checker {
            continue;
        }
        let reach = attack_squares(board, bishop, Piece::Bishop, !mated);
        if reach & chess::get_king_moves(king) != EMPTY {
            return true;
        }
    }
    false
}

/// Queen mates on a diagonal touch while exactly two friendly pieces plug
/// the remaining flight squares.
fn dovetail(board: &Board, king: Square, mated: Color) -> bool {
    let Some(checker) = single_checker(board, Piece::Queen) else {
        return false;
    };
    if chess::get_king_moves(king) & BitBoard::from_square(checker) == EMPTY {
        return false;
    }
    if checker.get_file() == king.get_file() || checker.get_rank() == king.get_rank() {
        return false;
    }
    let own = *board.color_combined(mated);
    (chess::get_king_moves(king) & own).popcnt() == 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board_from_fen;
    use crate::motifs::Side;

    fn patterns(fen: &str) -> Vec<MatePatternKind> {
        find_mate_patterns(&board_from_fen(fen).unwrap())
            .into_iter()
            .map(|p| p.pattern)
            .collect()
    }

    #[test]
    fn test_not_checkmate_yields_nothing() {
        let b = board_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
        assert!(find_mate_patterns(&b).is_empty());
    }

    #[test]
    fn test_back_rank_mate() {
        let found = patterns("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
        assert_eq!(found, vec![MatePatternKind::BackRank]);
    }

    #[test]
    fn test_smothered_mate() {
        let found = patterns("6rk/5Npp/8/8/8/8/8/6K1 b - - 0 1");
        assert_eq!(found, vec![MatePatternKind::Smothered]);
    }

    #[test]
    fn test_anastasia_mate() {
        let found = patterns("8/4N1pk/8/8/8/8/8/K6R b - - 0 1");
        assert_eq!(found, vec![MatePatternKind::Anastasia]);
    }

    #[test]
    fn test_arabian_mate() {
        let found = patterns("7k/7R/5N2/8/8/8/8/K7 b - - 0 1");
        assert_eq!(found, vec![MatePatternKind::Arabian]);
    }

    #[test]
    fn test_boden_mate() {
        let found = patterns("2kr4/3p4/B7/8/5B2/8/8/4K3 b - - 0 1");
        assert_eq!(found, vec![MatePatternKind::Boden]);
    }

    #[test]
    fn test_dovetail_mate() {
        let found = patterns("8/8/6pp/7k/6Q1/7K/8/8 b - - 0 1");
        assert_eq!(found, vec![MatePatternKind::Dovetail]);
    }

    #[test]
    fn test_plain_mate_matches_no_pattern() {
        // Ladder mate with two rooks carries none of the named shapes.
        let found = patterns("R6k/1R6/8/8/8/8/8/K7 b - - 0 1");
        assert!(found.is_empty());
        let b = board_from_fen("R6k/1R6/8/8/8/8/8/K7 b - - 0 1").unwrap();
        assert_eq!(b.status(), BoardStatus::Checkmate);
    }

    #[test]
    fn test_pattern_reports_mating_side() {
        let found = find_mate_patterns(&board_from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap());
        assert_eq!(found[0].color, Side::White);
        assert_eq!(found[0].king.to_square(), Square::G8);
    }
}
