use chess::{Board, Piece, ALL_SQUARES};

use crate::board::{attack_squares, defenders_of, pin_legal_on};
use crate::motifs::{Fork, PieceAt, PieceKind, Pin};
use crate::values::{piece_value, KING_RAY_VALUE};

/// Finds every piece attacking two or more enemy targets where the opponent
/// cannot answer all threats with one move. Pawns only count as targets when
/// they hang; `pins` feeds the `is_pin_fork` tag.
pub fn find_forks(board: &Board, pins: &[Pin]) -> Vec<Fork> {
    let mut forks = Vec::new();

    for square in ALL_SQUARES {
        let Some(piece) = board.piece_on(square) else { continue };
        let Some(color) = board.color_on(square) else { continue };

        let mut targets = Vec::new();
        let reach = attack_squares(board, square, piece, color) & *board.color_combined(!color);
        for target in reach {
            let Some(victim) = board.piece_on(target) else { continue };
            if !pin_legal_on(board, square, target) {
                continue;
            }
            // pawns are only worth forking when nobody guards them
            if victim == Piece::Pawn && !defenders_of(board, !color, target).is_empty() {
                continue;
            }
            targets.push(PieceAt::new(target, victim));
        }
        if targets.len() < 2 {
            continue;
        }

        let has_king = targets.iter().any(|t| t.kind == PieceKind::King);
        let max_target_value = targets
            .iter()
            .map(|t| piece_value(t.kind.to_piece(), KING_RAY_VALUE))
            .max()
            .unwrap_or(0);

        // Forced concession: a heavy piece prodding cheaper ones is not a
        // fork, because capturing the forker answers every threat at once.
        let forced = has_king
            || piece == Piece::King
            || piece_value(piece, KING_RAY_VALUE) <= max_target_value;
        if !forced {
            continue;
        }

        let has_queen = targets.iter().any(|t| t.kind == PieceKind::Queen);
        let is_pin_fork = pins.iter().any(|pin| {
            pin.pinner.square.to_square() == square
                && targets.iter().any(|t| t.square == pin.pinned.square)
        });

        forks.push(Fork {
            forker: PieceAt::new(square, piece),
            targets,
            is_check_fork: has_king,
            is_royal_fork: has_king && has_queen,
            is_pin_fork,
            color: color.into(),
            value: None,
        });
    }

    forks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board_from_fen;
    use crate::motifs::rays::classify_rays;
    use crate::motifs::Side;
    use chess::Square;

    fn forks(fen: &str) -> Vec<Fork> {
        let board = board_from_fen(fen).unwrap();
        let rays = classify_rays(&board);
        find_forks(&board, &rays.pins)
    }

    #[test]
    fn test_knight_forks_king_and_rook() {
        // Nc6 hits the king on e7 and the rook on d8.
        let found = forks("3r4/4k3/2N5/8/8/8/8/K7 b - - 0 1");
        assert_eq!(found.len(), 1);
        let fork = &found[0];
        assert_eq!(fork.forker.square.to_square(), Square::C6);
        assert_eq!(fork.color, Side::White);
        assert!(fork.is_check_fork);
        assert!(!fork.is_royal_fork);
        assert_eq!(fork.targets.len(), 2);
    }

    #[test]
    fn test_royal_fork() {
        let found = forks("3q4/4k3/2N5/8/8/8/8/K7 b - - 0 1");
        assert_eq!(found.len(), 1);
        assert!(found[0].is_check_fork);
        assert!(found[0].is_royal_fork);
    }

    #[test]
    fn test_queen_prodding_two_minors_is_no_fork() {
        // Qd5 "attacks" the knights on b7 and h5, but a queen threatening
        // cheaper pieces forces no concession, so it is filtered.
        let found = forks("4k3/1n6/8/3Q3n/8/8/8/4K3 w - - 0 1");
        assert!(found.is_empty());
    }

    #[test]
    fn test_pawn_fork() {
        // e4 pawn forks the knight on d5 and the bishop on f5.
        let found = forks("4k3/8/8/3n1b2/4P3/8/8/4K3 w - - 0 1");
        assert_eq!(found.len(), 1);
        let fork = &found[0];
        assert_eq!(fork.forker.square.to_square(), Square::E4);
        assert!(!fork.is_check_fork);
        assert_eq!(fork.targets.len(), 2);
    }

    #[test]
    fn test_defended_pawn_is_no_target() {
        // Nc6 hits the rook on d8 and the pawn on a7; the rook on a8 guards
        // the pawn, so only one real target remains.
        let found = forks("r2r4/p7/2N5/8/8/8/8/K3k3 w - - 0 1");
        assert!(found.iter().all(|f| f.forker.square.to_square() != Square::C6));
    }

    #[test]
    fn test_hanging_pawn_is_target() {
        // Same shape without the guard: pawn a7 hangs, so Nc6 forks it with
        // the rook on d8.
        let found = forks("3r3k/p7/2N5/8/8/8/8/K7 w - - 0 1");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].targets.len(), 2);
    }

    #[test]
    fn test_pin_fork_tag() {
        // Re1 pins the knight on e5 against the king while also attacking
        // the queen on a1 along the first rank.
        let found = forks("4k3/8/8/4n3/8/8/6K1/q3R3 w - - 0 1");
        assert_eq!(found.len(), 1);
        let fork = &found[0];
        assert_eq!(fork.forker.square.to_square(), Square::E1);
        assert!(fork.is_pin_fork);
        assert!(!fork.is_check_fork);
    }
}
