use chess::{BitBoard, Board, Color, Piece, Square, ALL_PIECES, EMPTY};

use crate::board::{attackers_with_occupancy, pin_legal_on};
use crate::values::{piece_value, KING_EXCHANGE_VALUE};

/// Static exchange evaluation of the capture sequence on `target`, started by
/// `attacking_color`, in signed centipawns for that side.
///
/// Simulates least-valuable-attacker-first captures on a private occupancy
/// copy, revealing stacked sliders as pieces leave their squares, then
/// back-propagates each side's option to stand pat. The caller's board is
/// never mutated. An empty target evaluates to 0, as does a target with no
/// pin-legal attacker.
///
/// Known approximation: a pawn capturing on the last rank keeps pawn value,
/// and non-capturing interpositions are not modeled.
pub fn see(board: &Board, target: Square, attacking_color: Color) -> i32 {
    let Some(victim) = board.piece_on(target) else {
        return 0;
    };

    let mut occupied = *board.combined() & !BitBoard::from_square(target);
    let mut side = attacking_color;
    // value of whatever currently stands on the target square
    let mut on_target = piece_value(victim, KING_EXCHANGE_VALUE);
    let mut gains: Vec<i32> = Vec::with_capacity(32);

    loop {
        let Some((square, piece)) = least_valuable_attacker(board, occupied, side, target) else {
            break;
        };
        // The king may only join the exchange when it cannot be recaptured.
        if piece == Piece::King {
            let after = occupied & !BitBoard::from_square(square);
            if attackers_with_occupancy(board, !side, target, after) != EMPTY {
                break;
            }
        }
        let gain = match gains.last() {
            Some(previous) => on_target - previous,
            None => on_target,
        };
        gains.push(gain);
        on_target = piece_value(piece, KING_EXCHANGE_VALUE);
        occupied &= !BitBoard::from_square(square);
        side = !side;
    }

    if gains.is_empty() {
        return 0;
    }

    // Each side stops capturing as soon as continuing would lose material.
    for d in (1..gains.len()).rev() {
        gains[d - 1] = -std::cmp::max(-gains[d - 1], gains[d]);
    }
    gains[0]
}

/// Least valuable pin-legal attacker of `side` on `target` still present in
/// `occupied`. Absolute pins are taken from the original position; a pinned
/// piece whose ray does not cover the target never joins the exchange.
fn least_valuable_attacker(
    board: &Board,
    occupied: BitBoard,
    side: Color,
    target: Square,
) -> Option<(Square, Piece)> {
    let attackers = attackers_with_occupancy(board, side, target, occupied);
    if attackers == EMPTY {
        return None;
    }
    for piece in ALL_PIECES {
        for square in attackers & *board.pieces(piece) {
            if pin_legal_on(board, square, target) {
                return Some((square, piece));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board_from_fen;
    use crate::values::{BISHOP_VALUE, KNIGHT_VALUE, PAWN_VALUE, QUEEN_VALUE, ROOK_VALUE};

    fn board(fen: &str) -> Board {
        board_from_fen(fen).unwrap()
    }

    #[test]
    fn test_empty_target_is_zero() {
        let b = board("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        assert_eq!(see(&b, Square::D4, Color::White), 0);
    }

    #[test]
    fn test_no_attacker_is_zero() {
        let b = board("4k3/8/8/3n4/8/8/8/R3K3 w - - 0 1");
        assert_eq!(see(&b, Square::D5, Color::White), 0);
    }

    #[test]
    fn test_undefended_piece_is_full_value() {
        // Ra1 takes the undefended knight on a5.
        let b = board("4k3/8/8/n7/8/8/8/R3K3 w - - 0 1");
        assert_eq!(see(&b, Square::A5, Color::White), KNIGHT_VALUE);
    }

    #[test]
    fn test_equal_defended_exchange_is_zero() {
        // RxR, RxR: rook for rook.
        let b = board("4k3/r7/8/r7/8/8/8/R3K3 w - - 0 1");
        assert_eq!(see(&b, Square::A5, Color::White), 0);
    }

    #[test]
    fn test_losing_exchange_is_negative() {
        // Queen takes a pawn defended by a pawn: wins 100, loses 900.
        let b = board("4k3/2p5/3p4/8/8/8/3Q4/4K3 w - - 0 1");
        assert_eq!(see(&b, Square::D6, Color::White), PAWN_VALUE - QUEEN_VALUE);
    }

    #[test]
    fn test_pawn_takes_defended_bishop() {
        // Pawn takes bishop, rook recaptures the pawn: +300 - 100.
        let b = board("4k3/8/3r4/3b4/4P3/8/8/4K3 w - - 0 1");
        assert_eq!(see(&b, Square::D5, Color::White), BISHOP_VALUE - PAWN_VALUE);
    }

    #[test]
    fn test_xray_attacker_joins() {
        // Doubled rooks against a singly defended rook: RxR, RxR, RxR nets
        // a full rook.
        let b = board("4k3/3r4/8/3r4/8/8/3R4/3RK3 w - - 0 1");
        assert_eq!(see(&b, Square::D5, Color::White), ROOK_VALUE);
    }

    #[test]
    fn test_pinned_defender_cannot_recapture() {
        // The black rook on e7 is pinned to its king by the rook on e2. It
        // may not recapture on c7, so the bishop there is free to take.
        let b = board("4k3/2b1r3/8/1N6/8/8/4R3/2K5 w - - 0 1");
        assert_eq!(see(&b, Square::C7, Color::White), BISHOP_VALUE);
    }

    #[test]
    fn test_check_from_behind_does_not_freeze_attacker() {
        // The e1 rook checks the king from behind the knight's file line;
        // the knight on e6 is not pinned and takes the loose d8 pawn.
        let b = board("k2p4/8/4N3/8/4K3/8/8/4r3 w - - 0 1");
        assert_eq!(see(&b, Square::D8, Color::White), PAWN_VALUE);
    }

    #[test]
    fn test_king_cannot_enter_defended_exchange() {
        // Kxe2 would walk into the rook on e8, so the sequence never starts.
        let b = board("4r1k1/8/8/8/8/8/4p3/4K3 w - - 0 1");
        assert_eq!(see(&b, Square::E2, Color::White), 0);
    }

    #[test]
    fn test_king_takes_undefended_pawn() {
        let b = board("6k1/8/8/8/8/8/4p3/4K3 w - - 0 1");
        assert_eq!(see(&b, Square::E2, Color::White), PAWN_VALUE);
    }

    #[test]
    fn test_see_does_not_mutate_board() {
        let b = board("4k3/3r4/8/3b4/4P3/8/8/4K3 w - - 0 1");
        let before = b.to_string();
        let _ = see(&b, Square::D5, Color::White);
        assert_eq!(b.to_string(), before);
    }

    #[test]
    fn test_stand_pat_stops_bad_continuation() {
        // NxB is answered by a pawn recapture: 300 won, 300 lost, net 0.
        let b = board("4k3/2p5/3b4/8/4N3/8/8/4K3 w - - 0 1");
        assert_eq!(see(&b, Square::D6, Color::White), 0);
    }
}
