use chess::{Board, Color, MoveGen, Piece, Square, ALL_SQUARES, EMPTY};

use crate::board::{attackers_of, board_with_turn, defenders_of, king_square_of, pin_legal_attackers};
use crate::motifs::{HangingPiece, PieceAt, TrappedPiece};
use crate::values::{piece_value, KING_RAY_VALUE};

/// Pieces that are attacked and have no pin-legal defender. Defense counting
/// sees through stacked sliders, so a rook behind a rook still defends.
pub fn find_hanging(board: &Board) -> Vec<HangingPiece> {
    let mut hanging = Vec::new();

    for square in ALL_SQUARES {
        let Some(piece) = board.piece_on(square) else { continue };
        let Some(owner) = board.color_on(square) else { continue };
        if piece == Piece::King {
            continue;
        }
        if pin_legal_attackers(board, !owner, square).is_empty() {
            continue;
        }
        if !defenders_of(board, owner, square).is_empty() {
            continue;
        }
        hanging.push(HangingPiece {
            piece: PieceAt::new(square, piece),
            owner: owner.into(),
            color: (!owner).into(),
            can_retreat: can_retreat(board, square, owner),
            value: None,
        });
    }

    hanging
}

/// Whether the piece on `square` has at least one legal move once it is the
/// owner's turn. Degrades to `false` when the turn cannot be flipped.
fn can_retreat(board: &Board, square: Square, owner: Color) -> bool {
    let Some(position) = board_with_turn(board, owner) else {
        return false;
    };
    MoveGen::new_legal(&position).any(|m| m.get_source() == square)
}

/// Pieces stuck on a bad square whose every legal destination is just as bad.
/// A destination that wins at least the piece's own value back counts as an
/// escape. Kings and pawns are never reported, nor is anything while the
/// owner is in check or while the piece itself gives check.
pub fn find_trapped(board: &Board) -> Vec<TrappedPiece> {
    let mut trapped = Vec::new();

    for square in ALL_SQUARES {
        let Some(piece) = board.piece_on(square) else { continue };
        let Some(owner) = board.color_on(square) else { continue };
        if matches!(piece, Piece::Pawn | Piece::King) {
            continue;
        }
        if is_trapped(board, square, piece, owner) {
            trapped.push(TrappedPiece {
                piece: PieceAt::new(square, piece),
                owner: owner.into(),
                color: (!owner).into(),
                value: None,
            });
        }
    }

    trapped
}

fn is_trapped(board: &Board, square: Square, piece: Piece, owner: Color) -> bool {
    let value = piece_value(piece, KING_RAY_VALUE);
    if !in_bad_spot(board, square, value, owner) {
        return false;
    }
    let Some(position) = board_with_turn(board, owner) else {
        return false;
    };
    if *position.checkers() != EMPTY {
        return false;
    }
    if gives_check(&position, square, owner) {
        return false;
    }

    for escape in MoveGen::new_legal(&position).filter(|m| m.get_source() == square) {
        let destination = escape.get_dest();
        if let Some(captured) = position.piece_on(destination) {
            if piece_value(captured, KING_RAY_VALUE) >= value {
                return false;
            }
        }
        let after = position.make_move_new(escape);
        if !in_bad_spot(&after, destination, value, owner) {
            return false;
        }
    }
    true
}

/// A square is bad for a piece of `value` when the piece would hang there or
/// a strictly cheaper enemy piece could take it.
fn in_bad_spot(board: &Board, square: Square, value: i32, owner: Color) -> bool {
    let attackers = pin_legal_attackers(board, !owner, square);
    if attackers.is_empty() {
        return false;
    }
    if defenders_of(board, owner, square).is_empty() {
        return true;
    }
    attackers
        .iter()
        .any(|&(_, attacker)| piece_value(attacker, KING_RAY_VALUE) < value)
}

fn gives_check(position: &Board, square: Square, owner: Color) -> bool {
    match king_square_of(position, !owner) {
        Some(king) => {
            attackers_of(position, owner, king) & chess::BitBoard::from_square(square) != EMPTY
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board_from_fen;
    use crate::motifs::Side;

    fn board(fen: &str) -> Board {
        board_from_fen(fen).unwrap()
    }

    #[test]
    fn test_undefended_attacked_knight_hangs() {
        // The e4 pawn attacks the undefended knight on d5.
        let found = find_hanging(&board("4k3/8/8/3n4/4P3/8/8/4K3 w - - 0 1"));
        assert_eq!(found.len(), 1);
        let hanging = &found[0];
        assert_eq!(hanging.piece.square.to_square(), Square::D5);
        assert_eq!(hanging.owner, Side::Black);
        assert_eq!(hanging.color, Side::White);
        assert!(hanging.can_retreat);
    }

    #[test]
    fn test_defended_piece_does_not_hang() {
        let found = find_hanging(&board("4k3/8/2p5/3n4/4P3/8/8/4K3 w - - 0 1"));
        assert!(found.is_empty());
    }

    #[test]
    fn test_unattacked_piece_does_not_hang() {
        let found = find_hanging(&board("4k3/8/8/3n4/8/8/8/4K3 w - - 0 1"));
        assert!(found.is_empty());
    }

    #[test]
    fn test_pinned_defender_leaves_piece_hanging() {
        // The rook on e7 is pinned to the e-file and cannot recapture on c7,
        // so the bishop there hangs to the knight. The white rook on e2 also
        // hangs: the pinned rook may still capture along its ray.
        let found = find_hanging(&board("4k3/2b1r3/8/1N6/8/8/4R3/2K5 w - - 0 1"));
        assert_eq!(found.len(), 2);
        assert!(found
            .iter()
            .any(|h| h.piece.square.to_square() == Square::C7 && h.owner == Side::Black));
        assert!(found
            .iter()
            .any(|h| h.piece.square.to_square() == Square::E2 && h.owner == Side::White));
    }

    #[test]
    fn test_cornered_rook_cannot_retreat() {
        // Rook a8 is boxed in by its own pawn and knight and hit by the
        // fianchettoed bishop.
        let found = find_hanging(&board("rn2k3/p7/8/8/8/8/6B1/4K3 w - - 0 1"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].piece.square.to_square(), Square::A8);
        assert!(!found[0].can_retreat);
    }

    #[test]
    fn test_bishop_trapped_in_corner() {
        // Bishop h7 is attacked by the king; both g8 and the g6 pawn grab
        // leave it attacked and undefended.
        let found = find_trapped(&board("8/6kB/6p1/8/8/8/8/4K3 w - - 0 1"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].piece.square.to_square(), Square::H7);
        assert_eq!(found[0].owner, Side::White);
        assert_eq!(found[0].color, Side::Black);
    }

    #[test]
    fn test_open_diagonal_is_an_escape() {
        // Without the g6 pawn the bishop slips away via f5.
        let found = find_trapped(&board("8/6kB/8/8/8/8/8/4K3 w - - 0 1"));
        assert!(found.is_empty());
    }

    #[test]
    fn test_capturing_equal_or_better_is_an_escape() {
        // Bxg8 wins a rook for the bishop, so the bishop is not trapped.
        let found = find_trapped(&board("6r1/6kB/6p1/8/8/8/8/4K3 w - - 0 1"));
        assert!(found.is_empty());
    }
}
