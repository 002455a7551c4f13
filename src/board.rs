use chess::{BitBoard, Board, Color, Piece, Square, EMPTY};
use std::str::FromStr;

use crate::error::AnalysisError;

/// Parses a FEN string into a position snapshot.
pub fn board_from_fen(fen: &str) -> Result<Board, AnalysisError> {
    Board::from_str(fen).map_err(|e| AnalysisError::InvalidFen(e.to_string()))
}

/// King square of `color`, or `None` when that side has no king. Every
/// king-relative computation degrades to empty/zero through this lookup
/// instead of failing.
pub fn king_square_of(board: &Board, color: Color) -> Option<Square> {
    let kings = *board.pieces(Piece::King) & *board.color_combined(color);
    if kings == EMPTY {
        None
    } else {
        Some(kings.to_square())
    }
}

/// All pieces of `color` attacking `target` under the given occupancy.
/// Passing a reduced occupancy reveals sliders that attack through squares
/// already vacated, which is how SEE and the defender count see x-rays.
pub fn attackers_with_occupancy(
    board: &Board,
    color: Color,
    target: Square,
    occupied: BitBoard,
) -> BitBoard {
    let rooks = *board.pieces(Piece::Rook) | *board.pieces(Piece::Queen);
    let bishops = *board.pieces(Piece::Bishop) | *board.pieces(Piece::Queen);

    let mut attackers = chess::get_rook_moves(target, occupied) & rooks;
    attackers |= chess::get_bishop_moves(target, occupied) & bishops;
    attackers |= chess::get_knight_moves(target) & *board.pieces(Piece::Knight);
    attackers |= chess::get_king_moves(target) & *board.pieces(Piece::King);
    attackers |= chess::get_pawn_attacks(target, !color, *board.pieces(Piece::Pawn));

    attackers & *board.color_combined(color) & occupied
}

/// All pieces of `color` attacking `target` in the current position.
pub fn attackers_of(board: &Board, color: Color, target: Square) -> BitBoard {
    attackers_with_occupancy(board, color, target, *board.combined())
}

/// Squares the piece on `square` attacks under the current occupancy,
/// regardless of what stands on them.
pub fn attack_squares(board: &Board, square: Square, piece: Piece, color: Color) -> BitBoard {
    let occupied = *board.combined();
    match piece {
        Piece::Pawn => chess::get_pawn_attacks(square, color, !EMPTY),
        Piece::Knight => chess::get_knight_moves(square),
        Piece::Bishop => chess::get_bishop_moves(square, occupied),
        Piece::Rook => chess::get_rook_moves(square, occupied),
        Piece::Queen => {
            chess::get_bishop_moves(square, occupied) | chess::get_rook_moves(square, occupied)
        }
        Piece::King => chess::get_king_moves(square),
    }
}

/// If the piece on `square` is absolutely pinned, returns the set of squares
/// it may still legally occupy: the squares between its king and the pinner,
/// plus the pinner's square itself.
pub fn absolute_pin_ray(board: &Board, square: Square) -> Option<BitBoard> {
    let color = board.color_on(square)?;
    let king = king_square_of(board, color)?;
    if king == square || chess::line(king, square) == EMPTY {
        return None;
    }
    // the candidate must be the only piece between its king and the pinner
    if chess::between(king, square) & *board.combined() != EMPTY {
        return None;
    }

    let occupied = *board.combined() ^ BitBoard::from_square(square);
    let on_file_or_rank =
        king.get_rank() == square.get_rank() || king.get_file() == square.get_file();
    let (reach, sliders) = if on_file_or_rank {
        (
            chess::get_rook_moves(king, occupied),
            *board.pieces(Piece::Rook) | *board.pieces(Piece::Queen),
        )
    } else {
        (
            chess::get_bishop_moves(king, occupied),
            *board.pieces(Piece::Bishop) | *board.pieces(Piece::Queen),
        )
    };

    let mut pinners =
        reach & sliders & *board.color_combined(!color) & chess::line(king, square);
    // a slider on the far side of the king checks, it does not pin
    pinners
        .find(|&pinner| chess::between(king, pinner) & BitBoard::from_square(square) != EMPTY)
        .map(|pinner| {
            (chess::between(king, pinner) | BitBoard::from_square(pinner))
                & !BitBoard::from_square(square)
        })
}

/// Whether the piece on `from` may bear on `to` despite any absolute pin.
/// A piece pinned to its king may only act along the pin ray.
pub fn pin_legal_on(board: &Board, from: Square, to: Square) -> bool {
    match absolute_pin_ray(board, from) {
        Some(ray) => ray & BitBoard::from_square(to) != EMPTY,
        None => true,
    }
}

/// Pin-legal attackers of `color` on `target`, as (square, piece) pairs in a
/// deterministic order.
pub fn pin_legal_attackers(board: &Board, color: Color, target: Square) -> Vec<(Square, Piece)> {
    let mut out = Vec::new();
    for sq in attackers_of(board, color, target) {
        if let Some(piece) = board.piece_on(sq) {
            if pin_legal_on(board, sq, target) {
                out.push((sq, piece));
            }
        }
    }
    out
}

/// Defenders of `target` for `color`, counting x-ray defense through stacked
/// sliders and excluding absolutely pinned pieces that cannot legally
/// recapture there.
pub fn defenders_of(board: &Board, color: Color, target: Square) -> Vec<(Square, Piece)> {
    let mut defenders = Vec::new();
    let mut occupied = *board.combined();
    let mut seen = EMPTY;

    loop {
        let fresh = attackers_with_occupancy(board, color, target, occupied) & !seen;
        if fresh == EMPTY {
            break;
        }
        let mut opened_ray = false;
        for sq in fresh {
            seen |= BitBoard::from_square(sq);
            let Some(piece) = board.piece_on(sq) else { continue };
            if pin_legal_on(board, sq, target) {
                defenders.push((sq, piece));
            }
            // a sliding defender shields further sliders stacked behind it
            if matches!(piece, Piece::Bishop | Piece::Rook | Piece::Queen) {
                occupied ^= BitBoard::from_square(sq);
                opened_ray = true;
            }
        }
        if !opened_ray {
            break;
        }
    }

    defenders.sort_by_key(|&(sq, _)| sq.to_index());
    defenders
}

/// A board in which it is `color`'s turn, flipping the side to move with a
/// null move when necessary. Returns `None` when the flip would be illegal
/// (the current mover is in check), in which case the perspective-dependent
/// computation is skipped rather than run on an inconsistent position.
pub fn board_with_turn(board: &Board, color: Color) -> Option<Board> {
    if board.side_to_move() == color {
        Some(*board)
    } else {
        board.null_move()
    }
}
