use chess::{Board, Color, Piece, Rank, Square, ALL_SQUARES, EMPTY};

use crate::board::{attackers_of, defenders_of, pin_legal_attackers};
use crate::motifs::{CapturableDefender, Duty, DutyKind, MateThreat, OverloadedPiece, PieceAt};
use crate::values::{piece_value, KING_RAY_VALUE, KNIGHT_VALUE};

/// Pieces that are the only cover for two or more duties at once: defending
/// an attacked friendly piece, covering a pressured back-rank square, or
/// covering the landing square of a mate threat.
pub fn find_overloaded(board: &Board, mate_threats: &[MateThreat]) -> Vec<OverloadedPiece> {
    let mut overloaded = Vec::new();

    for square in ALL_SQUARES {
        let Some(piece) = board.piece_on(square) else { continue };
        let Some(owner) = board.color_on(square) else { continue };

        let mut duties = Vec::new();

        for charge in *board.color_combined(owner) {
            if charge == square {
                continue;
            }
            if attackers_of(board, !owner, charge) == EMPTY {
                continue;
            }
            if sole_cover(board, owner, charge) == Some(square) {
                duties.push(Duty {
                    kind: DutyKind::DefendPiece,
                    square: charge.into(),
                });
            }
        }

        for landing in pressured_back_rank_squares(board, owner) {
            if sole_cover(board, owner, landing) == Some(square) {
                duties.push(Duty {
                    kind: DutyKind::BackRankSquare,
                    square: landing.into(),
                });
            }
        }

        for threat in mate_threats {
            if threat.color.to_color() == owner {
                continue;
            }
            let landing = threat.to.to_square();
            if duties.iter().any(|d| d.square == threat.to) {
                continue;
            }
            if sole_cover(board, owner, landing) == Some(square) {
                duties.push(Duty {
                    kind: DutyKind::MateBlock,
                    square: landing.into(),
                });
            }
        }

        if duties.len() >= 2 {
            overloaded.push(OverloadedPiece {
                piece: PieceAt::new(square, piece),
                owner: owner.into(),
                color: (!owner).into(),
                duties,
                value: None,
            });
        }
    }

    overloaded
}

/// The single pin-legal piece of `color` bearing on `target`, if exactly one.
fn sole_cover(board: &Board, color: Color, target: Square) -> Option<Square> {
    let covers = defenders_of(board, color, target);
    match covers.as_slice() {
        [(square, _)] => Some(*square),
        _ => None,
    }
}

/// Empty squares on `owner`'s home rank that an enemy rook or queen attacks.
fn pressured_back_rank_squares(board: &Board, owner: Color) -> Vec<Square> {
    let home = match owner {
        Color::White => Rank::First,
        Color::Black => Rank::Eighth,
    };
    let heavies =
        (*board.pieces(Piece::Rook) | *board.pieces(Piece::Queen)) & *board.color_combined(!owner);

    let mut squares = Vec::new();
    for landing in chess::get_rank(home) & !*board.combined() {
        if attackers_of(board, !owner, landing) & heavies != EMPTY {
            squares.push(landing);
        }
    }
    squares
}

/// Defenders the enemy can profitably remove: the piece sole-defends an
/// attacked friend worth at least a minor piece, and some enemy attacker of
/// no greater value can take it.
pub fn find_capturable_defenders(board: &Board) -> Vec<CapturableDefender> {
    let mut found = Vec::new();

    for square in ALL_SQUARES {
        let Some(piece) = board.piece_on(square) else { continue };
        let Some(owner) = board.color_on(square) else { continue };
        if piece == Piece::King {
            continue;
        }
        let defender_value = piece_value(piece, KING_RAY_VALUE);

        let Some((attacker_square, attacker_piece)) = pin_legal_attackers(board, !owner, square)
            .into_iter()
            .min_by_key(|&(_, p)| piece_value(p, KING_RAY_VALUE))
        else {
            continue;
        };
        if piece_value(attacker_piece, KING_RAY_VALUE) > defender_value {
            continue;
        }

        for charge in *board.color_combined(owner) {
            if charge == square {
                continue;
            }
            let Some(charge_piece) = board.piece_on(charge) else { continue };
            if charge_piece == Piece::King {
                continue;
            }
            if piece_value(charge_piece, KING_RAY_VALUE) < KNIGHT_VALUE {
                continue;
            }
            if attackers_of(board, !owner, charge) == EMPTY {
                continue;
            }
            if sole_cover(board, owner, charge) != Some(square) {
                continue;
            }
            found.push(CapturableDefender {
                defender: PieceAt::new(square, piece),
                charge: PieceAt::new(charge, charge_piece),
                attacker: PieceAt::new(attacker_square, attacker_piece),
                color: (!owner).into(),
                value: None,
            });
        }
    }

    found
}
