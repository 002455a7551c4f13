use chess::Board;

use crate::motifs::{DutyKind, PieceKind, TacticValue, TacticalMotifs};
use crate::see::see;
use crate::values::{piece_value, KING_RAY_VALUE};

/// Attaches a material judgement to every motif that supports one. Geometry
/// stays untouched; only the `value` fields are filled in.
pub fn valuate(board: &Board, motifs: &mut TacticalMotifs) {
    for pin in &mut motifs.pins {
        pin.value = Some(match pin.kind {
            // the pinned piece cannot run: count it as won
            crate::motifs::PinKind::Absolute => {
                TacticValue::heuristic(kind_value(pin.pinned.kind))
            }
            crate::motifs::PinKind::Relative => TacticValue::from_see(see(
                board,
                pin.pinned.square.to_square(),
                pin.color.to_color(),
            )),
        });
    }

    for skewer in &mut motifs.skewers {
        skewer.value = Some(if skewer.is_absolute {
            TacticValue::heuristic(kind_value(skewer.behind.kind))
        } else {
            TacticValue::from_see(see(
                board,
                skewer.front.square.to_square(),
                skewer.color.to_color(),
            ))
        });
    }

    for discovered in &mut motifs.discovered_attacks {
        discovered.value = Some(TacticValue::from_see(see(
            board,
            discovered.target.square.to_square(),
            discovered.color.to_color(),
        )));
    }

    for hanging in &mut motifs.hanging {
        hanging.value = Some(TacticValue::from_see(see(
            board,
            hanging.piece.square.to_square(),
            hanging.color.to_color(),
        )));
    }

    for fork in &mut motifs.forks {
        let color = fork.color.to_color();
        let mut ordered: Vec<_> = fork
            .targets
            .iter()
            .filter(|t| t.kind != PieceKind::King)
            .collect();
        ordered.sort_by_key(|t| std::cmp::Reverse(kind_value(t.kind)));

        let valued = if fork.is_check_fork {
            // the king must move; the best remaining target falls
            ordered
                .first()
                .map(|t| see(board, t.square.to_square(), color))
        } else {
            // one target escapes, and the opponent may just take the forker
            ordered.get(1).map(|t| {
                let mut delta = see(board, t.square.to_square(), color);
                let counter = see(board, fork.forker.square.to_square(), !color);
                if counter > 0 {
                    delta -= counter;
                }
                delta
            })
        };
        fork.value = valued.map(TacticValue::from_see);
    }

    for capturable in &mut motifs.capturable_defenders {
        let mut delta = see(
            board,
            capturable.defender.square.to_square(),
            capturable.color.to_color(),
        );
        if delta >= 0 {
            delta += kind_value(capturable.charge.kind);
        }
        capturable.value = Some(TacticValue::from_see(delta));
    }

    for overloaded in &mut motifs.overloaded {
        let cheapest = overloaded
            .duties
            .iter()
            .filter(|d| d.kind == DutyKind::DefendPiece)
            .filter_map(|d| board.piece_on(d.square.to_square()))
            .map(|p| piece_value(p, KING_RAY_VALUE))
            .min();
        overloaded.value = cheapest.map(TacticValue::heuristic);
    }
}

fn kind_value(kind: PieceKind) -> i32 {
    piece_value(kind.to_piece(), KING_RAY_VALUE)
}
