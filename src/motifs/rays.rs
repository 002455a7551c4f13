use chess::{Board, Color, Piece, Square, ALL_SQUARES};

use crate::motifs::{
    DiscoveredAttack, PieceAt, Pin, PinKind, Significance, Skewer, XRayAttack, XRayDefense,
};
use crate::rays::{slider_directions, walk};
use crate::values::{piece_value, KING_RAY_VALUE, PAWN_VALUE};

/// Everything the single ray pass produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RayMotifs {
    pub pins: Vec<Pin>,
    pub skewers: Vec<Skewer>,
    pub xray_attacks: Vec<XRayAttack>,
    pub xray_defenses: Vec<XRayDefense>,
    pub discovered_attacks: Vec<DiscoveredAttack>,
}

/// Walks every slider's legal directions once and classifies each ray that
/// meets two occupied squares. The classification arms are mutually
/// exclusive, so one ray never yields two motifs.
pub fn classify_rays(board: &Board) -> RayMotifs {
    let mut motifs = RayMotifs::default();

    for origin in ALL_SQUARES {
        let Some(piece) = board.piece_on(origin) else { continue };
        let Some(color) = board.color_on(origin) else { continue };

        for &direction in slider_directions(piece) {
            let (Some(first), Some(second)) = walk(board, origin, direction) else {
                continue;
            };
            classify_ray(board, origin, piece, color, first, second, &mut motifs);
        }
    }

    motifs
}

fn classify_ray(
    board: &Board,
    origin: Square,
    slider: Piece,
    color: Color,
    first: Square,
    second: Square,
    motifs: &mut RayMotifs,
) {
    let (Some(first_piece), Some(first_color)) = (board.piece_on(first), board.color_on(first))
    else {
        return;
    };
    let (Some(second_piece), Some(second_color)) = (board.piece_on(second), board.color_on(second))
    else {
        return;
    };

    let enemy = !color;
    let attacker = PieceAt::new(origin, slider);

    if first_color == enemy && second_color == enemy {
        // The king outvalues everything, so test the royal shapes first.
        let first_value = piece_value(first_piece, KING_RAY_VALUE);
        let second_value = piece_value(second_piece, KING_RAY_VALUE);
        let slider_value = piece_value(slider, KING_RAY_VALUE);

        if second_piece == Piece::King {
            motifs.pins.push(Pin {
                pinner: attacker,
                pinned: PieceAt::new(first, first_piece),
                shielded: PieceAt::new(second, second_piece),
                kind: PinKind::Absolute,
                color: color.into(),
                value: None,
            });
        } else if first_piece == Piece::King {
            motifs.skewers.push(Skewer {
                attacker,
                front: PieceAt::new(first, first_piece),
                behind: PieceAt::new(second, second_piece),
                is_absolute: true,
                color: color.into(),
                value: None,
            });
        } else if first_value < second_value {
            motifs.pins.push(Pin {
                pinner: attacker,
                pinned: PieceAt::new(first, first_piece),
                shielded: PieceAt::new(second, second_piece),
                kind: PinKind::Relative,
                color: color.into(),
                value: None,
            });
        } else if first_value > second_value && slider_value <= first_value {
            motifs.skewers.push(Skewer {
                attacker,
                front: PieceAt::new(first, first_piece),
                behind: PieceAt::new(second, second_piece),
                is_absolute: false,
                color: color.into(),
                value: None,
            });
        } else {
            motifs.xray_attacks.push(XRayAttack {
                attacker,
                through: PieceAt::new(first, first_piece),
                target: PieceAt::new(second, second_piece),
                color: color.into(),
            });
        }
    } else if first_color == enemy && second_color == color {
        motifs.xray_defenses.push(XRayDefense {
            defender: attacker,
            through: PieceAt::new(first, first_piece),
            protected: PieceAt::new(second, second_piece),
            color: color.into(),
        });
    } else if first_color == color && second_color == enemy {
        let significance = if second_piece == Piece::King {
            Significance::Check
        } else if first_piece == Piece::Pawn
            && piece_value(second_piece, KING_RAY_VALUE) <= PAWN_VALUE
        {
            Significance::Low
        } else {
            Significance::Normal
        };
        motifs.discovered_attacks.push(DiscoveredAttack {
            attacker,
            blocker: PieceAt::new(first, first_piece),
            target: PieceAt::new(second, second_piece),
            significance,
            color: color.into(),
            value: None,
        });
    }
}
