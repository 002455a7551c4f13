use chess::Piece;

pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 300;
pub const BISHOP_VALUE: i32 = 300;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 900;

/// King policy for ray-geometry and fork comparisons: the king outvalues any
/// combination of material, so comparisons against it always concede.
pub const KING_RAY_VALUE: i32 = 100_000;

/// King policy for exchange ordering: large enough to sort the king behind
/// every other attacker, small enough not to overflow gain arithmetic.
pub const KING_EXCHANGE_VALUE: i32 = 20_000;

/// Centipawn value of a piece. There is deliberately no default for the king:
/// every call site must state which king policy it is using.
pub fn piece_value(piece: Piece, king_value: i32) -> i32 {
    match piece {
        Piece::Pawn => PAWN_VALUE,
        Piece::Knight => KNIGHT_VALUE,
        Piece::Bishop => BISHOP_VALUE,
        Piece::Rook => ROOK_VALUE,
        Piece::Queen => QUEEN_VALUE,
        Piece::King => king_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_values() {
        assert_eq!(piece_value(Piece::Pawn, KING_RAY_VALUE), PAWN_VALUE);
        assert_eq!(piece_value(Piece::Queen, KING_RAY_VALUE), QUEEN_VALUE);
        assert_eq!(piece_value(Piece::Knight, 0), piece_value(Piece::Bishop, 0));
    }

    #[test]
    fn test_king_value_is_caller_supplied() {
        assert_eq!(piece_value(Piece::King, KING_RAY_VALUE), KING_RAY_VALUE);
        assert_eq!(piece_value(Piece::King, KING_EXCHANGE_VALUE), KING_EXCHANGE_VALUE);
    }

    #[test]
    fn test_king_policies_dominate_material() {
        assert!(KING_EXCHANGE_VALUE > QUEEN_VALUE * 2);
        assert!(KING_RAY_VALUE > KING_EXCHANGE_VALUE);
    }
}
