use chess::{Board, File, Piece, Rank, Square};

/// One of the 8 compass directions a sliding piece can travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

pub const ROOK_DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

pub const BISHOP_DIRECTIONS: [Direction; 4] = [
    Direction::NorthEast,
    Direction::SouthEast,
    Direction::SouthWest,
    Direction::NorthWest,
];

pub const ALL_DIRECTIONS: [Direction; 8] = [
    Direction::North,
    Direction::NorthEast,
    Direction::East,
    Direction::SouthEast,
    Direction::South,
    Direction::SouthWest,
    Direction::West,
    Direction::NorthWest,
];

impl Direction {
    /// (file delta, rank delta) for one step in this direction.
    pub fn deltas(self) -> (i8, i8) {
        match self {
            Direction::North => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, -1),
            Direction::South => (0, -1),
            Direction::SouthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, 1),
        }
    }

    pub fn is_diagonal(self) -> bool {
        let (df, dr) = self.deltas();
        df != 0 && dr != 0
    }
}

/// Directions a slider may travel. Non-sliders get none.
pub fn slider_directions(piece: Piece) -> &'static [Direction] {
    match piece {
        Piece::Rook => &ROOK_DIRECTIONS,
        Piece::Bishop => &BISHOP_DIRECTIONS,
        Piece::Queen => &ALL_DIRECTIONS,
        _ => &[],
    }
}

/// One step from `square` in `direction`, or `None` off-board.
pub fn step(square: Square, direction: Direction) -> Option<Square> {
    let (df, dr) = direction.deltas();
    let file = square.get_file().to_index() as i8 + df;
    let rank = square.get_rank().to_index() as i8 + dr;
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some(Square::make_square(
            Rank::from_index(rank as usize),
            File::from_index(file as usize),
        ))
    } else {
        None
    }
}

/// Walks from `origin` in `direction` and returns the first and second
/// occupied squares encountered, if any. Pure; never mutates the board.
pub fn walk(board: &Board, origin: Square, direction: Direction) -> (Option<Square>, Option<Square>) {
    let mut first = None;
    let mut current = origin;
    while let Some(next) = step(current, direction) {
        if board.piece_on(next).is_some() {
            if first.is_none() {
                first = Some(next);
            } else {
                return (first, Some(next));
            }
        }
        current = next;
    }
    (first, None)
}
