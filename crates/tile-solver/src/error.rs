//! Error types for board construction and move application.

use crate::board::{Position, Tile, MAX_SIZE, MIN_SIZE};

/// Reasons a tile sequence or a move cannot produce a valid board.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("board size {0} is not supported (expected {min}..={max})", min = MIN_SIZE, max = MAX_SIZE)]
    UnsupportedSize(usize),
    #[error("expected {expected} tiles, found {found}")]
    WrongLength { expected: usize, found: usize },
    #[error("not an integer: {0:?}")]
    NotANumber(String),
    #[error("tile value {value} is outside 0..{limit}")]
    OutOfRange { value: i64, limit: usize },
    #[error("tile value {0} appears more than once")]
    Duplicate(Tile),
    #[error("position {0} is outside the board")]
    OutOfBounds(Position),
    #[error("position {to} is not adjacent to {from}")]
    NotAdjacent { from: Position, to: Position },
    #[error("position {0} does not hold the blank")]
    NotBlank(Position),
}
