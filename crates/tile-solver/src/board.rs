//! Board representation for the sliding-tile puzzle.
//!
//! A [`Board`] is an N×N permutation of `0..N²` where `0` is the blank. The
//! blank's position is always derived from the cells, never supplied by the
//! caller. Boards serialize as a list of rows so they read naturally in JSON.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::BoardError;

/// Value of a single cell.
pub type Tile = u8;

/// The empty cell tiles slide into.
pub const BLANK: Tile = 0;

/// Smallest supported board width.
pub const MIN_SIZE: usize = 2;

/// Largest supported board width (one nibble per cell must fit in a `u64` key).
pub const MAX_SIZE: usize = 4;

/// Width of the classic 8-puzzle.
pub const DEFAULT_SIZE: usize = 3;

type Cells = SmallVec<[Tile; MAX_SIZE * MAX_SIZE]>;

/// Cell coordinates, row-major from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Grid distance between two cells.
    pub fn manhattan(self, other: Position) -> u32 {
        (self.row.abs_diff(other.row) + self.col.abs_diff(other.col)) as u32
    }

    pub fn is_adjacent(self, other: Position) -> bool {
        self.manhattan(other) == 1
    }

    /// Neighbour in `direction`, or `None` when it would leave a `size`-wide grid.
    pub fn step(self, direction: Direction, size: usize) -> Option<Position> {
        let (dr, dc) = direction.delta();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        (row < size && col < size).then_some(Position { row, col })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Direction the blank travels in a single move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Fixed expansion order; successor generation relies on it for reproducible tie-breaking.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// (row, col) offset of the move.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Direction leading from `from` to the adjacent cell `to`.
    pub fn between(from: Position, to: Position) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|d| from.step(*d, usize::MAX) == Some(to))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// Collision-free encoding of a board: one nibble per cell, first cell most significant.
///
/// Ordering keys orders boards lexicographically by their row-major cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoardKey(u64);

impl BoardKey {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Solvability class of a configuration.
///
/// Two boards of the same width are mutually reachable exactly when their classes match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    fn of(n: usize) -> Parity {
        if n % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }
}

/// A validated N×N puzzle configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i64>>", into = "Vec<Vec<Tile>>")]
pub struct Board {
    size: usize,
    cells: Cells,
    blank: usize,
}

impl Board {
    /// Build a board from row-major tiles.
    pub fn new(size: usize, tiles: &[Tile]) -> Result<Self, BoardError> {
        let values: Vec<i64> = tiles.iter().map(|&t| i64::from(t)).collect();
        Self::from_values(size, &values)
    }

    /// Build a board from untrusted row-major values.
    ///
    /// Fails unless the values are exactly a permutation of `0..size²`.
    pub fn from_values(size: usize, values: &[i64]) -> Result<Self, BoardError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(BoardError::UnsupportedSize(size));
        }
        let area = size * size;
        if values.len() != area {
            return Err(BoardError::WrongLength {
                expected: area,
                found: values.len(),
            });
        }

        let mut seen = [false; MAX_SIZE * MAX_SIZE];
        let mut cells = Cells::with_capacity(area);
        for &value in values {
            if value < 0 || value as usize >= area {
                return Err(BoardError::OutOfRange { value, limit: area });
            }
            let tile = value as Tile;
            if std::mem::replace(&mut seen[value as usize], true) {
                return Err(BoardError::Duplicate(tile));
            }
            cells.push(tile);
        }

        // A permutation of 0..area always contains exactly one blank.
        let blank = cells.iter().position(|&t| t == BLANK).unwrap_or_default();
        Ok(Self { size, cells, blank })
    }

    /// Parse whitespace-separated integers (row-major) into a board of width `size`.
    pub fn parse(input: &str, size: usize) -> Result<Self, BoardError> {
        let values = input
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<i64>()
                    .map_err(|_| BoardError::NotANumber(token.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_values(size, &values)
    }

    /// The ascending configuration `1, 2, .., N²-1` with the blank in the last cell.
    pub fn solved(size: usize) -> Result<Self, BoardError> {
        let area = size * size;
        let values: Vec<i64> = (1..area as i64).chain(std::iter::once(0)).collect();
        Self::from_values(size, &values)
    }

    /// The ascending configuration with the blank in the first cell.
    pub fn solved_blank_first(size: usize) -> Result<Self, BoardError> {
        let values: Vec<i64> = (0..(size * size) as i64).collect();
        Self::from_values(size, &values)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Row-major cells.
    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.cells.chunks(self.size)
    }

    pub fn position_of_index(&self, index: usize) -> Position {
        Position::new(index / self.size, index % self.size)
    }

    fn index_of(&self, pos: Position) -> usize {
        pos.row * self.size + pos.col
    }

    fn contains(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// Tile at `pos`, or `None` off the grid.
    pub fn tile_at(&self, pos: Position) -> Option<Tile> {
        self.contains(pos).then(|| self.cells[self.index_of(pos)])
    }

    /// Coordinates of the blank.
    pub fn blank(&self) -> Position {
        self.position_of_index(self.blank)
    }

    /// Swap the blank at `from` with the adjacent cell `to`.
    pub fn apply_move(&self, from: Position, to: Position) -> Result<Board, BoardError> {
        if !self.contains(from) {
            return Err(BoardError::OutOfBounds(from));
        }
        if !self.contains(to) {
            return Err(BoardError::OutOfBounds(to));
        }
        if from != self.blank() {
            return Err(BoardError::NotBlank(from));
        }
        if !from.is_adjacent(to) {
            return Err(BoardError::NotAdjacent { from, to });
        }

        let target = self.index_of(to);
        let mut cells = self.cells.clone();
        cells.swap(self.blank, target);
        Ok(Board {
            size: self.size,
            cells,
            blank: target,
        })
    }

    /// Move the blank one cell in `direction`; `None` if that leaves the grid.
    pub fn slide(&self, direction: Direction) -> Option<Board> {
        let from = self.blank();
        let to = from.step(direction, self.size)?;
        self.apply_move(from, to).ok()
    }

    /// Canonical dedup key.
    pub fn key(&self) -> BoardKey {
        BoardKey(
            self.cells
                .iter()
                .fold(0u64, |acc, &tile| (acc << 4) | u64::from(tile)),
        )
    }

    /// Number of pairs of non-blank tiles that appear out of ascending order.
    pub fn inversions(&self) -> usize {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &tile)| tile != BLANK)
            .map(|(i, &tile)| {
                self.cells[i + 1..]
                    .iter()
                    .filter(|&&next| next != BLANK && next < tile)
                    .count()
            })
            .sum()
    }

    /// Solvability class used to reject unreachable inputs before searching.
    ///
    /// On odd widths a move never changes inversion parity. On even widths a
    /// vertical move flips it together with the blank's row, so the row is folded in.
    pub fn parity_class(&self) -> Parity {
        let inversions = self.inversions();
        if self.size % 2 == 1 {
            Parity::of(inversions)
        } else {
            Parity::of(inversions + self.blank().row)
        }
    }

    /// Exact cell-wise equality with the goal configuration.
    pub fn is_goal(&self, goal: &Goal) -> bool {
        self.cells == goal.board.cells
    }
}

impl TryFrom<Vec<Vec<i64>>> for Board {
    type Error = BoardError;

    fn try_from(rows: Vec<Vec<i64>>) -> Result<Self, Self::Error> {
        let size = rows.len();
        let found: usize = rows.iter().map(Vec::len).sum();
        if rows.iter().any(|row| row.len() != size) {
            return Err(BoardError::WrongLength {
                expected: size * size,
                found,
            });
        }
        let values: Vec<i64> = rows.into_iter().flatten().collect();
        Board::from_values(size, &values)
    }
}

impl From<Board> for Vec<Vec<Tile>> {
    fn from(board: Board) -> Self {
        board.rows().map(<[Tile]>::to_vec).collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for &tile in row {
                write!(f, "{:2} ", tile)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Standard goal layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum GoalLayout {
    /// `1 2 3 / 4 5 6 / 7 8 0`
    #[default]
    BlankLast,
    /// `0 1 2 / 3 4 5 / 6 7 8`
    BlankFirst,
}

/// Target configuration plus a reverse index (tile -> goal position) for heuristics.
#[derive(Debug, Clone)]
pub struct Goal {
    board: Board,
    positions: SmallVec<[Position; MAX_SIZE * MAX_SIZE]>,
}

impl Goal {
    pub fn new(board: Board) -> Self {
        let mut positions = smallvec::smallvec![Position::new(0, 0); board.cells.len()];
        for (index, &tile) in board.cells.iter().enumerate() {
            positions[tile as usize] = board.position_of_index(index);
        }
        Self { board, positions }
    }

    pub fn from_layout(layout: GoalLayout, size: usize) -> Result<Self, BoardError> {
        let board = match layout {
            GoalLayout::BlankLast => Board::solved(size)?,
            GoalLayout::BlankFirst => Board::solved_blank_first(size)?,
        };
        Ok(Self::new(board))
    }

    pub fn blank_last(size: usize) -> Result<Self, BoardError> {
        Self::from_layout(GoalLayout::BlankLast, size)
    }

    pub fn blank_first(size: usize) -> Result<Self, BoardError> {
        Self::from_layout(GoalLayout::BlankFirst, size)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> usize {
        self.board.size
    }

    /// Where `tile` sits in the goal configuration.
    pub fn position_of(&self, tile: Tile) -> Position {
        self.positions[tile as usize]
    }

    /// Whether `board` lies in the same connected component as the goal.
    pub fn is_reachable_from(&self, board: &Board) -> bool {
        board.size == self.board.size && board.parity_class() == self.board.parity_class()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(tiles: &[Tile]) -> Board {
        Board::new(3, tiles).unwrap()
    }

    #[test]
    fn test_blank_is_derived_from_cells() {
        let b = board(&[1, 2, 3, 4, 5, 0, 7, 8, 6]);
        assert_eq!(b.blank(), Position::new(1, 2));
        assert_eq!(b.tile_at(Position::new(2, 2)), Some(6));
        assert_eq!(b.tile_at(Position::new(3, 0)), None);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(
            Board::parse("1 2 3 4 5 6 7 8", 3),
            Err(BoardError::WrongLength {
                expected: 9,
                found: 8
            })
        );
        assert_eq!(
            Board::parse("1 2 3 4 5 6 7 8 8", 3),
            Err(BoardError::Duplicate(8))
        );
        assert_eq!(
            Board::parse("1 2 3 4 5 6 7 8 9", 3),
            Err(BoardError::OutOfRange { value: 9, limit: 9 })
        );
        assert_eq!(
            Board::parse("1 2 3 4 -5 6 7 8 0", 3),
            Err(BoardError::OutOfRange { value: -5, limit: 9 })
        );
        assert_eq!(
            Board::parse("1 2 x 4 5 6 7 8 0", 3),
            Err(BoardError::NotANumber("x".to_string()))
        );
        assert_eq!(Board::parse("0", 1), Err(BoardError::UnsupportedSize(1)));
    }

    #[test]
    fn test_parse_accepts_newlines() {
        let b = Board::parse("1 2 3\n4 5 6\n7 8 0\n", 3).unwrap();
        assert_eq!(b, Board::solved(3).unwrap());
    }

    #[test]
    fn test_apply_move_swaps_blank() {
        let b = board(&[1, 2, 3, 4, 5, 0, 7, 8, 6]);
        let moved = b
            .apply_move(Position::new(1, 2), Position::new(2, 2))
            .unwrap();
        assert_eq!(moved, Board::solved(3).unwrap());
        assert_eq!(moved.blank(), Position::new(2, 2));
    }

    #[test]
    fn test_apply_move_preconditions() {
        let b = board(&[1, 2, 3, 4, 5, 0, 7, 8, 6]);
        let blank = Position::new(1, 2);
        assert_eq!(
            b.apply_move(blank, Position::new(1, 3)),
            Err(BoardError::OutOfBounds(Position::new(1, 3)))
        );
        assert_eq!(
            b.apply_move(blank, Position::new(0, 0)),
            Err(BoardError::NotAdjacent {
                from: blank,
                to: Position::new(0, 0)
            })
        );
        assert_eq!(
            b.apply_move(Position::new(0, 0), Position::new(0, 1)),
            Err(BoardError::NotBlank(Position::new(0, 0)))
        );
    }

    #[test]
    fn test_slide_stops_at_edges() {
        let b = Board::solved(3).unwrap();
        assert!(b.slide(Direction::Down).is_none());
        assert!(b.slide(Direction::Right).is_none());
        let up = b.slide(Direction::Up).unwrap();
        assert_eq!(up.cells(), &[1, 2, 3, 4, 5, 0, 7, 8, 6]);
    }

    #[test]
    fn test_direction_between() {
        let a = Position::new(1, 1);
        assert_eq!(Direction::between(a, Position::new(0, 1)), Some(Direction::Up));
        assert_eq!(Direction::between(a, Position::new(1, 2)), Some(Direction::Right));
        assert_eq!(Direction::between(a, Position::new(2, 2)), None);
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
        }
    }

    #[test]
    fn test_key_distinguishes_boards() {
        let a = board(&[1, 2, 3, 4, 5, 6, 7, 8, 0]);
        let b = board(&[1, 2, 3, 4, 5, 6, 8, 7, 0]);
        assert_eq!(a.key(), a.clone().key());
        assert_ne!(a.key(), b.key());
        assert!(a.key() < b.key());
        assert_eq!(a.key().value(), 0x1234_5678_0);
    }

    #[test]
    fn test_parity_of_single_transposition_differs() {
        let solved = Board::solved(3).unwrap();
        let swapped = board(&[1, 2, 3, 4, 5, 6, 8, 7, 0]);
        assert_eq!(solved.parity_class(), Parity::Even);
        assert_eq!(swapped.parity_class(), Parity::Odd);

        let goal = Goal::new(solved);
        assert!(!goal.is_reachable_from(&swapped));
    }

    #[test]
    fn test_parity_invariant_under_moves_on_even_width() {
        let start = Board::solved(4).unwrap();
        let class = start.parity_class();
        let mut current = start;
        for d in [Direction::Up, Direction::Left, Direction::Up, Direction::Left, Direction::Down] {
            current = current.slide(d).unwrap();
            assert_eq!(current.parity_class(), class);
        }
    }

    #[test]
    fn test_goal_reverse_index() {
        let goal = Goal::blank_first(3).unwrap();
        assert_eq!(goal.position_of(0), Position::new(0, 0));
        assert_eq!(goal.position_of(5), Position::new(1, 2));
        let goal = Goal::blank_last(3).unwrap();
        assert_eq!(goal.position_of(0), Position::new(2, 2));
        assert_eq!(goal.position_of(1), Position::new(0, 0));
    }

    #[test]
    fn test_json_rows() {
        let b = board(&[1, 2, 3, 4, 5, 0, 7, 8, 6]);
        let json = serde_json::to_string(&b).unwrap();
        assert_eq!(json, "[[1,2,3],[4,5,0],[7,8,6]]");
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
        assert!(serde_json::from_str::<Board>("[[1,2],[3,0,4]]").is_err());
    }

    #[test]
    fn test_display_grid() {
        let b = Board::solved(3).unwrap();
        assert_eq!(b.to_string(), " 1  2  3 \n 4  5  6 \n 7  8  0 \n");
    }
}
