//! Random puzzle instances.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Board, Direction, Goal};
use crate::error::BoardError;

/// Uniformly shuffled board from the same solvability class as `goal`.
pub fn random_solvable<R: Rng + ?Sized>(goal: &Goal, rng: &mut R) -> Result<Board, BoardError> {
    let size = goal.size();
    let mut tiles = goal.board().cells().to_vec();
    loop {
        tiles.shuffle(rng);
        let board = Board::new(size, &tiles)?;
        if goal.is_reachable_from(&board) {
            return Ok(board);
        }
    }
}

/// Board reached from `from` by `steps` random blank moves, never undoing the previous move.
///
/// The result is at most `steps` moves away from `from`.
pub fn random_walk<R: Rng + ?Sized>(from: &Board, steps: usize, rng: &mut R) -> Board {
    let mut current = from.clone();
    let mut last: Option<Direction> = None;
    for _ in 0..steps {
        let options: Vec<(Direction, Board)> = Direction::ALL
            .into_iter()
            .filter(|d| last != Some(d.opposite()))
            .filter_map(|d| current.slide(d).map(|b| (d, b)))
            .collect();
        let Some((direction, next)) = options.choose(rng) else {
            break;
        };
        last = Some(*direction);
        current = next.clone();
    }
    current
}
