//! Remaining-cost estimates used to order the frontier.
//!
//! Both built-in estimates are admissible and consistent for unit-cost
//! sliding moves, so A* ordering with either one returns shortest paths.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Goal, BLANK};

/// Estimate of the number of moves still needed to reach the goal.
pub trait Heuristic {
    fn estimate(&self, board: &Board, goal: &Goal) -> u32;
}

impl<F> Heuristic for F
where
    F: Fn(&Board, &Goal) -> u32,
{
    fn estimate(&self, board: &Board, goal: &Goal) -> u32 {
        self(board, goal)
    }
}

/// Number of non-blank tiles not on their goal cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct MisplacedTiles;

impl Heuristic for MisplacedTiles {
    fn estimate(&self, board: &Board, goal: &Goal) -> u32 {
        board
            .cells()
            .iter()
            .zip(goal.board().cells())
            .filter(|&(&tile, &target)| tile != BLANK && tile != target)
            .count() as u32
    }
}

/// Sum over non-blank tiles of the grid distance to their goal cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManhattanDistance;

impl Heuristic for ManhattanDistance {
    fn estimate(&self, board: &Board, goal: &Goal) -> u32 {
        board
            .cells()
            .iter()
            .enumerate()
            .filter(|&(_, &tile)| tile != BLANK)
            .map(|(index, &tile)| {
                board
                    .position_of_index(index)
                    .manhattan(goal.position_of(tile))
            })
            .sum()
    }
}

/// Built-in estimate selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum HeuristicKind {
    MisplacedTiles,
    #[default]
    ManhattanDistance,
}

impl Heuristic for HeuristicKind {
    fn estimate(&self, board: &Board, goal: &Goal) -> u32 {
        match self {
            HeuristicKind::MisplacedTiles => MisplacedTiles.estimate(board, goal),
            HeuristicKind::ManhattanDistance => ManhattanDistance.estimate(board, goal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Direction;

    fn board(tiles: &[u8]) -> Board {
        Board::new(3, tiles).unwrap()
    }

    #[test]
    fn test_goal_scores_zero() {
        let goal = Goal::blank_last(3).unwrap();
        assert_eq!(MisplacedTiles.estimate(goal.board(), &goal), 0);
        assert_eq!(ManhattanDistance.estimate(goal.board(), &goal), 0);
    }

    #[test]
    fn test_misplaced_ignores_blank() {
        let goal = Goal::blank_last(3).unwrap();
        // Only tile 6 is off its cell; the blank being off its cell does not count.
        let b = board(&[1, 2, 3, 4, 5, 0, 7, 8, 6]);
        assert_eq!(MisplacedTiles.estimate(&b, &goal), 1);
    }

    #[test]
    fn test_manhattan_sums_tile_distances() {
        let goal = Goal::blank_last(3).unwrap();
        // 1 and 8 are one cell away, 4 and 7 are two.
        let b = board(&[0, 2, 3, 1, 5, 6, 8, 4, 7]);
        assert_eq!(ManhattanDistance.estimate(&b, &goal), 6);
        assert_eq!(MisplacedTiles.estimate(&b, &goal), 4);
    }

    #[test]
    fn test_manhattan_dominates_misplaced() {
        let goal = Goal::blank_last(3).unwrap();
        let b = board(&[8, 6, 7, 2, 5, 4, 3, 0, 1]);
        assert!(ManhattanDistance.estimate(&b, &goal) >= MisplacedTiles.estimate(&b, &goal));
    }

    #[test]
    fn test_estimates_change_by_at_most_one_per_move() {
        let goal = Goal::blank_last(3).unwrap();
        let start = board(&[2, 3, 1, 5, 6, 0, 8, 4, 7]);
        for kind in [HeuristicKind::MisplacedTiles, HeuristicKind::ManhattanDistance] {
            let h = kind.estimate(&start, &goal);
            for d in Direction::ALL {
                if let Some(next) = start.slide(d) {
                    assert!(kind.estimate(&next, &goal).abs_diff(h) <= 1);
                }
            }
        }
    }

    #[test]
    fn test_closure_heuristic() {
        let goal = Goal::blank_last(3).unwrap();
        let zero = |_: &Board, _: &Goal| -> u32 { 0 };
        assert_eq!(zero.estimate(goal.board(), &goal), 0);
    }
}
