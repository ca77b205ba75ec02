//! Sliding-tile puzzle solver library.
//!
//! This crate provides a best-first search engine for the 8-puzzle and its
//! 2×2 and 4×4 relatives. The heuristic (misplaced tiles or Manhattan
//! distance) and the frontier ordering (A* or greedy) are chosen at
//! construction, so one engine covers every combination.

pub mod board;
pub mod error;
pub mod frontier;
pub mod heuristic;
pub mod shuffle;
pub mod solver;
pub mod successor;
pub mod tree;

// Re-export main types
pub use board::{Board, BoardKey, Direction, Goal, GoalLayout, Parity, Position, Tile};
pub use error::BoardError;
pub use frontier::{DedupMode, Frontier, OrderingPolicy, SearchPolicy, VisitedSet};
pub use heuristic::{Heuristic, HeuristicKind, ManhattanDistance, MisplacedTiles};
pub use solver::{
    solve, solve_input, Outcome, SearchEngine, SearchStats, Solution, SolverConfig, SolverResult,
};
pub use successor::SuccessorGenerator;
pub use tree::{Node, NodeId, SearchTree};
