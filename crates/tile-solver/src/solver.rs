//! Best-first search engine for the sliding-tile puzzle.
//!
//! One engine covers A* and greedy search with either built-in heuristic:
//! the estimate and the ordering policy are injected at construction. A run
//! is a small state machine (`Running` until `Solved`, `Unreachable`,
//! `Invalid`, or `Exhausted`) and always returns a tagged [`SolverResult`]
//! instead of failing.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::board::{Board, Direction, Goal};
use crate::frontier::{DedupMode, Frontier, OrderingPolicy, SearchPolicy, VisitedSet};
use crate::heuristic::{Heuristic, HeuristicKind};
use crate::successor::SuccessorGenerator;
use crate::tree::{Node, NodeId, SearchTree};

/// Default cap on node expansions.
pub const DEFAULT_MAX_EXPANSIONS: usize = 1_000_000;

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub heuristic: HeuristicKind,
    pub policy: SearchPolicy,
    pub dedup: DedupMode,
    /// Stop after this many expansions (`None` = unbounded)
    pub max_expansions: Option<usize>,
    /// Stop after this much wall-clock time (`None` = unbounded)
    pub timeout: Option<Duration>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            heuristic: HeuristicKind::default(),
            policy: SearchPolicy::default(),
            dedup: DedupMode::default(),
            max_expansions: Some(DEFAULT_MAX_EXPANSIONS),
            timeout: None,
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Solved,
    /// The input is not a permutation of the goal's tiles.
    InvalidInput,
    /// The start lies in the other parity class; no search was run.
    Unsolvable,
    /// The frontier emptied before the goal was reached. Indicates a defect.
    SearchExhausted,
    /// Expansion budget or timeout reached first.
    BudgetExceeded,
}

/// Counters collected during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Candidates produced by successor generation, before dedup.
    pub nodes_generated: usize,
    /// Nodes pushed onto the frontier, root included.
    pub nodes_admitted: usize,
    pub nodes_expanded: usize,
    pub time_elapsed_ms: u64,
}

/// Boards from start to goal and the blank moves between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub path: Vec<Board>,
    pub moves: Vec<Direction>,
}

impl Solution {
    /// Number of moves.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn start(&self) -> Option<&Board> {
        self.path.first()
    }

    /// Apply the moves to the start board in order; `None` if a move is illegal.
    pub fn replay(&self) -> Option<Board> {
        let mut board = self.start()?.clone();
        for &direction in &self.moves {
            board = board.slide(direction)?;
        }
        Some(board)
    }
}

/// Result of the solver search
#[derive(Debug, Clone)]
pub struct SolverResult {
    pub outcome: Outcome,
    /// Present only when `outcome` is `Solved`
    pub solution: Option<Solution>,
    pub stats: SearchStats,
    /// Why the run did not solve
    pub reason: Option<String>,
}

impl SolverResult {
    fn rejected(outcome: Outcome, reason: String, elapsed: Duration) -> Self {
        Self {
            outcome,
            solution: None,
            stats: SearchStats {
                time_elapsed_ms: elapsed.as_millis() as u64,
                ..SearchStats::default()
            },
            reason: Some(reason),
        }
    }

    /// Result for input that never became a board.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::rejected(Outcome::InvalidInput, reason.into(), Duration::ZERO)
    }

    pub fn is_solved(&self) -> bool {
        self.outcome == Outcome::Solved
    }
}

/// Which limit stopped an exhausted run.
#[derive(Debug, Clone, Copy)]
enum Limit {
    Expansions(usize),
    Timeout(Duration),
}

#[derive(Debug, Clone, Copy)]
enum EngineState {
    Running,
    Solved(NodeId),
    Unreachable,
    Invalid,
    Exhausted(Limit),
}

/// Best-first search over boards with a pluggable estimate and ordering.
#[derive(Debug, Clone)]
pub struct SearchEngine<H = HeuristicKind, P = SearchPolicy> {
    heuristic: H,
    policy: P,
    goal: Goal,
    successors: SuccessorGenerator,
    dedup: DedupMode,
    max_expansions: Option<usize>,
    timeout: Option<Duration>,
}

impl SearchEngine {
    pub fn from_config(goal: Goal, config: &SolverConfig) -> Self {
        SearchEngine::new(config.heuristic, config.policy, goal)
            .with_dedup(config.dedup)
            .with_max_expansions(config.max_expansions)
            .with_timeout(config.timeout)
    }
}

impl<H: Heuristic, P: OrderingPolicy> SearchEngine<H, P> {
    pub fn new(heuristic: H, policy: P, goal: Goal) -> Self {
        Self {
            heuristic,
            policy,
            goal,
            successors: SuccessorGenerator,
            dedup: DedupMode::default(),
            max_expansions: Some(DEFAULT_MAX_EXPANSIONS),
            timeout: None,
        }
    }

    pub fn with_dedup(mut self, dedup: DedupMode) -> Self {
        self.dedup = dedup;
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: Option<usize>) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    /// Search from `start` to the goal.
    pub fn solve(&self, start: &Board) -> SolverResult {
        self.solve_observed(start, |_| {})
    }

    /// Like [`solve`](Self::solve), calling `observer` for every node admitted to the frontier.
    pub fn solve_observed<F>(&self, start: &Board, mut observer: F) -> SolverResult
    where
        F: FnMut(&Node),
    {
        let start_time = Instant::now();

        if start.size() != self.goal.size() {
            return SolverResult::rejected(
                Outcome::InvalidInput,
                format!(
                    "start is {0}x{0} but goal is {1}x{1}",
                    start.size(),
                    self.goal.size()
                ),
                start_time.elapsed(),
            );
        }

        let mut search = Search {
            engine: self,
            tree: SearchTree::new(),
            frontier: Frontier::new(),
            visited: VisitedSet::new(self.dedup),
            stats: SearchStats::default(),
            deadline: self.timeout.map(|t| start_time + t),
        };

        let mut state = if self.goal.is_reachable_from(start) {
            search.admit_root(start, &mut observer);
            EngineState::Running
        } else {
            EngineState::Invalid
        };

        while let EngineState::Running = state {
            state = search.step(&mut observer);
        }

        let mut stats = search.stats;
        stats.time_elapsed_ms = start_time.elapsed().as_millis() as u64;

        match state {
            EngineState::Solved(id) => {
                let path = search.tree.reconstruct(id);
                SolverResult {
                    outcome: Outcome::Solved,
                    solution: Some(Solution {
                        path: path.boards,
                        moves: path.moves,
                    }),
                    stats,
                    reason: None,
                }
            }
            EngineState::Invalid => SolverResult {
                outcome: Outcome::Unsolvable,
                solution: None,
                stats,
                reason: Some(format!(
                    "start parity {:?} does not match goal parity {:?}",
                    start.parity_class(),
                    self.goal.board().parity_class()
                )),
            },
            EngineState::Unreachable => SolverResult {
                outcome: Outcome::SearchExhausted,
                solution: None,
                stats,
                reason: Some(format!(
                    "frontier emptied after {} expansions without reaching the goal",
                    stats.nodes_expanded
                )),
            },
            EngineState::Exhausted(limit) => SolverResult {
                outcome: Outcome::BudgetExceeded,
                solution: None,
                stats,
                reason: Some(match limit {
                    Limit::Expansions(max) => format!("expansion budget of {} reached", max),
                    Limit::Timeout(t) => format!("timeout of {} ms reached", t.as_millis()),
                }),
            },
            EngineState::Running => unreachable!("search loop exits only on a terminal state"),
        }
    }
}

/// Mutable state of one run. Dropped, with every node it owns, when the run ends.
struct Search<'e, H, P> {
    engine: &'e SearchEngine<H, P>,
    tree: SearchTree,
    frontier: Frontier,
    visited: VisitedSet,
    stats: SearchStats,
    deadline: Option<Instant>,
}

impl<H: Heuristic, P: OrderingPolicy> Search<'_, H, P> {
    fn admit_root<F: FnMut(&Node)>(&mut self, start: &Board, observer: &mut F) {
        let engine = self.engine;
        let heuristic = engine.heuristic.estimate(start, &engine.goal);
        let root = Node {
            board: start.clone(),
            parent: None,
            direction: None,
            depth: 0,
            heuristic,
            priority: engine.policy.priority(0, heuristic),
        };
        self.visited.insert(start.key(), 0);
        self.push(root, observer);
    }

    fn push<F: FnMut(&Node)>(&mut self, node: Node, observer: &mut F) {
        observer(&node);
        let priority = node.priority;
        let id = self.tree.insert(node);
        self.frontier.push(id, priority);
        self.stats.nodes_admitted += 1;
    }

    fn limit_reached(&self) -> Option<Limit> {
        let engine = self.engine;
        if let Some(max) = engine.max_expansions {
            if self.stats.nodes_expanded >= max {
                return Some(Limit::Expansions(max));
            }
        }
        if let (Some(deadline), Some(timeout)) = (self.deadline, engine.timeout) {
            if Instant::now() >= deadline {
                return Some(Limit::Timeout(timeout));
            }
        }
        None
    }

    fn step<F: FnMut(&Node)>(&mut self, observer: &mut F) -> EngineState {
        let engine = self.engine;
        let Some(id) = self.frontier.pop() else {
            return EngineState::Unreachable;
        };

        let node = self.tree.get(id);
        // Superseded by a cheaper admission of the same board.
        if self.visited.is_stale(node.board.key(), node.depth) {
            return EngineState::Running;
        }
        if node.board.is_goal(&engine.goal) {
            return EngineState::Solved(id);
        }
        if let Some(limit) = self.limit_reached() {
            return EngineState::Exhausted(limit);
        }

        let candidates = engine.successors.generate(id, self.tree.get(id));
        self.stats.nodes_expanded += 1;

        for candidate in candidates {
            self.stats.nodes_generated += 1;
            if !self.visited.admit(candidate.board.key(), candidate.depth) {
                continue;
            }
            let heuristic = engine.heuristic.estimate(&candidate.board, &engine.goal);
            let child = Node {
                priority: engine.policy.priority(candidate.depth, heuristic),
                board: candidate.board,
                parent: Some(candidate.parent),
                direction: Some(candidate.direction),
                depth: candidate.depth,
                heuristic,
            };
            self.push(child, observer);
        }

        EngineState::Running
    }
}

/// Solve `start` with the engine described by `config`.
pub fn solve(start: &Board, goal: &Goal, config: &SolverConfig) -> SolverResult {
    SearchEngine::from_config(goal.clone(), config).solve(start)
}

/// Parse whitespace-separated tiles and solve, reporting malformed input as `InvalidInput`.
pub fn solve_input(input: &str, goal: &Goal, config: &SolverConfig) -> SolverResult {
    match Board::parse(input, goal.size()) {
        Ok(start) => solve(&start, goal, config),
        Err(e) => SolverResult::invalid_input(e.to_string()),
    }
}
