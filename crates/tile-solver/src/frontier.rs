//! Frontier ordering and visited-state deduplication.

use std::cmp::Reverse;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};

use serde::{Deserialize, Serialize};

use crate::board::BoardKey;
use crate::tree::NodeId;

/// Maps a node's depth (g) and estimate (h) to its frontier priority (f).
pub trait OrderingPolicy {
    fn priority(&self, depth: u32, heuristic: u32) -> u32;
}

/// Built-in ordering policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SearchPolicy {
    /// f = g + h
    #[default]
    AStar,
    /// f = h
    Greedy,
}

impl OrderingPolicy for SearchPolicy {
    fn priority(&self, depth: u32, heuristic: u32) -> u32 {
        match self {
            SearchPolicy::AStar => depth + heuristic,
            SearchPolicy::Greedy => heuristic,
        }
    }
}

/// Min-priority queue of node ids; equal priorities pop in insertion order.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<Reverse<(u32, u64, NodeId)>>,
    next_seq: u64,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: NodeId, priority: u32) {
        self.heap.push(Reverse((priority, self.next_seq, id)));
        self.next_seq += 1;
    }

    pub fn pop(&mut self) -> Option<NodeId> {
        self.heap.pop().map(|Reverse((_, _, id))| id)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Total number of pushes over the frontier's lifetime.
    pub fn admitted(&self) -> u64 {
        self.next_seq
    }
}

/// How the visited set treats a board that has been seen before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DedupMode {
    /// Remember the cheapest depth per board and re-admit on strict improvement.
    #[default]
    BestCost,
    /// Never re-admit a board once seen, whatever the depth.
    FirstSeen,
}

/// Boards already admitted to the frontier, keyed canonically.
#[derive(Debug)]
pub struct VisitedSet {
    mode: DedupMode,
    best: HashMap<BoardKey, u32>,
}

impl VisitedSet {
    pub fn new(mode: DedupMode) -> Self {
        Self {
            mode,
            best: HashMap::new(),
        }
    }

    pub fn mode(&self) -> DedupMode {
        self.mode
    }

    pub fn contains(&self, key: BoardKey) -> bool {
        self.best.contains_key(&key)
    }

    /// Record `key` at `depth` unconditionally.
    pub fn insert(&mut self, key: BoardKey, depth: u32) {
        self.best.insert(key, depth);
    }

    /// Check and record in one step; `true` means the board should enter the frontier.
    pub fn admit(&mut self, key: BoardKey, depth: u32) -> bool {
        match self.best.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(depth);
                true
            }
            Entry::Occupied(mut slot) => match self.mode {
                DedupMode::FirstSeen => false,
                DedupMode::BestCost => {
                    if depth < *slot.get() {
                        slot.insert(depth);
                        true
                    } else {
                        false
                    }
                }
            },
        }
    }

    /// Whether a popped entry at `depth` was superseded by a cheaper admission.
    pub fn is_stale(&self, key: BoardKey, depth: u32) -> bool {
        match self.mode {
            DedupMode::FirstSeen => false,
            DedupMode::BestCost => self.best.get(&key).is_some_and(|&best| depth > best),
        }
    }

    pub fn len(&self) -> usize {
        self.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::tree::{Node, SearchTree};

    fn ids(n: usize) -> Vec<NodeId> {
        let mut tree = SearchTree::new();
        (0..n)
            .map(|_| {
                tree.insert(Node {
                    board: Board::solved(2).unwrap(),
                    parent: None,
                    direction: None,
                    depth: 0,
                    heuristic: 0,
                    priority: 0,
                })
            })
            .collect()
    }

    #[test]
    fn test_policies() {
        assert_eq!(SearchPolicy::AStar.priority(3, 4), 7);
        assert_eq!(SearchPolicy::Greedy.priority(3, 4), 4);
    }

    #[test]
    fn test_frontier_pops_min_priority_fifo_on_ties() {
        let ids = ids(4);
        let mut frontier = Frontier::new();
        frontier.push(ids[0], 5);
        frontier.push(ids[1], 3);
        frontier.push(ids[2], 5);
        frontier.push(ids[3], 3);

        assert_eq!(frontier.len(), 4);
        assert_eq!(frontier.pop(), Some(ids[1]));
        assert_eq!(frontier.pop(), Some(ids[3]));
        assert_eq!(frontier.pop(), Some(ids[0]));
        assert_eq!(frontier.pop(), Some(ids[2]));
        assert_eq!(frontier.pop(), None);
        assert!(frontier.is_empty());
        assert_eq!(frontier.admitted(), 4);
    }

    #[test]
    fn test_first_seen_never_readmits() {
        let key = Board::solved(3).unwrap().key();
        let mut visited = VisitedSet::new(DedupMode::FirstSeen);
        assert!(!visited.contains(key));
        assert!(visited.admit(key, 5));
        assert!(visited.contains(key));
        assert!(!visited.admit(key, 5));
        assert!(!visited.admit(key, 1));
        assert!(!visited.is_stale(key, 9));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_best_cost_readmits_on_strict_improvement() {
        let key = Board::solved(3).unwrap().key();
        let mut visited = VisitedSet::new(DedupMode::BestCost);
        assert!(visited.admit(key, 5));
        assert!(!visited.admit(key, 5));
        assert!(!visited.admit(key, 6));
        assert!(visited.admit(key, 3));
        assert!(visited.is_stale(key, 5));
        assert!(!visited.is_stale(key, 3));
    }

    #[test]
    fn test_insert_overwrites() {
        let key = Board::solved(3).unwrap().key();
        let mut visited = VisitedSet::new(DedupMode::BestCost);
        visited.insert(key, 4);
        visited.insert(key, 7);
        assert!(visited.is_stale(key, 8));
        assert!(!visited.is_stale(key, 7));
        assert_eq!(visited.mode(), DedupMode::BestCost);
        assert!(!visited.is_empty());
    }
}
