//! Arena-owned search tree and solution path reconstruction.
//!
//! Every node created during a search lives in one [`SearchTree`]; parent
//! links are indices into the arena, so dropping the tree frees the whole
//! search at once and no node is ever shared between two owners.

use crate::board::{Board, Direction};

/// Index of a node inside its [`SearchTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A board reached during search together with how it was reached.
#[derive(Debug, Clone)]
pub struct Node {
    pub board: Board,
    /// Back-reference used only for path reconstruction.
    pub parent: Option<NodeId>,
    /// Blank move that produced this board from its parent.
    pub direction: Option<Direction>,
    /// Moves from the initial board (g).
    pub depth: u32,
    /// Estimated moves to the goal (h).
    pub heuristic: u32,
    /// Frontier priority (f) under the active ordering policy.
    pub priority: u32,
}

/// Boards and blank moves from the root to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub boards: Vec<Board>,
    pub moves: Vec<Direction>,
}

/// Append-only arena of search nodes.
#[derive(Debug, Default)]
pub struct SearchTree {
    nodes: Vec<Node>,
}

impl SearchTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walk parent links from `leaf` back to the root and return the path root-first.
    ///
    /// Iterative, so solution depth never grows the call stack; leaves the tree untouched.
    pub fn reconstruct(&self, leaf: NodeId) -> Path {
        let mut boards = Vec::new();
        let mut moves = Vec::new();
        let mut cursor = Some(leaf);
        while let Some(id) = cursor {
            let node = self.get(id);
            boards.push(node.board.clone());
            if let Some(direction) = node.direction {
                moves.push(direction);
            }
            cursor = node.parent;
        }
        boards.reverse();
        moves.reverse();
        Path { boards, moves }
    }
}
