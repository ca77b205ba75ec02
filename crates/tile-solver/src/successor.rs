//! One-move expansion of search nodes.

use smallvec::SmallVec;

use crate::board::{Board, Direction};
use crate::tree::{Node, NodeId};

/// A child board produced by a single blank move, not yet scored or admitted.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub board: Board,
    pub parent: NodeId,
    pub direction: Direction,
    pub depth: u32,
}

/// Enumerates boards reachable from a node by one blank slide.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuccessorGenerator;

impl SuccessorGenerator {
    /// At most four candidates, always in [`Direction::ALL`] order.
    pub fn generate(&self, id: NodeId, node: &Node) -> SmallVec<[Candidate; 4]> {
        Direction::ALL
            .into_iter()
            .filter_map(|direction| {
                node.board.slide(direction).map(|board| Candidate {
                    board,
                    parent: id,
                    direction,
                    depth: node.depth + 1,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::SearchTree;

    fn root(board: Board) -> (SearchTree, NodeId) {
        let mut tree = SearchTree::new();
        let id = tree.insert(Node {
            board,
            parent: None,
            direction: None,
            depth: 0,
            heuristic: 0,
            priority: 0,
        });
        (tree, id)
    }

    #[test]
    fn test_corner_blank_has_two_successors() {
        let (tree, id) = root(Board::solved(3).unwrap());
        let children = SuccessorGenerator.generate(id, tree.get(id));
        let dirs: Vec<Direction> = children.iter().map(|c| c.direction).collect();
        assert_eq!(dirs, vec![Direction::Up, Direction::Left]);
        assert!(children.iter().all(|c| c.depth == 1 && c.parent == id));
    }

    #[test]
    fn test_center_blank_has_four_successors_in_fixed_order() {
        let (tree, id) = root(Board::new(3, &[1, 2, 3, 4, 0, 5, 6, 7, 8]).unwrap());
        let children = SuccessorGenerator.generate(id, tree.get(id));
        let dirs: Vec<Direction> = children.iter().map(|c| c.direction).collect();
        assert_eq!(dirs, Direction::ALL.to_vec());
        assert_eq!(children[0].board.cells(), &[1, 0, 3, 4, 2, 5, 6, 7, 8]);
        assert_eq!(children[3].board.cells(), &[1, 2, 3, 4, 5, 0, 6, 7, 8]);
    }

    #[test]
    fn test_successors_keep_blank_consistent() {
        let (tree, id) = root(Board::new(3, &[1, 0, 3, 4, 2, 5, 6, 7, 8]).unwrap());
        for child in SuccessorGenerator.generate(id, tree.get(id)) {
            let blank = child.board.blank();
            assert_eq!(child.board.tile_at(blank), Some(0));
            assert_eq!(child.board.cells().iter().filter(|&&t| t == 0).count(), 1);
        }
    }
}
