//! Search graph nodes

use critter_core::BlockPos;
use serde::{Deserialize, Serialize};

/// Walkability classification of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Walkable,
    Blocked,
    Dangerous,
    Water,
    /// Nothing to land on within the safe fall distance
    Cliff,
    Door,
    Fence,
}

impl NodeKind {
    /// Whether the planner may route through a node of this kind at all
    pub fn is_traversable(self) -> bool {
        !matches!(self, NodeKind::Blocked | NodeKind::Dangerous)
    }

    /// Whether a path can continue onward from a node of this kind
    pub fn is_expandable(self) -> bool {
        self.is_traversable() && self != NodeKind::Cliff
    }
}

/// One cell in an A* search.
///
/// Identity is the coordinate; the parent is stored as a key into the
/// search's node cache rather than a reference.
#[derive(Debug, Clone, PartialEq)]
pub struct PathNode {
    pub pos: BlockPos,
    /// Cost from the start
    pub g_cost: f32,
    /// Heuristic estimate to the goal
    pub h_cost: f32,
    /// g + h
    pub f_cost: f32,
    pub parent: Option<BlockPos>,
    pub kind: NodeKind,
    /// Additive cost for entering this node
    pub penalty: f32,
    /// Steps from the start node
    pub depth: u32,
}

impl PathNode {
    pub fn new(pos: BlockPos, kind: NodeKind, penalty: f32) -> Self {
        Self {
            pos,
            g_cost: f32::INFINITY,
            h_cost: 0.0,
            f_cost: f32::INFINITY,
            parent: None,
            kind,
            penalty,
            depth: 0,
        }
    }

    /// Update the search costs in place
    pub fn set_costs(&mut self, g_cost: f32, h_cost: f32) {
        self.g_cost = g_cost;
        self.h_cost = h_cost;
        self.f_cost = g_cost + h_cost;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traversable_kinds() {
        assert!(NodeKind::Walkable.is_traversable());
        assert!(NodeKind::Fence.is_traversable());
        assert!(!NodeKind::Blocked.is_traversable());
        assert!(!NodeKind::Dangerous.is_traversable());
        assert!(NodeKind::Cliff.is_traversable());
        assert!(!NodeKind::Cliff.is_expandable());
    }

    #[test]
    fn test_set_costs() {
        let mut node = PathNode::new(BlockPos::new(0, 64, 0), NodeKind::Walkable, 0.0);
        assert!(node.g_cost.is_infinite());
        node.set_costs(2.0, 3.5);
        assert_eq!(node.f_cost, 5.5);
    }
}
