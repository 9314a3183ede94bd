//! Block-grid paths: nodes, cell classification, A* search, and the plan
//! a navigator follows

mod evaluator;
mod node;
mod search;

pub use evaluator::{Classification, PathNodeEvaluator};
pub use node::{NodeKind, PathNode};
pub use search::{find_path, heuristic, SearchOutcome, SearchResult};

use critter_core::math::horizontal_distance;
use critter_core::BlockPos;
use glam::Vec3;

/// An ordered plan produced by one search, followed with a forward-only cursor.
///
/// An empty path is the "no plan" value: failed searches and a start that
/// already is the goal both produce one.
#[derive(Debug, Clone)]
pub struct Path {
    nodes: Vec<PathNode>,
    cursor: usize,
    target: BlockPos,
}

impl Path {
    pub fn new(nodes: Vec<PathNode>, target: BlockPos) -> Self {
        Self {
            nodes,
            cursor: 0,
            target,
        }
    }

    pub fn empty(target: BlockPos) -> Self {
        Self::new(Vec::new(), target)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    /// The destination cell this path was planned toward
    pub fn target(&self) -> BlockPos {
        self.target
    }

    /// Waypoint under the cursor
    pub fn current(&self) -> Option<&PathNode> {
        self.nodes.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn advance(&mut self) {
        if self.cursor < self.nodes.len() {
            self.cursor += 1;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.nodes.len()
    }

    /// Waypoints not yet reached, starting with the current one
    pub fn remaining(&self) -> &[PathNode] {
        &self.nodes[self.cursor.min(self.nodes.len())..]
    }

    pub fn end(&self) -> Option<&PathNode> {
        self.nodes.last()
    }

    /// Accumulated search cost of the whole path
    pub fn total_cost(&self) -> f32 {
        self.end().map(|node| node.g_cost).unwrap_or(0.0)
    }

    /// Whether `position` is close enough to the current waypoint to move on.
    ///
    /// Only the horizontal check is tight; height differences are left to
    /// jumping and falling.
    pub fn should_advance(&self, position: Vec3, horizontal: f32, vertical: f32) -> bool {
        let Some(node) = self.current() else {
            return false;
        };
        let waypoint = node.pos.bottom_center();
        horizontal_distance(position, waypoint) < horizontal
            && (position.y - waypoint.y).abs() < vertical
    }
}
