//! Bounded A* over the block grid

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use critter_core::BlockPos;
use critter_world::BlockAccess;
use tracing::debug;

use super::evaluator::PathNodeEvaluator;
use super::node::{NodeKind, PathNode};
use super::Path;
use crate::config::PathfindingConfig;

/// Heuristic weight on vertical distance. Over-estimates on purpose so
/// routes prefer staying level.
const VERTICAL_WEIGHT: f32 = 1.5;

const LATERAL: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// How a search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Found,
    /// Start and goal are the same cell
    AlreadyThere,
    /// Open set ran dry
    Exhausted,
    /// Iteration cap hit before the goal was popped
    IterationCap,
}

/// A path plus bookkeeping about the search that produced it
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub path: Path,
    pub outcome: SearchOutcome,
    /// Nodes popped and expanded
    pub expanded: u32,
}

/// Frontier entry; duplicates for the same cell are allowed and resolved
/// through the closed set
#[derive(Debug)]
struct OpenEntry {
    pos: BlockPos,
    f_cost: f32,
    h_cost: f32,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f_cost == other.f_cost && self.h_cost == other.h_cost
    }
}
impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; ties go to the node nearer the goal
        other
            .f_cost
            .partial_cmp(&self.f_cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.h_cost.partial_cmp(&self.h_cost).unwrap_or(Ordering::Equal))
    }
}

/// Weighted Manhattan distance: lateral deltas count 1, vertical 1.5
pub fn heuristic(from: BlockPos, to: BlockPos) -> f32 {
    let lateral = from.x.abs_diff(to.x) + from.z.abs_diff(to.z);
    lateral as f32 + from.y.abs_diff(to.y) as f32 * VERTICAL_WEIGHT
}

fn reached(pos: BlockPos, goal: BlockPos) -> bool {
    pos.same_column(&goal) && pos.y.abs_diff(goal.y) <= 1
}

/// Search from `start` to `goal`.
///
/// Never fails loudly: an unreachable goal, a blown iteration cap, or a
/// start that already is the goal all return an empty path. A goal cell over
/// a drop deeper than `max_fall_distance` counts as unreachable.
pub fn find_path<W: BlockAccess + ?Sized>(
    world: &W,
    start: BlockPos,
    goal: BlockPos,
    config: &PathfindingConfig,
) -> SearchResult {
    if start == goal {
        return SearchResult {
            path: Path::empty(goal),
            outcome: SearchOutcome::AlreadyThere,
            expanded: 0,
        };
    }

    let mut evaluator = PathNodeEvaluator::new(config);
    let mut nodes: HashMap<BlockPos, PathNode> = HashMap::new();
    let mut closed: HashSet<BlockPos> = HashSet::new();
    let mut open = BinaryHeap::new();

    let mut start_node = PathNode::new(start, NodeKind::Walkable, 0.0);
    let h = heuristic(start, goal);
    start_node.set_costs(0.0, h);
    nodes.insert(start, start_node);
    open.push(OpenEntry {
        pos: start,
        f_cost: h,
        h_cost: h,
    });

    let max_fall = config.max_fall_distance as i32;
    let mut expanded = 0;
    let mut outcome = SearchOutcome::Exhausted;

    while let Some(entry) = open.pop() {
        if !closed.insert(entry.pos) {
            continue; // stale duplicate
        }
        expanded += 1;
        if expanded > config.max_iterations {
            outcome = SearchOutcome::IterationCap;
            break;
        }

        let Some(current) = nodes.get(&entry.pos).cloned() else {
            continue;
        };

        if reached(current.pos, goal) && current.kind != NodeKind::Cliff {
            let path = reconstruct(&nodes, current.pos, goal);
            debug!(
                "Path {} -> {}: {} nodes, cost {:.2}, {} expanded",
                start,
                goal,
                path.len(),
                path.total_cost(),
                expanded
            );
            return SearchResult {
                path,
                outcome: SearchOutcome::Found,
                expanded,
            };
        }

        if !current.kind.is_expandable() || current.depth >= config.max_path_length {
            continue;
        }

        for (dx, dz) in LATERAL {
            let diagonal = dx != 0 && dz != 0;
            if diagonal && cuts_corner(world, current.pos, dx, dz) {
                continue;
            }

            for dy in (-max_fall..=1).rev() {
                let raw = current.pos.offset(dx, dy, dz);
                if dy == 1 && !has_jump_clearance(world, current.pos) {
                    continue;
                }
                if dy < 0 && !drop_column_clear(world, raw, current.pos.y) {
                    continue;
                }

                let class = evaluator.classify(world, raw);
                let rise = class.pos.y - current.pos.y;
                if rise > 1 || rise < -max_fall || !class.kind.is_traversable() {
                    continue;
                }
                if closed.contains(&class.pos) {
                    continue;
                }

                let mut step = if diagonal { std::f32::consts::SQRT_2 } else { 1.0 };
                if rise > 0 {
                    step += config.step_up_cost;
                }
                let g = current.g_cost + step + class.penalty;

                let node = nodes
                    .entry(class.pos)
                    .or_insert_with(|| PathNode::new(class.pos, class.kind, class.penalty));
                if g >= node.g_cost {
                    continue;
                }
                let h = heuristic(class.pos, goal);
                node.set_costs(g, h);
                node.parent = Some(current.pos);
                node.depth = current.depth + 1;
                open.push(OpenEntry {
                    pos: class.pos,
                    f_cost: node.f_cost,
                    h_cost: h,
                });
            }
        }
    }

    debug!(
        "No path {} -> {} ({:?}, {} expanded, {} cells classified)",
        start,
        goal,
        outcome,
        expanded,
        evaluator.cached()
    );
    SearchResult {
        path: Path::empty(goal),
        outcome,
        expanded,
    }
}

/// Diagonal moves may not clip the corner of a blocked orthogonal cell
fn cuts_corner<W: BlockAccess + ?Sized>(world: &W, pos: BlockPos, dx: i32, dz: i32) -> bool {
    let blocked = |cell: BlockPos| {
        let feet = world.properties(cell);
        let head = world.properties(cell.up());
        (feet.solid && !feet.door) || (head.solid && !head.door)
    };
    blocked(pos.offset(dx, 0, 0)) || blocked(pos.offset(0, 0, dz))
}

/// Stepping up needs room above the head for the jump
fn has_jump_clearance<W: BlockAccess + ?Sized>(world: &W, pos: BlockPos) -> bool {
    !world.is_solid(pos.offset(0, 2, 0))
}

/// Dropping into `target` means walking over its column at the current
/// height and falling down through it
fn drop_column_clear<W: BlockAccess + ?Sized>(world: &W, target: BlockPos, from_y: i32) -> bool {
    (target.y..=from_y + 1).all(|y| {
        let props = world.properties(BlockPos::new(target.x, y, target.z));
        !props.solid || props.door
    })
}

fn reconstruct(nodes: &HashMap<BlockPos, PathNode>, end: BlockPos, goal: BlockPos) -> Path {
    let mut chain = Vec::new();
    let mut cursor = Some(end);
    while let Some(pos) = cursor {
        let Some(node) = nodes.get(&pos) else {
            break;
        };
        // The start node has no parent and is not part of the plan
        if node.parent.is_none() {
            break;
        }
        chain.push(node.clone());
        cursor = node.parent;
    }
    chain.reverse();
    Path::new(chain, goal)
}
