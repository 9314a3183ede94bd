//! Cell classification for the planner

use std::collections::HashMap;

use critter_core::BlockPos;
use critter_world::BlockAccess;

use super::node::NodeKind;
use crate::config::PathfindingConfig;

/// Result of classifying one candidate cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Where a body would actually stand; differs from the requested cell
    /// when it drops to a landing surface
    pub pos: BlockPos,
    pub kind: NodeKind,
    pub penalty: f32,
}

/// Classifies cells for one search, remembering each answer by the
/// requested coordinate
pub struct PathNodeEvaluator<'a> {
    config: &'a PathfindingConfig,
    cache: HashMap<BlockPos, Classification>,
}

impl<'a> PathNodeEvaluator<'a> {
    pub fn new(config: &'a PathfindingConfig) -> Self {
        Self {
            config,
            cache: HashMap::new(),
        }
    }

    /// Number of distinct cells classified so far
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    pub fn classify<W: BlockAccess + ?Sized>(&mut self, world: &W, pos: BlockPos) -> Classification {
        if let Some(found) = self.cache.get(&pos) {
            return *found;
        }
        let result = self.evaluate(world, pos);
        self.cache.insert(pos, result);
        result
    }

    fn evaluate<W: BlockAccess + ?Sized>(&self, world: &W, requested: BlockPos) -> Classification {
        let cfg = self.config;
        let mut pos = requested;

        // Swimmers float; anything else in open air falls to what is below
        if !world.is_solid(pos) && !world.is_solid(pos.down()) && !world.is_liquid(pos) {
            match landing(world, pos, cfg.max_fall_distance) {
                Some(landed) => pos = landed,
                None => {
                    return Classification {
                        pos,
                        kind: NodeKind::Cliff,
                        penalty: cfg.cliff_penalty,
                    }
                }
            }
        }

        let ground = world.properties(pos.down());
        let feet = world.properties(pos);
        let head = world.properties(pos.up());

        let (kind, penalty) = if (feet.solid && !feet.door) || (head.solid && !head.door) {
            (NodeKind::Blocked, 0.0)
        } else if ground.hazard || feet.hazard {
            (NodeKind::Dangerous, cfg.danger_penalty)
        } else if feet.liquid {
            (NodeKind::Water, cfg.water_penalty)
        } else if ground.fence {
            (NodeKind::Fence, cfg.fence_penalty)
        } else if feet.door || head.door {
            (NodeKind::Door, cfg.door_penalty)
        } else {
            (NodeKind::Walkable, ground.friction_penalty)
        };

        Classification { pos, kind, penalty }
    }
}

/// Where a body dropped into `pos` comes to rest: on the first solid cell,
/// or in the first liquid, within `max_fall` cells
fn landing<W: BlockAccess + ?Sized>(world: &W, pos: BlockPos, max_fall: u32) -> Option<BlockPos> {
    (1..=max_fall as i32).find_map(|depth| {
        let cell = pos.offset(0, -depth, 0);
        let props = world.properties(cell);
        if props.solid {
            Some(cell.up())
        } else if props.liquid {
            Some(cell)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use critter_world::{Block, VoxelWorld};

    fn floor() -> VoxelWorld {
        let mut world = VoxelWorld::new();
        world.fill(BlockPos::new(0, 63, 0), BlockPos::new(10, 63, 10), Block::Grass);
        world
    }

    fn classify(world: &VoxelWorld, pos: BlockPos) -> Classification {
        let config = PathfindingConfig::default();
        PathNodeEvaluator::new(&config).classify(world, pos)
    }

    #[test]
    fn test_plain_ground_is_walkable() {
        let world = floor();
        let c = classify(&world, BlockPos::new(2, 64, 2));
        assert_eq!(c.kind, NodeKind::Walkable);
        assert_eq!(c.penalty, 0.0);
        assert_eq!(c.pos, BlockPos::new(2, 64, 2));
    }

    #[test]
    fn test_safe_drop_relocates_to_landing() {
        let world = floor();
        let c = classify(&world, BlockPos::new(2, 66, 2));
        assert_eq!(c.kind, NodeKind::Walkable);
        assert_eq!(c.pos, BlockPos::new(2, 64, 2));
    }

    #[test]
    fn test_deep_drop_is_cliff() {
        let world = floor();
        let c = classify(&world, BlockPos::new(2, 68, 2));
        assert_eq!(c.kind, NodeKind::Cliff);
        assert_eq!(c.pos, BlockPos::new(2, 68, 2));
        assert!(c.penalty >= 1000.0);
    }

    #[test]
    fn test_solid_feet_or_head_blocked() {
        let mut world = floor();
        world.set_block(BlockPos::new(3, 64, 3), Block::Stone);
        world.set_block(BlockPos::new(4, 65, 4), Block::Stone);
        assert_eq!(classify(&world, BlockPos::new(3, 64, 3)).kind, NodeKind::Blocked);
        assert_eq!(classify(&world, BlockPos::new(4, 64, 4)).kind, NodeKind::Blocked);
    }

    #[test]
    fn test_door_is_not_blocked() {
        let mut world = floor();
        world.fill(BlockPos::new(5, 64, 5), BlockPos::new(5, 65, 5), Block::Door);
        assert_eq!(classify(&world, BlockPos::new(5, 64, 5)).kind, NodeKind::Door);
    }

    #[test]
    fn test_hazards_liquids_and_fences() {
        let mut world = floor();
        world.set_block(BlockPos::new(1, 63, 1), Block::Magma);
        world.set_block(BlockPos::new(2, 64, 1), Block::Fire);
        world.set_block(BlockPos::new(3, 64, 1), Block::Water);
        world.set_block(BlockPos::new(4, 64, 1), Block::Lava);
        world.set_block(BlockPos::new(6, 64, 1), Block::Fence);
        world.set_block(BlockPos::new(7, 63, 1), Block::Ice);

        assert_eq!(classify(&world, BlockPos::new(1, 64, 1)).kind, NodeKind::Dangerous);
        assert_eq!(classify(&world, BlockPos::new(2, 64, 1)).kind, NodeKind::Dangerous);
        assert_eq!(classify(&world, BlockPos::new(3, 64, 1)).kind, NodeKind::Water);
        assert_eq!(classify(&world, BlockPos::new(4, 64, 1)).kind, NodeKind::Dangerous);
        assert_eq!(classify(&world, BlockPos::new(6, 65, 1)).kind, NodeKind::Fence);
        let ice = classify(&world, BlockPos::new(7, 64, 1));
        assert_eq!(ice.kind, NodeKind::Walkable);
        assert!(ice.penalty > 0.0);
    }

    #[test]
    fn test_drop_into_liquid_lands_in_it() {
        let mut world = floor();
        world.set_block(BlockPos::new(8, 63, 8), Block::Water);
        world.set_block(BlockPos::new(9, 63, 8), Block::Lava);
        let water = classify(&world, BlockPos::new(8, 64, 8));
        assert_eq!(water.kind, NodeKind::Water);
        assert_eq!(water.pos, BlockPos::new(8, 63, 8));
        assert_eq!(classify(&world, BlockPos::new(9, 64, 8)).kind, NodeKind::Dangerous);
    }

    #[test]
    fn test_cache_reuses_answers() {
        let world = floor();
        let config = PathfindingConfig::default();
        let mut evaluator = PathNodeEvaluator::new(&config);
        let a = evaluator.classify(&world, BlockPos::new(1, 64, 1));
        let b = evaluator.classify(&world, BlockPos::new(1, 64, 1));
        assert_eq!(a, b);
        assert_eq!(evaluator.cached(), 1);
    }
}
