//! Query traits the AI consumes from the world layer

use critter_core::{BlockPos, EntityId};
use glam::Vec3;

use crate::block::{Block, BlockProperties};
use crate::entity::EntitySnapshot;

/// Read access to the block grid.
///
/// `None` means the cell is unloaded or outside the world; every derived
/// query treats it as passable, see-through air.
pub trait BlockAccess {
    fn block(&self, pos: BlockPos) -> Option<Block>;

    fn properties(&self, pos: BlockPos) -> BlockProperties {
        self.block(pos)
            .map(Block::properties)
            .unwrap_or(BlockProperties::VOID)
    }

    fn is_solid(&self, pos: BlockPos) -> bool {
        self.properties(pos).solid
    }

    /// Whether the cell stops a sight line (solid and not transparent)
    fn is_opaque(&self, pos: BlockPos) -> bool {
        let props = self.properties(pos);
        props.solid && !props.transparent
    }

    fn is_hazard(&self, pos: BlockPos) -> bool {
        self.properties(pos).hazard
    }

    fn is_liquid(&self, pos: BlockPos) -> bool {
        self.properties(pos).liquid
    }

    fn is_fence(&self, pos: BlockPos) -> bool {
        self.properties(pos).fence
    }

    fn is_door(&self, pos: BlockPos) -> bool {
        self.properties(pos).door
    }
}

/// Access to other entities: lookup, proximity queries, and the few
/// outward actions a mob can take on them.
pub trait EntityAccess {
    fn entity(&self, id: EntityId) -> Option<EntitySnapshot>;

    /// Living entities whose position lies within `radius` of `center`
    fn entities_near(&self, center: Vec3, radius: f32) -> Vec<EntitySnapshot>;

    /// Apply damage and a knockback impulse to `target`
    fn damage(&mut self, target: EntityId, source: Option<EntityId>, amount: f32, knockback: Vec3);

    fn spawn_projectile(&mut self, owner: EntityId, origin: Vec3, velocity: Vec3);
}

/// Everything a mob tick needs from the outside world
pub trait World: BlockAccess + EntityAccess {}

impl<T: BlockAccess + EntityAccess + ?Sized> World for T {}
