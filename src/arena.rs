//! Demo arena for the sandbox driver

use critter_ai::MobKind;
use critter_core::{BlockPos, EntityId};
use critter_world::{Block, EntityKind, EntityRecord, VoxelWorld, WorldError};
use glam::Vec3;

/// Half extent of the walled floor
const HALF: i32 = 16;
const FLOOR_Y: i32 = 63;

/// Fenced pen with a door on its south side, painted at `PEN_ORIGIN`
const PEN_ORIGIN: BlockPos = BlockPos::new(4, 64, -12);
const PEN: [&str; 2] = [
    "FFFFFF\nF....F\nF....F\nFFDFFF",
    "......\n......\n......\n..D...",
];

/// Pool of water and a strip of lava sunk into the floor
const POOL_ORIGIN: BlockPos = BlockPos::new(-12, FLOOR_Y, -4);
const POOL: [&str; 1] = ["wwwwg\nwwwwg\nwwwwg\nggggg\nllllg"];

/// Build the walled arena: a grass floor on stone, a water pool, a lava
/// strip, a fenced pen, and a one-block hole to get stuck in
pub fn build() -> Result<VoxelWorld, WorldError> {
    let mut world = VoxelWorld::new();
    world.fill(
        BlockPos::new(-HALF, FLOOR_Y - 2, -HALF),
        BlockPos::new(HALF, FLOOR_Y - 1, HALF),
        Block::Stone,
    );
    world.fill(
        BlockPos::new(-HALF, FLOOR_Y, -HALF),
        BlockPos::new(HALF, FLOOR_Y, HALF),
        Block::Grass,
    );
    for (a, b) in [
        (BlockPos::new(-HALF, 64, -HALF), BlockPos::new(HALF, 65, -HALF)),
        (BlockPos::new(-HALF, 64, HALF), BlockPos::new(HALF, 65, HALF)),
        (BlockPos::new(-HALF, 64, -HALF), BlockPos::new(-HALF, 65, HALF)),
        (BlockPos::new(HALF, 64, -HALF), BlockPos::new(HALF, 65, HALF)),
    ] {
        world.fill(a, b, Block::Stone);
    }

    world.paint_layers(POOL_ORIGIN, &POOL)?;
    world.paint_layers(PEN_ORIGIN, &PEN)?;
    world.set_block(hole(), Block::Air);
    Ok(world)
}

/// The one-block hole the animal starts in
fn hole() -> BlockPos {
    BlockPos::new(-8, FLOOR_Y, 8)
}

/// Where each preset starts
pub fn spawn_points() -> Vec<(MobKind, Vec3)> {
    vec![
        (MobKind::Zombie, Vec3::new(-8.5, 64.0, -8.5)),
        (MobKind::Skeleton, Vec3::new(10.5, 64.0, 10.5)),
        (MobKind::Creeper, Vec3::new(-3.5, 64.0, 9.5)),
        (MobKind::Animal, hole().bottom_center()),
    ]
}

/// Register a sturdy player stand-in for the hostiles to chase
pub fn spawn_dummy(world: &mut VoxelWorld) -> EntityId {
    world.spawn_entity(EntityRecord::new(
        EntityId::from_u128(0xd0d0),
        EntityKind::Player,
        Vec3::new(0.5, 64.0, 0.5),
        500.0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use critter_world::BlockAccess;

    #[test]
    fn test_arena_features() {
        let world = build().unwrap();
        assert!(world.is_liquid(BlockPos::new(-12, FLOOR_Y, -4)));
        assert!(world.is_hazard(BlockPos::new(-12, FLOOR_Y, 0)));
        assert!(world.is_door(BlockPos::new(6, 65, -9)));
        assert!(world.is_fence(BlockPos::new(4, 64, -12)));
        assert!(!world.is_solid(hole()));
        assert!(world.is_solid(hole().down()));
    }

    #[test]
    fn test_spawn_points_are_open() {
        let world = build().unwrap();
        for (kind, point) in spawn_points() {
            let cell = BlockPos::from_vec3(point);
            assert!(!world.is_solid(cell), "{kind} spawns inside a block");
            assert!(world.is_solid(cell.down()), "{kind} spawns in the air");
        }
    }
}
