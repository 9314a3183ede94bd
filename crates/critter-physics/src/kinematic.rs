//! Kinematic body with axis-separated voxel collision

use critter_core::math::{direction_from_yaw, yaw_toward};
use critter_core::BlockPos;
use critter_world::BlockAccess;
use glam::Vec3;

use crate::body::MobBody;

/// Largest distance moved along one axis before re-checking collision
const SUBSTEP: f32 = 0.05;
const SKIN: f32 = 1.0e-3;

/// Body configuration, in blocks and ticks
#[derive(Debug, Clone)]
pub struct BodyConfig {
    /// Bounding box width (default: 0.6)
    pub width: f32,
    /// Bounding box height (default: 1.8)
    pub height: f32,
    /// Walk speed at speed factor 1.0, blocks per tick
    pub move_speed: f32,
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Upward velocity applied by a grounded jump
    pub jump_velocity: f32,
    /// Upward velocity applied by a jump while in liquid
    pub swim_velocity: f32,
    /// Fastest possible fall, blocks per tick
    pub terminal_velocity: f32,
    /// Fraction of knockback impulse kept each tick
    pub impulse_decay: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            width: 0.6,
            height: 1.8,
            move_speed: 0.2,
            gravity: 0.08,
            jump_velocity: 0.42,
            swim_velocity: 0.06,
            terminal_velocity: 3.9,
            impulse_decay: 0.6,
        }
    }
}

/// Body for mobs and fixtures, stepped once per tick by the driver
#[derive(Debug, Clone)]
pub struct KinematicBody {
    /// Configuration
    pub config: BodyConfig,
    position: Vec3,
    /// Vertical velocity plus decaying knockback; walking is applied on top
    velocity: Vec3,
    yaw: f32,
    move_intent: Option<(f32, f32)>,
    jump_requested: bool,
    on_ground: bool,
    collided_horizontally: bool,
    in_liquid: bool,
    /// Last point passed to `look_at`
    pub look_target: Option<Vec3>,
    /// How many times `perform_attack` was called
    pub attack_count: u32,
    /// How many jumps actually left the ground (or liquid)
    pub jump_count: u32,
}

impl KinematicBody {
    pub fn new(position: Vec3) -> Self {
        Self::with_config(position, BodyConfig::default())
    }

    pub fn with_config(position: Vec3, config: BodyConfig) -> Self {
        Self {
            config,
            position,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            move_intent: None,
            jump_requested: false,
            on_ground: false,
            collided_horizontally: false,
            in_liquid: false,
            look_target: None,
            attack_count: 0,
            jump_count: 0,
        }
    }

    /// Set the position directly (teleport)
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Current walk intent as (yaw, speed factor)
    pub fn move_intent(&self) -> Option<(f32, f32)> {
        self.move_intent
    }

    /// Integrate one tick of motion against the block grid
    pub fn step<W: BlockAccess + ?Sized>(&mut self, world: &W) {
        self.in_liquid = self.touches_liquid(world);

        if self.jump_requested {
            if self.in_liquid {
                self.velocity.y = self.velocity.y.max(self.config.swim_velocity);
                self.jump_count += 1;
            } else if self.on_ground {
                self.velocity.y = self.config.jump_velocity;
                self.jump_count += 1;
            }
            self.jump_requested = false;
        }

        let walk = match self.move_intent {
            Some((yaw, factor)) => direction_from_yaw(yaw) * self.config.move_speed * factor,
            None => Vec3::ZERO,
        };
        let mut motion = walk + Vec3::new(self.velocity.x, 0.0, self.velocity.z);
        motion.y = self.velocity.y;

        let moved_y = self.move_axis(world, 1, motion.y);
        if moved_y + SKIN < motion.y.abs() {
            self.velocity.y = 0.0;
        }
        self.on_ground = self.resting_on_ground(world);

        let moved_x = self.move_axis(world, 0, motion.x);
        let moved_z = self.move_axis(world, 2, motion.z);
        self.collided_horizontally =
            moved_x + SKIN < motion.x.abs() || moved_z + SKIN < motion.z.abs();

        if self.in_liquid {
            self.velocity.y = (self.velocity.y - self.config.gravity * 0.25) * 0.8;
        } else {
            self.velocity.y = (self.velocity.y - self.config.gravity) * 0.98;
        }
        self.velocity.y = self.velocity.y.max(-self.config.terminal_velocity);
        self.velocity.x *= self.config.impulse_decay;
        self.velocity.z *= self.config.impulse_decay;
    }

    /// Move along one axis in substeps; returns the distance actually covered
    fn move_axis<W: BlockAccess + ?Sized>(&mut self, world: &W, axis: usize, delta: f32) -> f32 {
        if delta == 0.0 {
            return 0.0;
        }
        let sign = delta.signum();
        let mut remaining = delta.abs();
        let mut covered = 0.0;

        while remaining > 0.0 {
            let step = remaining.min(SUBSTEP);
            let mut candidate = self.position;
            candidate[axis] += step * sign;
            if self.collides_at(world, candidate) {
                if axis == 1 && sign < 0.0 {
                    // Land flush on the block top
                    let snapped = Vec3::new(candidate.x, candidate.y.ceil(), candidate.z);
                    if !self.collides_at(world, snapped) {
                        covered += (self.position.y - snapped.y).abs();
                        self.position = snapped;
                    }
                }
                return covered;
            }
            self.position = candidate;
            covered += step;
            remaining -= step;
        }
        covered
    }

    fn cells_overlapping(&self, pos: Vec3) -> impl Iterator<Item = BlockPos> {
        let half = self.config.width / 2.0;
        let min = Vec3::new(pos.x - half + SKIN, pos.y + SKIN, pos.z - half + SKIN);
        let max = Vec3::new(
            pos.x + half - SKIN,
            pos.y + self.config.height - SKIN,
            pos.z + half - SKIN,
        );
        let min = BlockPos::from_vec3(min);
        let max = BlockPos::from_vec3(max);
        (min.x..=max.x).flat_map(move |x| {
            (min.y..=max.y).flat_map(move |y| (min.z..=max.z).map(move |z| BlockPos::new(x, y, z)))
        })
    }

    fn collides_at<W: BlockAccess + ?Sized>(&self, world: &W, pos: Vec3) -> bool {
        // Doors count as open for walking mobs
        self.cells_overlapping(pos).any(|cell| {
            let props = world.properties(cell);
            props.solid && !props.door
        })
    }

    fn resting_on_ground<W: BlockAccess + ?Sized>(&self, world: &W) -> bool {
        let probe = self.position - Vec3::new(0.0, SKIN * 2.0, 0.0);
        self.velocity.y <= 0.0 && self.collides_at(world, probe)
    }

    fn touches_liquid<W: BlockAccess + ?Sized>(&self, world: &W) -> bool {
        self.cells_overlapping(self.position)
            .any(|cell| world.is_liquid(cell))
    }
}

impl MobBody for KinematicBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn width(&self) -> f32 {
        self.config.width
    }

    fn height(&self) -> f32 {
        self.config.height
    }

    fn yaw(&self) -> f32 {
        self.yaw
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn is_on_ground(&self) -> bool {
        self.on_ground
    }

    fn is_collided_horizontally(&self) -> bool {
        self.collided_horizontally
    }

    fn is_in_liquid(&self) -> bool {
        self.in_liquid
    }

    fn set_move_direction(&mut self, yaw: f32, speed_factor: f32) {
        self.yaw = yaw;
        self.move_intent = Some((yaw, speed_factor.max(0.0)));
    }

    fn stop_moving(&mut self) {
        self.move_intent = None;
    }

    fn jump(&mut self) {
        self.jump_requested = true;
    }

    fn look_at(&mut self, target: Vec3) {
        self.look_target = Some(target);
        if self.move_intent.is_none() {
            if let Some(yaw) = yaw_toward(self.position, target) {
                self.yaw = yaw;
            }
        }
    }

    fn perform_attack(&mut self) {
        self.attack_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use critter_world::{Block, VoxelWorld};

    fn floor_world() -> VoxelWorld {
        let mut world = VoxelWorld::new();
        world.fill(BlockPos::new(-5, 63, -5), BlockPos::new(20, 63, 5), Block::Stone);
        world
    }

    fn settle(body: &mut KinematicBody, world: &VoxelWorld, ticks: usize) {
        for _ in 0..ticks {
            body.step(world);
        }
    }

    #[test]
    fn test_body_config_defaults() {
        let config = BodyConfig::default();
        assert_eq!(config.width, 0.6);
        assert_eq!(config.height, 1.8);
    }

    #[test]
    fn test_falls_and_lands_on_floor() {
        let world = floor_world();
        let mut body = KinematicBody::new(Vec3::new(0.5, 68.0, 0.5));
        settle(&mut body, &world, 60);
        assert!(body.is_on_ground());
        assert!((body.position().y - 64.0).abs() < 1e-4, "y = {}", body.position().y);
    }

    #[test]
    fn test_walks_along_yaw() {
        let world = floor_world();
        let mut body = KinematicBody::new(Vec3::new(0.5, 64.0, 0.5));
        settle(&mut body, &world, 2);
        body.set_move_direction(0.0, 1.0);
        settle(&mut body, &world, 10);
        assert!(body.position().x > 2.0);
        assert!((body.position().z - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_wall_sets_horizontal_collision() {
        let mut world = floor_world();
        world.fill(BlockPos::new(3, 64, -5), BlockPos::new(3, 66, 5), Block::Stone);
        let mut body = KinematicBody::new(Vec3::new(0.5, 64.0, 0.5));
        body.set_move_direction(0.0, 1.0);
        settle(&mut body, &world, 30);
        assert!(body.is_collided_horizontally());
        assert!(body.position().x < 3.0 - body.width() / 2.0 + 1e-3);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let world = floor_world();
        let mut body = KinematicBody::new(Vec3::new(0.5, 64.0, 0.5));
        settle(&mut body, &world, 2);
        body.jump();
        body.step(&world);
        assert_eq!(body.jump_count, 1);
        assert!(body.position().y > 64.0);

        // Mid-air jump requests are ignored
        body.jump();
        body.step(&world);
        assert_eq!(body.jump_count, 1);
    }

    #[test]
    fn test_door_is_passable() {
        let mut world = floor_world();
        world.fill(BlockPos::new(3, 64, -5), BlockPos::new(3, 65, 5), Block::Door);
        let mut body = KinematicBody::new(Vec3::new(0.5, 64.0, 0.5));
        body.set_move_direction(0.0, 1.0);
        settle(&mut body, &world, 30);
        assert!(body.position().x > 4.0);
    }
}
