//! Ranged attack goal: keep a distance band and shoot on a cooldown

use critter_core::math::{direction_between, direction_from_yaw, horizontal_distance, yaw_toward};
use critter_core::{BlockPos, EntityId};
use critter_world::EntitySnapshot;
use glam::Vec3;
use rand::rngs::StdRng;

use super::{Decision, Goal, GoalContext, Senses};
use crate::probes::try_safe_direction;

/// Keep the target inside a distance band and shoot at it on a cooldown
#[derive(Debug, Clone)]
pub struct RangedGoal {
    priority: u32,
    speed: f32,
    min_range: f32,
    max_range: f32,
    attack_interval: u32,
    projectile_speed: f32,
    follow_range: f32,

    target: Option<EntityId>,
    cooldown: u32,
    chase_cell: Option<BlockPos>,
}

impl RangedGoal {
    pub fn new(priority: u32, speed: f32, min_range: f32, max_range: f32) -> Self {
        Self {
            priority,
            speed,
            min_range,
            max_range: max_range.max(min_range),
            attack_interval: 40,
            projectile_speed: 1.6,
            follow_range: 32.0,
            target: None,
            cooldown: 0,
            chase_cell: None,
        }
    }

    pub fn with_attack_interval(mut self, ticks: u32) -> Self {
        self.attack_interval = ticks.max(1);
        self
    }

    fn approach(&mut self, ctx: &mut GoalContext<'_>, target: &EntitySnapshot) {
        let cell = BlockPos::from_vec3(target.position);
        if self.chase_cell != Some(cell) || ctx.navigator.is_idle() {
            ctx.navigator.navigate_to(target.position, self.speed);
            self.chase_cell = Some(cell);
        }
    }

    fn back_away(&mut self, ctx: &mut GoalContext<'_>, target: &EntitySnapshot) {
        self.chase_cell = None;
        ctx.navigator.stop();
        let position = ctx.body.position();
        let safe = yaw_toward(target.position, position).and_then(|away| {
            try_safe_direction(
                &*ctx.world,
                position,
                away,
                ctx.config.pathfinding.max_fall_distance,
                &ctx.config.probes,
            )
        });
        match safe {
            Some(yaw) => ctx
                .move_control
                .set_target(position + direction_from_yaw(yaw) * 2.0, self.speed),
            None => ctx.halt(),
        }
    }

    fn hold_position(&mut self, ctx: &mut GoalContext<'_>) {
        self.chase_cell = None;
        ctx.halt();
    }

    fn shoot(&mut self, ctx: &mut GoalContext<'_>, target: &EntitySnapshot) {
        let origin = ctx.body.eye_position();
        let Some(dir) = direction_between(origin, target.eye_position()) else {
            return;
        };
        ctx.body.perform_attack();
        ctx.world
            .spawn_projectile(ctx.self_id, origin, dir * self.projectile_speed);
        self.cooldown = self.attack_interval;
    }
}

impl Goal for RangedGoal {
    fn name(&self) -> &'static str {
        "ranged"
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn is_exclusive(&self) -> bool {
        true
    }

    fn evaluate(&self, senses: &Senses<'_>, _rng: &mut StdRng) -> Option<Decision> {
        let target = senses.target()?;
        (target.position.distance(senses.body.position()) <= self.follow_range)
            .then_some(Decision::Target(target.id))
    }

    fn can_continue(&self, senses: &Senses<'_>, _rng: &mut StdRng) -> bool {
        senses.target().is_some_and(|target| {
            Some(target.id) == self.target
                && target.position.distance(senses.body.position()) <= self.follow_range
        })
    }

    fn commit(&mut self, decision: Decision) {
        if let Decision::Target(id) = decision {
            self.target = Some(id);
        }
    }

    fn on_tick(&mut self, ctx: &mut GoalContext<'_>) {
        let Some(target) = ctx.target() else {
            ctx.halt();
            return;
        };
        ctx.body.look_at(target.eye_position());
        self.cooldown = self.cooldown.saturating_sub(1);

        let distance = horizontal_distance(ctx.body.position(), target.position);
        let visible = ctx.can_see(target.eye_position());
        if distance > self.max_range || !visible {
            self.approach(ctx, &target);
        } else if distance < self.min_range {
            self.back_away(ctx, &target);
        } else {
            self.hold_position(ctx);
        }

        if self.cooldown == 0 && visible && distance <= self.max_range {
            self.shoot(ctx, &target);
        }
    }

    fn on_stop(&mut self, ctx: &mut GoalContext<'_>) {
        self.target = None;
        self.chase_cell = None;
        ctx.halt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::fixtures::Harness;
    use critter_physics::MobBody;
    use critter_world::{Block, EntityKind, EntityRecord, VoxelWorld};

    fn with_target(harness: &mut Harness, position: Vec3) -> EntityId {
        let id = harness.world.spawn_entity(EntityRecord::new(
            EntityId::from_u128(88),
            EntityKind::Player,
            position,
            20.0,
        ));
        harness.memory.target = Some(id);
        id
    }

    #[test]
    fn test_fires_from_inside_band() {
        let mut harness = Harness::flat();
        with_target(&mut harness, Vec3::new(8.5, 64.0, 0.5));
        let mut goal = RangedGoal::new(4, 1.0, 4.0, 12.0).with_attack_interval(10);
        assert!(harness.start(&mut goal));

        harness.on_tick(&mut goal);
        assert_eq!(harness.world.projectiles().len(), 1);
        let shot = harness.world.projectiles()[0];
        assert_eq!(shot.owner, harness.id);
        assert!(shot.velocity.x > 0.0 && shot.velocity.is_finite());
        assert!(harness.navigator.is_idle());

        for _ in 0..9 {
            harness.on_tick(&mut goal);
        }
        assert_eq!(harness.world.projectiles().len(), 1);
        harness.on_tick(&mut goal);
        assert_eq!(harness.world.projectiles().len(), 2);
    }

    #[test]
    fn test_closes_distance_when_far_or_blind() {
        let mut harness = Harness::flat();
        with_target(&mut harness, Vec3::new(16.5, 64.0, 0.5));
        let mut goal = RangedGoal::new(4, 1.0, 4.0, 12.0);
        assert!(harness.start(&mut goal));
        harness.on_tick(&mut goal);
        assert!(harness.world.projectiles().is_empty());
        assert!(harness.navigator.destination().is_some());

        let mut harness = Harness::flat();
        harness
            .world
            .fill(BlockPos::new(3, 64, -3), BlockPos::new(3, 66, 3), Block::Stone);
        with_target(&mut harness, Vec3::new(6.5, 64.0, 0.5));
        assert!(harness.start(&mut goal));
        harness.on_tick(&mut goal);
        assert!(harness.world.projectiles().is_empty());
        assert!(harness.navigator.destination().is_some());
    }

    #[test]
    fn test_backs_away_when_too_close() {
        let mut harness = Harness::flat();
        with_target(&mut harness, Vec3::new(2.5, 64.0, 0.5));
        let mut goal = RangedGoal::new(4, 1.0, 4.0, 12.0);
        assert!(harness.start(&mut goal));
        harness.on_tick(&mut goal);

        let retreat = harness.move_control.target().expect("backing away");
        assert!(retreat.x < harness.body.position().x);
        assert!(harness.navigator.is_idle());
    }

    #[test]
    fn test_cornered_on_pillar_halts() {
        let mut world = VoxelWorld::new();
        world.set_block(BlockPos::new(0, 63, 0), Block::Stone);
        let mut harness = Harness::with_world(world, Vec3::new(0.5, 64.0, 0.5));
        with_target(&mut harness, Vec3::new(2.5, 64.0, 0.5));
        let mut goal = RangedGoal::new(4, 1.0, 4.0, 12.0);
        assert!(harness.start(&mut goal));
        harness.on_tick(&mut goal);

        assert!(!harness.move_control.has_target());
        assert!(harness.navigator.is_idle());
    }
}
