//! Escape goal: climb out when boxed in on three or more sides for too long

use critter_core::BlockPos;
use glam::Vec3;
use rand::rngs::StdRng;

use super::sampling::DestinationSampler;
use super::{Decision, Goal, GoalContext, Senses};
use crate::probes::count_blocked_sides;

/// Walk out of a pit or dead end after being hemmed in for a while
#[derive(Debug, Clone)]
pub struct EscapeGoal {
    priority: u32,
    speed: f32,
    /// Blocked lateral sides that count as confinement
    min_blocked_sides: usize,
    /// Consecutive confined ticks before escaping
    threshold: u32,
    confined_ticks: u32,
    sampler: DestinationSampler,
    destination: Option<Vec3>,
}

impl EscapeGoal {
    pub fn new(priority: u32, speed: f32) -> Self {
        Self {
            priority,
            speed,
            min_blocked_sides: 3,
            threshold: 40,
            confined_ticks: 0,
            sampler: DestinationSampler::new(3.0, 8.0).with_attempts(16),
            destination: None,
        }
    }

    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn confined_ticks(&self) -> u32 {
        self.confined_ticks
    }
}

impl Goal for EscapeGoal {
    fn name(&self) -> &'static str {
        "escape"
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn is_exclusive(&self) -> bool {
        true
    }

    fn sense(&mut self, senses: &Senses<'_>) {
        let cell = BlockPos::from_vec3(senses.body.position());
        if count_blocked_sides(senses.world, cell) >= self.min_blocked_sides {
            self.confined_ticks = self.confined_ticks.saturating_add(1);
        } else {
            self.confined_ticks = 0;
        }
    }

    fn evaluate(&self, senses: &Senses<'_>, rng: &mut StdRng) -> Option<Decision> {
        if self.confined_ticks < self.threshold {
            return None;
        }
        let sample = self.sampler.pick(
            senses.world,
            senses.body.position(),
            None,
            senses.config.pathfinding.max_fall_distance,
            &senses.config.probes,
            rng,
        );
        Some(Decision::Destination(sample.point))
    }

    fn can_continue(&self, senses: &Senses<'_>, _rng: &mut StdRng) -> bool {
        !senses.navigator.is_idle() && !senses.navigator.is_blocked()
    }

    fn commit(&mut self, decision: Decision) {
        if let Decision::Destination(point) = decision {
            self.destination = Some(point);
        }
    }

    fn on_start(&mut self, ctx: &mut GoalContext<'_>) {
        if let Some(destination) = self.destination {
            ctx.navigator.navigate_to(destination, self.speed);
        }
    }

    fn on_stop(&mut self, ctx: &mut GoalContext<'_>) {
        self.destination = None;
        self.confined_ticks = 0;
        ctx.halt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::fixtures::Harness;
    use critter_physics::MobBody;
    use critter_world::{Block, VoxelWorld};

    /// Floor with a dead-end nook around the origin, open toward -x
    fn nook() -> VoxelWorld {
        let mut world = VoxelWorld::new();
        world.fill(BlockPos::new(-20, 63, -20), BlockPos::new(20, 63, 20), Block::Stone);
        world.fill(BlockPos::new(1, 64, -1), BlockPos::new(1, 65, 1), Block::Stone);
        world.fill(BlockPos::new(0, 64, 1), BlockPos::new(0, 65, 1), Block::Stone);
        world.fill(BlockPos::new(0, 64, -1), BlockPos::new(0, 65, -1), Block::Stone);
        world
    }

    #[test]
    fn test_triggers_after_sustained_confinement() {
        let mut harness = Harness::with_world(nook(), Vec3::new(0.5, 64.0, 0.5));
        let mut goal = EscapeGoal::new(2, 1.0).with_threshold(5);

        for _ in 0..4 {
            assert!(harness.evaluate(&mut goal).is_none());
        }
        assert!(harness.start(&mut goal));
        assert_eq!(goal.confined_ticks(), 5);
        assert!(!harness.navigator.is_idle());
    }

    #[test]
    fn test_open_ground_resets_counter() {
        let mut harness = Harness::with_world(nook(), Vec3::new(0.5, 64.0, 0.5));
        let mut goal = EscapeGoal::new(2, 1.0).with_threshold(5);
        for _ in 0..3 {
            harness.evaluate(&mut goal);
        }
        assert_eq!(goal.confined_ticks(), 3);

        harness.body.set_position(Vec3::new(-5.5, 64.0, 0.5));
        harness.evaluate(&mut goal);
        assert_eq!(goal.confined_ticks(), 0);
    }

    #[test]
    fn test_escapes_the_nook() {
        let mut harness = Harness::with_world(nook(), Vec3::new(0.5, 64.0, 0.5));
        let mut goal = EscapeGoal::new(2, 1.0).with_threshold(1);
        assert!(harness.start(&mut goal));

        for _ in 0..200 {
            if !harness.can_continue(&mut goal) {
                break;
            }
            harness.on_tick(&mut goal);
            harness.step_body();
        }
        let cell = BlockPos::from_vec3(harness.body.position());
        assert!(count_blocked_sides(&harness.world, cell) < 3, "still stuck at {cell}");
    }
}
