//! Wander goal: idle strolls to sampled nearby points

use glam::Vec3;
use rand::rngs::StdRng;
use rand::Rng;

use super::sampling::DestinationSampler;
use super::{Decision, Goal, GoalContext, Senses};

/// Stroll to a random nearby point now and then
#[derive(Debug, Clone)]
pub struct WanderGoal {
    priority: u32,
    speed: f32,
    /// One-in-`interval` chance per tick of setting off
    interval: u32,
    sampler: DestinationSampler,
    destination: Option<Vec3>,
}

impl WanderGoal {
    pub fn new(priority: u32, speed: f32) -> Self {
        Self {
            priority,
            speed,
            interval: 120,
            sampler: DestinationSampler::new(3.0, 10.0),
            destination: None,
        }
    }

    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval.max(1);
        self
    }

    pub fn with_sampler(mut self, sampler: DestinationSampler) -> Self {
        self.sampler = sampler;
        self
    }
}

impl Goal for WanderGoal {
    fn name(&self) -> &'static str {
        "wander"
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn evaluate(&self, senses: &Senses<'_>, rng: &mut StdRng) -> Option<Decision> {
        if !senses.navigator.is_idle() || rng.gen_range(0..self.interval) != 0 {
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
        ctx.halt();
    }
}
