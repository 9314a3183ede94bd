//! Panic goal: run from whoever hurt the mob until the scare wears off

use std::f32::consts::FRAC_PI_3;

use critter_core::math::{direction_from_yaw, yaw_toward};
use glam::Vec3;
use rand::rngs::StdRng;

use super::sampling::{DestinationSampler, Sample};
use super::{Decision, Goal, GoalContext, Senses};
use crate::probes::try_safe_direction;

/// Run away for a while after being hurt, biased away from the attacker
#[derive(Debug, Clone)]
pub struct PanicGoal {
    priority: u32,
    speed: f32,
    /// Ticks after the last hit during which the mob keeps fleeing
    duration: u64,
    sampler: DestinationSampler,
    destination: Option<Vec3>,
}

impl PanicGoal {
    pub fn new(priority: u32, speed: f32) -> Self {
        Self {
            priority,
            speed,
            duration: 100,
            sampler: DestinationSampler::new(4.0, 8.0),
            destination: None,
        }
    }

    pub fn with_duration(mut self, duration: u64) -> Self {
        self.duration = duration;
        self
    }

    fn panicking(&self, senses: &Senses<'_>) -> bool {
        senses.memory.hurt_within(senses.tick, self.duration)
    }

    /// Yaw pointing from the attacker to the mob, when the attacker is known
    fn away_yaw(senses: &Senses<'_>) -> Option<f32> {
        let attacker = senses.memory.last_attacker.and_then(|id| senses.world.entity(id))?;
        yaw_toward(attacker.position, senses.body.position())
    }

    fn pick(&self, senses: &Senses<'_>, rng: &mut StdRng) -> Sample {
        self.sampler.pick(
            senses.world,
            senses.body.position(),
            Self::away_yaw(senses).map(|yaw| (yaw, FRAC_PI_3)),
            senses.config.pathfinding.max_fall_distance,
            &senses.config.probes,
            rng,
        )
    }
}

impl Goal for PanicGoal {
    fn name(&self) -> &'static str {
        "panic"
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn is_exclusive(&self) -> bool {
        true
    }

    fn evaluate(&self, senses: &Senses<'_>, rng: &mut StdRng) -> Option<Decision> {
        if !self.panicking(senses) {
            return None;
        }
        Some(Decision::Destination(self.pick(senses, rng).point))
    }

    fn can_continue(&self, senses: &Senses<'_>, _rng: &mut StdRng) -> bool {
        self.panicking(senses)
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

    fn on_tick(&mut self, ctx: &mut GoalContext<'_>) {
        if !ctx.navigator.is_idle() && !ctx.navigator.is_blocked() {
            return;
        }
        // Arrived or no route: keep running
        let (sample, preferred) = {
            let (senses, rng) = ctx.split();
            let sample = self.pick(&senses, rng);
            (sample, yaw_toward(senses.body.position(), sample.point))
        };
        if sample.validated {
            self.destination = Some(sample.point);
            ctx.navigator.navigate_to(sample.point, self.speed);
            return;
        }

        let position = ctx.body.position();
        let safe = preferred.and_then(|yaw| {
            try_safe_direction(
                &*ctx.world,
                position,
                yaw,
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

    fn on_stop(&mut self, ctx: &mut GoalContext<'_>) {
        self.destination = None;
        ctx.halt();
    }
}
