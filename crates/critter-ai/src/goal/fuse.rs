//! Fuse-and-detonate
//!
//! [`Fuse`] is the counter state machine on its own so it can be driven and
//! tested without a world. [`FuseGoal`] feeds it one [`FuseSignal`] per tick
//! and performs the blast when it fires.

use critter_core::math::direction_between;
use glam::Vec3;
use rand::rngs::StdRng;
use tracing::info;

use super::{Decision, Goal, GoalContext, Senses};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuseState {
    Idle,
    Arming,
    Disarming,
}

/// What the fuse saw this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuseSignal {
    /// Target inside detonation range
    InRange,
    /// Target known but out of range
    OutOfRange,
    /// No target at all
    Lost,
}

/// Counter clamped to `[0, max]` that fires once on reaching `max`
#[derive(Debug, Clone)]
pub struct Fuse {
    ticks: u32,
    max: u32,
    state: FuseState,
}

impl Fuse {
    pub fn new(max: u32) -> Self {
        Self {
            ticks: 0,
            max: max.max(1),
            state: FuseState::Idle,
        }
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn state(&self) -> FuseState {
        self.state
    }

    pub fn is_lit(&self) -> bool {
        self.ticks > 0
    }

    /// Advance one tick. Returns true on the tick the counter reaches `max`.
    pub fn step(&mut self, signal: FuseSignal) -> bool {
        let before = self.ticks;
        match signal {
            FuseSignal::InRange => {
                self.ticks = (self.ticks + 1).min(self.max);
                self.state = FuseState::Arming;
            }
            FuseSignal::OutOfRange | FuseSignal::Lost => {
                let drain = if signal == FuseSignal::Lost { 2 } else { 1 };
                self.ticks = self.ticks.saturating_sub(drain);
                self.state = if self.ticks > 0 {
                    FuseState::Disarming
                } else {
                    FuseState::Idle
                };
            }
        }
        before < self.max && self.ticks == self.max
    }

    pub fn reset(&mut self) {
        self.ticks = 0;
        self.state = FuseState::Idle;
    }
}

/// Stand still and arm while the target is close; blow up when the fuse
/// runs out, damaging everything nearby and removing the mob
#[derive(Debug, Clone)]
pub struct FuseGoal {
    priority: u32,
    fuse: Fuse,
    /// Target distance that keeps the fuse arming
    trigger_range: f32,
    /// Target distance past which an unlit fuse gives up
    abandon_range: f32,
    blast_radius: f32,
    max_damage: f32,
    knockback: f32,
}

impl FuseGoal {
    pub fn new(priority: u32, fuse_ticks: u32) -> Self {
        Self {
            priority,
            fuse: Fuse::new(fuse_ticks),
            trigger_range: 3.0,
            abandon_range: 7.0,
            blast_radius: 5.0,
            max_damage: 20.0,
            knockback: 1.5,
        }
    }

    pub fn with_blast(mut self, radius: f32, max_damage: f32) -> Self {
        self.blast_radius = radius.max(f32::EPSILON);
        self.max_damage = max_damage;
        self
    }

    pub fn fuse(&self) -> &Fuse {
        &self.fuse
    }

    fn target_distance(senses: &Senses<'_>) -> Option<f32> {
        senses
            .target()
            .map(|t| t.position.distance(senses.body.position()))
    }

    /// Damage and push everything inside the blast, scaled linearly from
    /// full at the center to zero at the radius. Returns how many were hit.
    fn detonate(&self, ctx: &mut GoalContext<'_>) -> usize {
        let center = ctx.body.position();
        let mut victims = 0;
        for entity in ctx.world.entities_near(center, self.blast_radius) {
            if entity.id == ctx.self_id {
                continue;
            }
            let falloff = 1.0 - entity.position.distance(center) / self.blast_radius;
            if falloff <= 0.0 {
                continue;
            }
            let push = direction_between(center, entity.position)
                .map_or(Vec3::ZERO, |dir| dir * self.knockback * falloff);
            ctx.world
                .damage(entity.id, Some(ctx.self_id), self.max_damage * falloff, push);
            victims += 1;
        }
        victims
    }
}

impl Goal for FuseGoal {
    fn name(&self) -> &'static str {
        "fuse"
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn is_exclusive(&self) -> bool {
        true
    }

    fn evaluate(&self, senses: &Senses<'_>, _rng: &mut StdRng) -> Option<Decision> {
        if senses.memory.removed {
            return None;
        }
        let distance = Self::target_distance(senses);
        (self.fuse.is_lit() || distance.is_some_and(|d| d <= self.trigger_range))
            .then_some(Decision::Proceed)
    }

    fn can_continue(&self, senses: &Senses<'_>, _rng: &mut StdRng) -> bool {
        if senses.memory.removed {
            return false;
        }
        let distance = Self::target_distance(senses);
        self.fuse.is_lit() || distance.is_some_and(|d| d <= self.abandon_range)
    }

    fn on_start(&mut self, ctx: &mut GoalContext<'_>) {
        ctx.halt();
    }

    fn on_tick(&mut self, ctx: &mut GoalContext<'_>) {
        let position = ctx.body.position();
        let signal = match ctx.target() {
            None => FuseSignal::Lost,
            Some(target) => {
                ctx.body.look_at(target.eye_position());
                if target.position.distance(position) <= self.trigger_range {
                    FuseSignal::InRange
                } else {
                    FuseSignal::OutOfRange
                }
            }
        };

        if self.fuse.step(signal) {
            let victims = self.detonate(ctx);
            info!("{} detonated at {:?}, {} caught in the blast", ctx.self_id, position, victims);
            ctx.memory.mark_removed();
            ctx.halt();
        }
    }

    fn on_stop(&mut self, ctx: &mut GoalContext<'_>) {
        self.fuse.reset();
        ctx.halt();
    }
}
