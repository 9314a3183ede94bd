//! Revenge goal: turn on the last attacker

use critter_core::EntityId;
use rand::rngs::StdRng;

use super::{Decision, Goal, GoalContext, Senses};

/// Turns whoever last hurt the mob into its target
#[derive(Debug, Clone)]
pub struct RevengeGoal {
    priority: u32,
    /// Distance past which the attacker is forgotten
    follow_range: f32,
    /// Hurt tick already answered, so one hit triggers once
    handled_hurt: Option<u64>,
    attacker: Option<EntityId>,
}

impl RevengeGoal {
    pub fn new(priority: u32) -> Self {
        Self {
            priority,
            follow_range: 32.0,
            handled_hurt: None,
            attacker: None,
        }
    }
}

impl Goal for RevengeGoal {
    fn name(&self) -> &'static str {
        "revenge"
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn evaluate(&self, senses: &Senses<'_>, _rng: &mut StdRng) -> Option<Decision> {
        let hurt = senses.memory.last_hurt_tick?;
        if self.handled_hurt.is_some_and(|handled| handled >= hurt) {
            return None;
        }
        let attacker = senses
            .memory
            .last_attacker
            .filter(|id| *id != senses.self_id)
            .and_then(|id| senses.world.entity(id))
            .filter(|e| e.is_alive())?;
        if senses.memory.target == Some(attacker.id) {
            return None;
        }
        Some(Decision::Target(attacker.id))
    }

    fn can_continue(&self, senses: &Senses<'_>, _rng: &mut StdRng) -> bool {
        let Some(id) = self.attacker else {
            return false;
        };
        senses.memory.target == Some(id)
            && senses.target().is_some_and(|target| {
                target.position.distance(senses.body.position()) <= self.follow_range
            })
    }

    fn commit(&mut self, decision: Decision) {
        if let Decision::Target(id) = decision {
            self.attacker = Some(id);
        }
    }

    fn on_start(&mut self, ctx: &mut GoalContext<'_>) {
        self.handled_hurt = ctx.memory.last_hurt_tick;
        ctx.memory.target = self.attacker;
    }

    fn on_stop(&mut self, ctx: &mut GoalContext<'_>) {
        if let Some(id) = self.attacker.take() {
            ctx.memory.release_target(id);
        }
    }
}
