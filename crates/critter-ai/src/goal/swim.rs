//! Swim goal: stay afloat in liquid

use rand::rngs::StdRng;

use super::{Decision, Goal, GoalContext, Senses};

/// Keeps the mob afloat by jumping every tick it is in liquid
#[derive(Debug, Clone)]
pub struct SwimGoal {
    priority: u32,
}

impl SwimGoal {
    pub fn new(priority: u32) -> Self {
        Self { priority }
    }
}

impl Goal for SwimGoal {
    fn name(&self) -> &'static str {
        "swim"
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn evaluate(&self, senses: &Senses<'_>, _rng: &mut StdRng) -> Option<Decision> {
        senses.body.is_in_liquid().then_some(Decision::Proceed)
    }

    fn on_tick(&mut self, ctx: &mut GoalContext<'_>) {
        ctx.body.jump();
    }
}
