//! Idle look goal

use std::f32::consts::PI;

use critter_core::math::direction_from_yaw;
use critter_core::EntityId;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::Rng;

use super::{Decision, Goal, GoalContext, Senses};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gaze {
    Entity(EntityId),
    Point(Vec3),
}

/// Idle glancing: at the nearest entity if one is close, else somewhere random
#[derive(Debug, Clone)]
pub struct LookGoal {
    priority: u32,
    range: f32,
    /// One-in-`chance` per tick of starting to look
    chance: u32,
    min_ticks: u32,
    max_ticks: u32,
    gaze: Option<Gaze>,
    remaining: u32,
}

impl LookGoal {
    pub fn new(priority: u32, range: f32) -> Self {
        Self {
            priority,
            range,
            chance: 50,
            min_ticks: 40,
            max_ticks: 80,
            gaze: None,
            remaining: 0,
        }
    }

    pub fn with_chance(mut self, chance: u32) -> Self {
        self.chance = chance.max(1);
        self
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl Goal for LookGoal {
    fn name(&self) -> &'static str {
        "look"
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn evaluate(&self, senses: &Senses<'_>, rng: &mut StdRng) -> Option<Decision> {
        if rng.gen_range(0..self.chance) != 0 {
            return None;
        }
        let position = senses.body.position();
        let nearest = senses
            .world
            .entities_near(position, self.range)
            .into_iter()
            .filter(|e| e.id != senses.self_id)
            .min_by(|a, b| {
                let da = a.position.distance_squared(position);
                let db = b.position.distance_squared(position);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            });
        let decision = match nearest {
            Some(entity) => Decision::Target(entity.id),
            None => {
                let yaw = rng.gen_range(-PI..PI);
                Decision::Destination(senses.body.eye_position() + direction_from_yaw(yaw) * 4.0)
            }
        };
        Some(decision)
    }

    fn can_continue(&self, senses: &Senses<'_>, _rng: &mut StdRng) -> bool {
        if self.remaining == 0 {
            return false;
        }
        match self.gaze {
            Some(Gaze::Entity(id)) => senses.world.entity(id).is_some_and(|e| {
                let leash = self.range * 1.5;
                e.is_alive() && e.position.distance_squared(senses.body.position()) <= leash * leash
            }),
            Some(Gaze::Point(_)) => true,
            None => false,
        }
    }

    fn commit(&mut self, decision: Decision) {
        self.gaze = match decision {
            Decision::Target(id) => Some(Gaze::Entity(id)),
            Decision::Destination(point) => Some(Gaze::Point(point)),
            Decision::Proceed => None,
        };
    }

    fn on_start(&mut self, ctx: &mut GoalContext<'_>) {
        self.remaining = ctx.rng.gen_range(self.min_ticks..=self.max_ticks);
    }

    fn on_tick(&mut self, ctx: &mut GoalContext<'_>) {
        self.remaining = self.remaining.saturating_sub(1);
        let point = match self.gaze {
            Some(Gaze::Entity(id)) => ctx.world.entity(id).map(|e| e.eye_position()),
            Some(Gaze::Point(point)) => Some(point),
            None => None,
        };
        if let Some(point) = point {
            ctx.body.look_at(point);
        }
    }

    fn on_stop(&mut self, _ctx: &mut GoalContext<'_>) {
        self.gaze = None;
        self.remaining = 0;
    }
}
