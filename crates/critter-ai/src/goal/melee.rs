//! Approach-and-strike
//!
//! Chases the remembered target along planned paths, refreshing the plan as
//! the target moves, and hits it when within reach. A mob that has meant to
//! move but stayed put for `stuck_threshold` ticks tries a short detour along
//! the first cliff-safe offset from its facing.

use critter_core::math::{direction_between, direction_from_yaw, horizontal_distance};
use critter_core::{BlockPos, EntityId};
use glam::Vec3;
use rand::rngs::StdRng;
use tracing::debug;

use super::{Decision, Goal, GoalContext, Senses};
use crate::probes::{first_safe_offset, SAFE_DIRECTION_OFFSETS};

/// Horizontal movement per tick below which the mob counts as not moving
const STUCK_EPSILON: f32 = 0.01;
/// Ticks between path refreshes while the target stays in its cell
const REFRESH_INTERVAL: u32 = 10;
/// Speed multiplier while walking a detour
const DETOUR_SPEED: f32 = 0.6;

#[derive(Debug, Clone)]
pub struct MeleeGoal {
    priority: u32,
    speed: f32,
    reach: f32,
    damage: f32,
    knockback: f32,
    attack_interval: u32,
    follow_range: f32,
    /// Approach-only mobs chase but never strike
    strikes: bool,
    stuck_threshold: u32,
    detour_ticks: u32,

    target: Option<EntityId>,
    cooldown: u32,
    refresh_countdown: u32,
    target_cell: Option<BlockPos>,
    last_position: Vec3,
    still_ticks: u32,
    detour_left: u32,
}

impl MeleeGoal {
    pub fn new(priority: u32, speed: f32, damage: f32) -> Self {
        Self {
            priority,
            speed,
            reach: 2.0,
            damage,
            knockback: 0.4,
            attack_interval: 20,
            follow_range: 32.0,
            strikes: true,
            stuck_threshold: 20,
            detour_ticks: 15,
            target: None,
            cooldown: 0,
            refresh_countdown: 0,
            target_cell: None,
            last_position: Vec3::ZERO,
            still_ticks: 0,
            detour_left: 0,
        }
    }

    /// Chase without attacking; another goal acts once in range
    pub fn approach_only(mut self) -> Self {
        self.strikes = false;
        self
    }

    pub fn with_stuck_threshold(mut self, ticks: u32) -> Self {
        self.stuck_threshold = ticks.max(1);
        self
    }

    pub fn is_detouring(&self) -> bool {
        self.detour_left > 0
    }

    fn chase(&mut self, ctx: &mut GoalContext<'_>, destination: Vec3) {
        ctx.navigator.navigate_to(destination, self.speed);
        self.target_cell = Some(BlockPos::from_vec3(destination));
        self.refresh_countdown = REFRESH_INTERVAL;
    }

    /// Returns true when the stuck counter tripped this tick
    fn track_progress(&mut self, ctx: &GoalContext<'_>) -> bool {
        let position = ctx.body.position();
        let intends_to_move = !ctx.navigator.is_idle() || ctx.move_control.has_target();
        if intends_to_move && horizontal_distance(position, self.last_position) < STUCK_EPSILON {
            self.still_ticks += 1;
        } else {
            self.still_ticks = 0;
        }
        self.last_position = position;
        self.still_ticks >= self.stuck_threshold
    }

    fn detour(&mut self, ctx: &mut GoalContext<'_>) {
        self.still_ticks = 0;
        let position = ctx.body.position();
        let safe = first_safe_offset(
            &*ctx.world,
            position,
            ctx.body.yaw(),
            &SAFE_DIRECTION_OFFSETS,
            ctx.config.pathfinding.max_fall_distance,
            &ctx.config.probes,
        );
        match safe {
            Some(yaw) => {
                debug!("{} stuck at {:?}, detouring along yaw {:.2}", ctx.self_id, position, yaw);
                ctx.navigator.stop();
                ctx.move_control
                    .set_target(position + direction_from_yaw(yaw) * 2.0, self.speed * DETOUR_SPEED);
                self.detour_left = self.detour_ticks;
            }
            None => {
                debug!("{} stuck at {:?} with no safe detour", ctx.self_id, position);
                ctx.halt();
            }
        }
    }
}

impl Goal for MeleeGoal {
    fn name(&self) -> &'static str {
        "melee"
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

    fn on_start(&mut self, ctx: &mut GoalContext<'_>) {
        self.still_ticks = 0;
        self.detour_left = 0;
        self.last_position = ctx.body.position();
        if let Some(target) = ctx.target() {
            self.chase(ctx, target.position);
        }
    }

    fn on_tick(&mut self, ctx: &mut GoalContext<'_>) {
        let Some(target) = ctx.target() else {
            ctx.halt();
            return;
        };
        ctx.body.look_at(target.eye_position());
        self.cooldown = self.cooldown.saturating_sub(1);

        let stuck = self.track_progress(ctx);
        if self.detour_left > 0 {
            self.detour_left -= 1;
            if self.detour_left == 0 {
                ctx.move_control.clear();
                self.chase(ctx, target.position);
            }
        } else if stuck {
            self.detour(ctx);
        } else {
            self.refresh_countdown = self.refresh_countdown.saturating_sub(1);
            let moved = self.target_cell != Some(BlockPos::from_vec3(target.position));
            if moved || self.refresh_countdown == 0 || ctx.navigator.is_idle() {
                self.chase(ctx, target.position);
            }
        }

        let position = ctx.body.position();
        let in_reach = horizontal_distance(position, target.position) <= self.reach
            && (target.position.y - position.y).abs() < 2.0;
        if self.strikes && self.cooldown == 0 && in_reach && ctx.can_see(target.eye_position()) {
            ctx.body.perform_attack();
            let push = direction_between(position, target.position)
                .map_or(Vec3::ZERO, |dir| dir * self.knockback);
            ctx.world.damage(target.id, Some(ctx.self_id), self.damage, push);
            self.cooldown = self.attack_interval;
        }
    }

    fn on_stop(&mut self, ctx: &mut GoalContext<'_>) {
        self.target = None;
        self.target_cell = None;
        self.detour_left = 0;
        ctx.halt();
    }
}
