//! Move control: turns a point to walk to into facing, speed and jumps

use critter_core::math::{horizontal_distance, yaw_toward};
use critter_physics::MobBody;
use glam::Vec3;

use crate::config::MovementConfig;

/// Per-mob movement executor
#[derive(Debug, Clone, Default)]
pub struct MoveControl {
    target: Option<Vec3>,
    speed: f32,
    jump_intent: bool,
    jump_cooldown: u32,
    /// Whether the body was last told to walk, so a stop is sent only once
    walking: bool,
}

impl MoveControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk toward `target` at `speed` times base speed
    pub fn set_target(&mut self, target: Vec3, speed: f32) {
        self.target = Some(target);
        self.speed = speed;
    }

    /// Drop the current target; the body is stopped on the next tick
    pub fn clear(&mut self) {
        self.target = None;
    }

    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Whether a jump was issued on the last tick
    pub fn jumped(&self) -> bool {
        self.jump_intent
    }

    pub fn jump_cooldown(&self) -> u32 {
        self.jump_cooldown
    }

    pub fn tick(&mut self, body: &mut dyn MobBody, config: &MovementConfig) {
        self.jump_intent = false;
        self.jump_cooldown = self.jump_cooldown.saturating_sub(1);

        let Some(target) = self.target else {
            self.halt(body);
            return;
        };

        let position = body.position();
        let distance = horizontal_distance(position, target);
        let Some(yaw) = yaw_toward(position, target).filter(|_| distance >= config.arrival_threshold) else {
            self.target = None;
            self.halt(body);
            return;
        };

        body.set_move_direction(yaw, self.speed);
        self.walking = true;

        let climb = target.y - position.y > config.jump_height_threshold;
        if self.jump_cooldown == 0
            && body.is_on_ground()
            && (climb || body.is_collided_horizontally())
        {
            body.jump();
            self.jump_intent = true;
            self.jump_cooldown = config.jump_cooldown;
        }
    }

    fn halt(&mut self, body: &mut dyn MobBody) {
        if self.walking {
            body.stop_moving();
            self.walking = false;
        }
    }
}
