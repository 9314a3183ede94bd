//! The body surface the AI drives

use glam::Vec3;

/// Kinematic state and intent setters of one mob's body
pub trait MobBody {
    /// Feet position
    fn position(&self) -> Vec3;
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    fn eye_height(&self) -> f32 {
        self.height() * 0.85
    }

    fn eye_position(&self) -> Vec3 {
        self.position() + Vec3::new(0.0, self.eye_height(), 0.0)
    }

    /// Body facing in radians (see `critter_core::math::direction_from_yaw`)
    fn yaw(&self) -> f32;

    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);

    /// Add an impulse on top of the current velocity
    fn add_velocity(&mut self, impulse: Vec3) {
        let v = self.velocity();
        self.set_velocity(v + impulse);
    }

    fn is_on_ground(&self) -> bool;
    fn is_collided_horizontally(&self) -> bool;
    fn is_in_liquid(&self) -> bool;

    /// Walk along `yaw` at `speed_factor` times the body's base speed
    fn set_move_direction(&mut self, yaw: f32, speed_factor: f32);
    fn stop_moving(&mut self);
    fn jump(&mut self);
    fn look_at(&mut self, target: Vec3);
    fn perform_attack(&mut self);
}
