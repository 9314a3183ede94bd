//! Yaw and distance helpers
//!
//! Every direction derived from a difference of positions goes through these
//! helpers so that sub-epsilon distances never reach a normalization.

use glam::Vec3;

/// Distances below this are treated as "arrived"
pub const DISTANCE_EPSILON: f32 = 1.0e-4;

/// Horizontal (XZ) component of `to - from`
pub fn horizontal_delta(from: Vec3, to: Vec3) -> Vec3 {
    Vec3::new(to.x - from.x, 0.0, to.z - from.z)
}

pub fn horizontal_distance_squared(from: Vec3, to: Vec3) -> f32 {
    horizontal_delta(from, to).length_squared()
}

pub fn horizontal_distance(from: Vec3, to: Vec3) -> f32 {
    horizontal_delta(from, to).length()
}

/// Yaw (radians) pointing from `from` to `to` in the XZ plane.
///
/// Returns `None` when the two points are horizontally coincident.
pub fn yaw_toward(from: Vec3, to: Vec3) -> Option<f32> {
    let delta = horizontal_delta(from, to);
    if delta.length_squared() < DISTANCE_EPSILON * DISTANCE_EPSILON {
        return None;
    }
    Some(delta.z.atan2(delta.x))
}

/// Unit XZ direction for a yaw
pub fn direction_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(yaw.cos(), 0.0, yaw.sin())
}

/// Normalized direction from `from` to `to`, or `None` below epsilon
pub fn direction_between(from: Vec3, to: Vec3) -> Option<Vec3> {
    let delta = to - from;
    let length = delta.length();
    if length < DISTANCE_EPSILON {
        return None;
    }
    Some(delta / length)
}

/// Wrap an angle into (-PI, PI]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut a = angle % TAU;
    if a <= -PI {
        a += TAU;
    } else if a > PI {
        a -= TAU;
    }
    a
}
