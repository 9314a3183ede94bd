//! Spatial probes over the block grid
//!
//! Stateless queries shared by the evaluator and the goals: sight lines,
//! fall safety, cliff detection and the fallback steering search.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use critter_core::math::{direction_from_yaw, wrap_angle};
use critter_core::BlockPos;
use critter_world::BlockAccess;
use glam::Vec3;

use crate::config::ProbeConfig;

/// Offsets tried, in order, when the preferred facing leads off a cliff
pub const SAFE_DIRECTION_OFFSETS: [f32; 7] = [
    FRAC_PI_4,
    -FRAC_PI_4,
    FRAC_PI_2,
    -FRAC_PI_2,
    3.0 * FRAC_PI_4,
    -3.0 * FRAC_PI_4,
    PI,
];

const LATERAL: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Raymarch from `from` to `to`; blocked by the first opaque cell sampled.
///
/// Endpoints closer than `sight_epsilon` are trivially visible. The cells
/// containing the two endpoints are not sampled.
pub fn has_line_of_sight<W: BlockAccess + ?Sized>(
    world: &W,
    from: Vec3,
    to: Vec3,
    config: &ProbeConfig,
) -> bool {
    let delta = to - from;
    let distance = delta.length();
    if distance < config.sight_epsilon {
        return true;
    }
    let direction = delta / distance;
    let steps = (distance / config.sight_step).ceil() as u32;
    let start_cell = BlockPos::from_vec3(from);
    let end_cell = BlockPos::from_vec3(to);

    for i in 1..steps {
        let sample = from + direction * (i as f32 * config.sight_step);
        let cell = BlockPos::from_vec3(sample);
        if cell == start_cell || cell == end_cell {
            continue;
        }
        if world.is_opaque(cell) {
            return false;
        }
    }
    true
}

/// First solid cell strictly below `pos`, looking at most `max_fall` cells down
pub fn ground_below<W: BlockAccess + ?Sized>(world: &W, pos: BlockPos, max_fall: u32) -> Option<BlockPos> {
    (1..=max_fall as i32)
        .map(|depth| pos.offset(0, -depth, 0))
        .find(|cell| world.is_solid(*cell))
}

/// Whether something standing in `pos` would land within `max_fall` cells.
///
/// Ground directly beneath counts as depth 1; ground exactly `max_fall`
/// cells below is still safe.
pub fn is_fall_safe<W: BlockAccess + ?Sized>(world: &W, pos: BlockPos, max_fall: u32) -> bool {
    ground_below(world, pos, max_fall).is_some()
}

/// Whether a step along `yaw` from `position` leads off a cliff.
///
/// A wall ahead is not a cliff; the mover will jump or the planner routes
/// around it.
pub fn is_cliff_ahead<W: BlockAccess + ?Sized>(
    world: &W,
    position: Vec3,
    yaw: f32,
    max_fall: u32,
    config: &ProbeConfig,
) -> bool {
    let ahead = position + direction_from_yaw(yaw) * config.cliff_probe_distance;
    let column = BlockPos::from_vec3(ahead);
    if world.is_solid(column) {
        return false;
    }
    !is_fall_safe(world, column, max_fall)
}

/// First facing from `preferred + offset` (in the given order) that does not
/// lead off a cliff
pub fn first_safe_offset<W: BlockAccess + ?Sized>(
    world: &W,
    position: Vec3,
    preferred_yaw: f32,
    offsets: &[f32],
    max_fall: u32,
    config: &ProbeConfig,
) -> Option<f32> {
    offsets
        .iter()
        .map(|offset| wrap_angle(preferred_yaw + offset))
        .find(|yaw| !is_cliff_ahead(world, position, *yaw, max_fall, config))
}

/// The preferred facing if it is safe, else the first safe offset from
/// [`SAFE_DIRECTION_OFFSETS`], else `None`
pub fn try_safe_direction<W: BlockAccess + ?Sized>(
    world: &W,
    position: Vec3,
    preferred_yaw: f32,
    max_fall: u32,
    config: &ProbeConfig,
) -> Option<f32> {
    if !is_cliff_ahead(world, position, preferred_yaw, max_fall, config) {
        return Some(preferred_yaw);
    }
    first_safe_offset(
        world,
        position,
        preferred_yaw,
        &SAFE_DIRECTION_OFFSETS,
        max_fall,
        config,
    )
}

/// Like [`try_safe_direction`] but returns `preferred_yaw` unchanged when no
/// direction is safe. The result is not guaranteed safe; goals steer with
/// `try_safe_direction` and halt on `None`.
pub fn find_safe_direction<W: BlockAccess + ?Sized>(
    world: &W,
    position: Vec3,
    preferred_yaw: f32,
    max_fall: u32,
    config: &ProbeConfig,
) -> f32 {
    try_safe_direction(world, position, preferred_yaw, max_fall, config).unwrap_or(preferred_yaw)
}

/// Cardinal neighbours of `pos` that are walled off at feet or head height
pub fn count_blocked_sides<W: BlockAccess + ?Sized>(world: &W, pos: BlockPos) -> usize {
    LATERAL
        .iter()
        .filter(|(dx, dz)| {
            let side = pos.offset(*dx, 0, *dz);
            blocks_body(world, side) || blocks_body(world, side.up())
        })
        .count()
}

fn blocks_body<W: BlockAccess + ?Sized>(world: &W, pos: BlockPos) -> bool {
    let props = world.properties(pos);
    props.solid && !props.door
}

/// Whether `candidate` is a sensible place to walk to from `from`: firm
/// non-hazardous footing, room for a body, not boxed in, and the first
/// step toward it does not lead off a cliff
pub fn is_valid_destination<W: BlockAccess + ?Sized>(
    world: &W,
    from: Vec3,
    candidate: BlockPos,
    max_fall: u32,
    config: &ProbeConfig,
) -> bool {
    let ground = candidate.down();
    if !world.is_solid(ground) || world.is_hazard(ground) || world.is_fence(ground) {
        return false;
    }
    if blocks_body(world, candidate) || blocks_body(world, candidate.up()) {
        return false;
    }
    if world.is_hazard(candidate) || world.is_hazard(candidate.up()) {
        return false;
    }
    if count_blocked_sides(world, candidate) >= 3 {
        return false;
    }
    match critter_core::math::yaw_toward(from, candidate.bottom_center()) {
        Some(yaw) => !is_cliff_ahead(world, from, yaw, max_fall, config),
        None => true,
    }
}
