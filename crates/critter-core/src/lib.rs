//! Critter Core - Shared types and utilities for the Critter mob AI
//!
//! This crate provides the foundational types used throughout the workspace:
//! - Mathematical primitives (re-exported from glam)
//! - Integer block coordinates and entity identifiers
//! - Yaw/direction helpers with near-zero distance guards
//! - A fixed-rate tick clock for driving the simulation

pub mod math;
pub mod time;
pub mod types;

pub use glam::{Vec2, Vec3};
pub use math::DISTANCE_EPSILON;
pub use time::{ClockError, TickClock, TickConfig};
pub use types::{BlockPos, EntityId};
