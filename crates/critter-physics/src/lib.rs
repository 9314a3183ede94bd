//! Critter Physics - the kinematic surface mobs are driven through
//!
//! The AI never integrates motion itself. It reads kinematic state and issues
//! intents through [`MobBody`]; [`KinematicBody`] is a small voxel-collision
//! implementation for sandboxes and tests.

mod body;
mod kinematic;

pub use body::MobBody;
pub use kinematic::{BodyConfig, KinematicBody};
