//! Critter AI - goal scheduling, block-grid pathfinding and movement control
//!
//! Per tick a [`Mob`] runs its [`GoalScheduler`], whose active goals set
//! destinations and targets; the [`Navigator`] turns the destination into
//! waypoints via A* over the block grid, and [`MoveControl`] turns the next
//! waypoint into facing, speed and jump intents on the mob's body.

pub mod config;
pub mod error;
pub mod goal;
pub mod manager;
pub mod memory;
pub mod mob;
pub mod movement;
pub mod navigator;
pub mod path;
pub mod presets;
pub mod probes;

pub use config::{AiConfig, MovementConfig, PathfindingConfig, ProbeConfig};
pub use error::ConfigError;
pub use goal::{Decision, Goal, GoalContext, GoalScheduler, Senses};
pub use manager::{ManagedMob, MobManager};
pub use memory::MobMemory;
pub use mob::Mob;
pub use movement::MoveControl;
pub use navigator::{Navigator, ReplanReason};
pub use path::{find_path, NodeKind, Path, PathNode, PathNodeEvaluator, SearchOutcome};
pub use presets::MobKind;
