//! Tuning values for the mob AI
//!
//! Every section deserializes with defaults for missing keys, so a settings
//! file only needs to name what it changes.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Deepest drop the neighbour generator will ever consider
pub const MAX_FALL_LIMIT: u32 = 8;

/// All AI tuning
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub pathfinding: PathfindingConfig,
    pub movement: MovementConfig,
    pub probes: ProbeConfig,
}

impl AiConfig {
    /// Check every value is usable; the tick path assumes a validated config
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pf = &self.pathfinding;
        if pf.max_iterations == 0 {
            return Err(ConfigError::ZeroLimit("max_iterations"));
        }
        if pf.max_path_length == 0 {
            return Err(ConfigError::ZeroLimit("max_path_length"));
        }
        if pf.replan_interval == 0 {
            return Err(ConfigError::ZeroLimit("replan_interval"));
        }
        if pf.max_fall_distance == 0 || pf.max_fall_distance > MAX_FALL_LIMIT {
            return Err(ConfigError::FallDistance {
                value: pf.max_fall_distance,
                max: MAX_FALL_LIMIT,
            });
        }
        positive("advance_horizontal", pf.advance_horizontal)?;
        positive("advance_vertical", pf.advance_vertical)?;
        positive("arrival_distance_sq", pf.arrival_distance_sq)?;
        positive("arrival_vertical", pf.arrival_vertical)?;

        let mv = &self.movement;
        positive("arrival_threshold", mv.arrival_threshold)?;
        positive("jump_height_threshold", mv.jump_height_threshold)?;
        // A mover that stops short of the advance radius never reaches the next waypoint
        if mv.arrival_threshold > pf.advance_horizontal {
            return Err(ConfigError::OutOfOrder {
                field: "arrival_threshold",
                value: mv.arrival_threshold,
                limit_field: "advance_horizontal",
                limit: pf.advance_horizontal,
            });
        }

        let pr = &self.probes;
        positive("sight_step", pr.sight_step)?;
        positive("sight_epsilon", pr.sight_epsilon)?;
        positive("cliff_probe_distance", pr.cliff_probe_distance)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

/// Search bounds and per-classification costs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfindingConfig {
    /// Nodes popped from the open set before a search gives up
    pub max_iterations: u32,
    /// Longest path, in steps from the start node
    pub max_path_length: u32,
    /// Deepest drop, in blocks, that still counts as a safe fall
    pub max_fall_distance: u32,
    /// Ticks between routine re-plans
    pub replan_interval: u32,
    /// Extra cost for stepping up one block
    pub step_up_cost: f32,
    pub water_penalty: f32,
    pub door_penalty: f32,
    /// Near-prohibitive: fences can be walked around but not climbed
    pub fence_penalty: f32,
    pub danger_penalty: f32,
    pub cliff_penalty: f32,
    /// Waypoint advance radius, horizontal
    pub advance_horizontal: f32,
    /// Waypoint advance tolerance, vertical (physics handles the rest)
    pub advance_vertical: f32,
    /// Squared horizontal distance at which a destination counts as reached
    pub arrival_distance_sq: f32,
    pub arrival_vertical: f32,
}

impl Default for PathfindingConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            max_path_length: 64,
            max_fall_distance: 3,
            replan_interval: 20,
            step_up_cost: 0.5,
            water_penalty: 2.0,
            door_penalty: 1.0,
            fence_penalty: 50.0,
            danger_penalty: 1000.0,
            cliff_penalty: 1000.0,
            advance_horizontal: 0.6,
            advance_vertical: 2.0,
            arrival_distance_sq: 1.5,
            arrival_vertical: 2.0,
        }
    }
}

/// Move control tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Horizontal distance at which the current move target is dropped
    pub arrival_threshold: f32,
    /// How much higher a target must be before the mover jumps for it
    pub jump_height_threshold: f32,
    /// Ticks after a jump before another may be requested
    pub jump_cooldown: u32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            arrival_threshold: 0.3,
            jump_height_threshold: 0.5,
            jump_cooldown: 10,
        }
    }
}

/// Spatial probe tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Raymarch step for line-of-sight tests
    pub sight_step: f32,
    /// Eye-to-eye distance treated as trivially visible
    pub sight_epsilon: f32,
    /// How far ahead the cliff test looks
    pub cliff_probe_distance: f32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            sight_step: 0.5,
            sight_epsilon: 0.01,
            cliff_probe_distance: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(AiConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let mut config = AiConfig::default();
        config.pathfinding.max_iterations = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroLimit("max_iterations")));
    }

    #[test]
    fn test_fall_distance_bounds() {
        let mut config = AiConfig::default();
        config.pathfinding.max_fall_distance = MAX_FALL_LIMIT + 1;
        assert!(matches!(config.validate(), Err(ConfigError::FallDistance { .. })));
        config.pathfinding.max_fall_distance = 0;
        assert!(matches!(config.validate(), Err(ConfigError::FallDistance { .. })));
    }

    #[test]
    fn test_arrival_must_fit_inside_advance_radius() {
        let mut config = AiConfig::default();
        config.movement.arrival_threshold = 1.0;
        assert!(matches!(config.validate(), Err(ConfigError::OutOfOrder { .. })));
    }

    #[test]
    fn test_nan_rejected() {
        let mut config = AiConfig::default();
        config.probes.sight_step = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::NotPositive { field: "sight_step", .. })));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AiConfig = toml::from_str(
            r#"
            [pathfinding]
            max_iterations = 250

            [movement]
            jump_cooldown = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.pathfinding.max_iterations, 250);
        assert_eq!(config.pathfinding.max_fall_distance, 3);
        assert_eq!(config.movement.jump_cooldown, 4);
        assert_eq!(config.probes.sight_step, 0.5);
    }
}
