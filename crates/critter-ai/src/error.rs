//! Errors raised while building or tuning the AI

/// Invalid tuning values found by [`crate::AiConfig::validate`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{0} must be at least 1")]
    ZeroLimit(&'static str),

    #[error("max_fall_distance must be between 1 and {max}, got {value}")]
    FallDistance { value: u32, max: u32 },

    #[error("{field} ({value}) must not exceed {limit_field} ({limit})")]
    OutOfOrder {
        field: &'static str,
        value: f32,
        limit_field: &'static str,
        limit: f32,
    },
}
