//! Error types for configuration and scenario loading
//!
//! The resolution step itself has no failure modes; only the inputs that
//! set it up are validated.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid physics config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("collision_radius_scale must be positive and finite, got {0}")]
    RadiusScale(f32),
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("invalid scenario: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("scenario bounds must be finite with positive size")]
    InvalidBounds,

    #[error("duplicate unit name '{0}'")]
    DuplicateUnit(String),

    #[error("unit '{name}': {message}")]
    InvalidUnit { name: String, message: String },
}

impl ScenarioError {
    pub fn invalid_unit(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidUnit {
            name: name.into(),
            message: message.into(),
        }
    }
}
