use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Tunables for the physics process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Factor applied to an actor's hit size to get its collision radius
    pub collision_radius_scale: f32,

    /// Run the resolution phase on the rayon pool instead of the caller
    pub parallel: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            collision_radius_scale: 0.6,
            parallel: true,
        }
    }
}

impl PhysicsConfig {
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: PhysicsConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let scale = self.collision_radius_scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::RadiusScale(scale));
        }
        Ok(())
    }
}
