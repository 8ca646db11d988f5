//! Scenario files: a JSON description of a map, its units and a tick count

use crate::body::Layer;
use crate::config::PhysicsConfig;
use crate::error::ScenarioError;
use crate::geometry::Rect;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Spatial bounds handed to the physics world at init
    pub bounds: Rect,
    #[serde(default = "default_ticks")]
    pub ticks: u32,
    /// Run as a network client: only local units are moved by physics
    #[serde(default)]
    pub client: bool,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub units: Vec<UnitDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitDecl {
    pub name: String,
    pub position: Vec2,
    #[serde(default)]
    pub velocity: Vec2,
    pub hit_size: f32,
    #[serde(default = "default_mass")]
    pub mass: f32,
    /// `null` keeps the unit out of collision entirely
    #[serde(default = "default_layer")]
    pub layer: Option<Layer>,
    #[serde(default = "default_physics")]
    pub physics: bool,
    #[serde(default)]
    pub local: bool,
    #[serde(default)]
    pub spawn_tick: u32,
    #[serde(default)]
    pub despawn_tick: Option<u32>,
}

fn default_ticks() -> u32 {
    1
}

fn default_mass() -> f32 {
    1.0
}

fn default_layer() -> Option<Layer> {
    Some(Layer::Ground)
}

fn default_physics() -> bool {
    true
}

impl Scenario {
    pub fn from_json(source: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_json::from_str(source)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        if !self.bounds.is_valid() {
            return Err(ScenarioError::InvalidBounds);
        }
        self.physics.validate()?;

        let mut names = HashSet::new();
        for unit in &self.units {
            if !names.insert(unit.name.as_str()) {
                return Err(ScenarioError::DuplicateUnit(unit.name.clone()));
            }
            unit.validate()?;
        }
        Ok(())
    }
}

impl UnitDecl {
    fn validate(&self) -> Result<(), ScenarioError> {
        if !self.position.is_finite() || !self.velocity.is_finite() {
            return Err(ScenarioError::invalid_unit(
                &self.name,
                "position and velocity must be finite",
            ));
        }
        if !self.hit_size.is_finite() || self.hit_size < 0.0 {
            return Err(ScenarioError::invalid_unit(
                &self.name,
                format!("hit_size must be finite and non-negative, got {}", self.hit_size),
            ));
        }
        // Non-positive mass is allowed here; the physics process clamps it
        if self.mass.is_nan() {
            return Err(ScenarioError::invalid_unit(&self.name, "mass is NaN"));
        }
        if let Some(despawn) = self.despawn_tick {
            if despawn <= self.spawn_tick {
                return Err(ScenarioError::invalid_unit(
                    &self.name,
                    format!(
                        "despawn_tick {} must come after spawn_tick {}",
                        despawn, self.spawn_tick
                    ),
                ));
            }
        }
        Ok(())
    }
}
