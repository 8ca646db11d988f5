use crate::geometry::Rect;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Number of collision layers; each layer gets its own spatial index
pub const LAYER_COUNT: usize = 4;

/// Smallest mass a body may carry. Anything lower is clamped up so the
/// mass-weighted split never divides by zero.
pub const MIN_MASS: f32 = 1.0e-4;

/// Disjoint collision group. Bodies only collide within their own layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Ground = 0,
    Legs = 1,
    Flying = 2,
    Underwater = 3,
}

impl Layer {
    pub const ALL: [Layer; LAYER_COUNT] = [
        Layer::Ground,
        Layer::Legs,
        Layer::Flying,
        Layer::Underwater,
    ];

    /// Map a raw layer index to a layer. Negative or unknown indices mean
    /// "not collidable" and yield `None`.
    pub fn from_index(index: i32) -> Option<Layer> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// One physically simulated actor for a single resolution pass
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Vec2,
    /// Collision radius, already scaled by the world-wide radius factor
    pub radius: f32,
    mass: f32,
    /// `None` excludes the body from indexing and resolution
    pub layer: Option<Layer>,
    /// Whether this instance may permanently move the body
    pub authoritative: bool,
    /// Set once the body has been handled as a mover in the current step
    pub(crate) resolved: bool,
}

impl Body {
    pub fn new(position: Vec2, radius: f32, mass: f32) -> Self {
        Self {
            position,
            radius,
            mass: sanitize_mass(mass),
            layer: Some(Layer::Ground),
            authoritative: true,
            resolved: false,
        }
    }

    pub fn with_layer(mut self, layer: Option<Layer>) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_authority(mut self, authoritative: bool) -> Self {
        self.authoritative = authoritative;
        self
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn set_mass(&mut self, mass: f32) {
        self.mass = sanitize_mass(mass);
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Square bounding box, `2 * radius` on a side
    pub fn hitbox(&self) -> Rect {
        let size = self.radius * 2.0;
        Rect::centered(self.position, size, size)
    }
}

fn sanitize_mass(mass: f32) -> f32 {
    if mass.is_finite() && mass >= MIN_MASS {
        mass
    } else if mass.is_infinite() && mass > 0.0 {
        f32::MAX
    } else {
        MIN_MASS
    }
}
