//! Concrete actors used by scenarios and tests

use crate::actor::{ActorGroup, PhysicsActor};
use crate::keys::RefId;
use crate::body::Layer;
use crate::geometry::Rect;
use glam::Vec2;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

/// A mobile actor with a circular footprint
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub name: String,
    pub pos: Vec2,
    /// Displacement applied once per tick before physics runs
    pub vel: Vec2,
    pub hit_size: f32,
    pub mass: f32,
    pub layer: Option<Layer>,
    pub physics: bool,
    pub local: bool,
    /// Moves are clamped to this area when set
    pub bounds: Option<Rect>,
    physref: Option<RefId>,
}

impl Unit {
    pub fn new(name: impl Into<String>, pos: Vec2, hit_size: f32, mass: f32) -> Self {
        Self {
            name: name.into(),
            pos,
            vel: Vec2::ZERO,
            hit_size,
            mass,
            layer: Some(Layer::Ground),
            physics: true,
            local: false,
            bounds: None,
            physref: None,
        }
    }

    pub fn with_layer(mut self, layer: Option<Layer>) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_physics(mut self, physics: bool) -> Self {
        self.physics = physics;
        self
    }

    pub fn local(mut self) -> Self {
        self.local = true;
        self
    }
}

impl PhysicsActor for Unit {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn mass(&self) -> f32 {
        self.mass
    }

    fn hit_size(&self) -> f32 {
        self.hit_size
    }

    fn collision_layer(&self) -> Option<Layer> {
        self.layer
    }

    fn physics_enabled(&self) -> bool {
        self.physics
    }

    fn is_local(&self) -> bool {
        self.local
    }

    fn physics_ref(&self) -> Option<RefId> {
        self.physref
    }

    fn set_physics_ref(&mut self, physics_ref: Option<RefId>) {
        self.physref = physics_ref;
    }

    fn move_by(&mut self, delta: Vec2) {
        let target = self.pos + delta;
        self.pos = match self.bounds {
            Some(bounds) => bounds.clamp_point(target),
            None => target,
        };
    }
}

/// Live units keyed by id, iterated in spawn order
#[derive(Debug, Default)]
pub struct UnitGroup {
    units: BTreeMap<UnitId, Unit>,
    next_id: u32,
}

impl UnitGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, unit: Unit) -> UnitId {
        let id = UnitId(self.next_id);
        self.next_id += 1;
        self.units.insert(id, unit);
        id
    }

    pub fn despawn(&mut self, id: UnitId) -> Option<Unit> {
        self.units.remove(&id)
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn find(&self, name: &str) -> Option<(UnitId, &Unit)> {
        self.units
            .iter()
            .find(|(_, unit)| unit.name == name)
            .map(|(id, unit)| (*id, unit))
    }

    pub fn iter(&self) -> impl Iterator<Item = (UnitId, &Unit)> {
        self.units.iter().map(|(id, unit)| (*id, unit))
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl ActorGroup for UnitGroup {
    type Id = UnitId;
    type Actor = Unit;

    fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(UnitId, &mut Unit),
    {
        for (id, unit) in self.units.iter_mut() {
            f(*id, unit);
        }
    }
}
