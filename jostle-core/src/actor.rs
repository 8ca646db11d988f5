//! Contracts with the systems that own actors, map bounds and network mode
//!
//! The physics process never owns actors. It reads them and moves them only
//! during `begin` and `end`, through these traits.

use crate::keys::RefId;
use crate::body::Layer;
use crate::geometry::Rect;
use glam::Vec2;
use std::fmt::Debug;
use std::hash::Hash;

/// An actor that can take part in overlap resolution
pub trait PhysicsActor {
    fn position(&self) -> Vec2;

    fn mass(&self) -> f32;

    /// Unscaled collision size; the process multiplies it by the configured
    /// radius scale
    fn hit_size(&self) -> f32;

    /// Current collision layer, or `None` when the actor should not collide
    fn collision_layer(&self) -> Option<Layer>;

    /// Whether the actor's type takes part in physics at all
    fn physics_enabled(&self) -> bool;

    /// True for the actor controlled by this instance's player
    fn is_local(&self) -> bool;

    /// The binding slot written by the physics process
    fn physics_ref(&self) -> Option<RefId>;

    fn set_physics_ref(&mut self, physics_ref: Option<RefId>);

    /// Relative move. Implementations may apply their own collision rules.
    fn move_by(&mut self, delta: Vec2);
}

/// The live actor population
pub trait ActorGroup {
    /// Actor handle. A group may hand the id of a despawned actor to a new
    /// one; the new actor starts with an empty binding slot and is bound
    /// afresh while the old binding is dropped.
    type Id: Copy + Eq + Hash + Debug;
    type Actor: PhysicsActor;

    fn get_mut(&mut self, id: Self::Id) -> Option<&mut Self::Actor>;

    fn for_each_mut<F>(&mut self, f: F)
    where
        F: FnMut(Self::Id, &mut Self::Actor);
}

/// Source of the session's spatial bounds
pub trait WorldBounds {
    fn quad_bounds(&self) -> Rect;
}

/// Whether this instance runs as a network client or as host/standalone
pub trait NetMode {
    fn is_client(&self) -> bool;
}

/// Everything a tick needs from the surrounding simulation
pub trait SimContext: WorldBounds + NetMode {
    type Actors: ActorGroup;

    fn actors_mut(&mut self) -> &mut Self::Actors;
}
