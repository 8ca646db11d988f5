//! Three-phase adapter between live actors and the physics world
//!
//! `begin` and `end` touch actors and must run on the context that owns
//! them. `process` only touches the world and may run on a worker thread;
//! the caller guarantees the three phases never overlap.

use crate::actor::{ActorGroup, PhysicsActor, SimContext};
use crate::async_core::AsyncProcess;
use crate::body::Body;
use crate::config::PhysicsConfig;
use crate::geometry::Rect;
use crate::keys::{BodyId, RefId};
use crate::world::{PhysicsWorld, StepStats};
use glam::Vec2;
use slotmap::DenseSlotMap;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::{debug, warn};

/// Binding between one actor and its body
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicRef<K> {
    pub actor: K,
    pub body: BodyId,
    /// Actor position captured at the start of the tick
    pub last: Vec2,
}

#[derive(Debug)]
pub struct PhysicsProcess<K> {
    physics: Option<PhysicsWorld>,
    refs: DenseSlotMap<RefId, PhysicRef<K>>,
    config: PhysicsConfig,
    last_stats: StepStats,
}

impl<K> PhysicsProcess<K>
where
    K: Copy + Eq + Hash + Debug,
{
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            physics: None,
            refs: DenseSlotMap::with_key(),
            config,
            last_stats: StepStats::default(),
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.physics.is_some()
    }

    pub fn world(&self) -> Option<&PhysicsWorld> {
        self.physics.as_ref()
    }

    pub fn ref_count(&self) -> usize {
        self.refs.len()
    }

    pub fn refs(&self) -> impl Iterator<Item = (RefId, &PhysicRef<K>)> {
        self.refs.iter()
    }

    /// The body bound through `ref_id`, if both still exist
    pub fn body_of(&self, ref_id: RefId) -> Option<&Body> {
        let binding = self.refs.get(ref_id)?;
        self.physics.as_ref()?.body(binding.body)
    }

    /// Statistics from the most recent `process` call
    pub fn last_stats(&self) -> StepStats {
        self.last_stats
    }

    /// Start a new session sized to `bounds`, discarding any previous one
    pub fn init(&mut self, bounds: Rect) {
        self.reset();
        self.physics = Some(PhysicsWorld::new(bounds));
        debug!(?bounds, "physics world created");
    }

    /// Drop the world and every binding. Safe to call repeatedly.
    pub fn reset(&mut self) {
        if self.physics.take().is_some() {
            debug!(refs = self.refs.len(), "physics world discarded");
        }
        self.refs.clear();
        self.last_stats = StepStats::default();
    }

    /// Synchronize bindings with the live actors and capture their positions
    pub fn begin<G>(&mut self, actors: &mut G, client: bool)
    where
        G: ActorGroup<Id = K>,
    {
        let Some(physics) = self.physics.as_mut() else {
            return;
        };
        let host = !client;
        let scale = self.config.collision_radius_scale;

        // Remove bindings for actors that left or stopped taking part. An id
        // may have been reused by a new actor, which then no longer points
        // back at this ref.
        self.refs.retain(|ref_id, binding| {
            let keep = actors.get_mut(binding.actor).is_some_and(|actor| {
                actor.physics_enabled() && actor.physics_ref() == Some(ref_id)
            });
            if keep {
                return true;
            }

            physics.remove(binding.body);
            if let Some(actor) = actors.get_mut(binding.actor) {
                if actor.physics_ref() == Some(ref_id) {
                    actor.set_physics_ref(None);
                }
            }
            debug!(actor = ?binding.actor, ?ref_id, "actor unbound");
            false
        });

        let refs = &mut self.refs;
        actors.for_each_mut(|id, actor| {
            if !actor.physics_enabled() {
                return;
            }

            // A slot naming a ref we do not own for this actor is left over
            // from an earlier session
            let bound = actor
                .physics_ref()
                .filter(|&ref_id| refs.get(ref_id).is_some_and(|b| b.actor == id));

            let ref_id = match bound {
                Some(ref_id) => ref_id,
                None => {
                    let mass = actor.mass();
                    if mass.is_nan() || mass <= 0.0 {
                        warn!(actor = ?id, mass, "actor mass is not positive; clamping");
                    }
                    let body = Body::new(actor.position(), actor.hit_size() * scale, mass);
                    let body_id = physics.add(body);
                    let ref_id = refs.insert(PhysicRef {
                        actor: id,
                        body: body_id,
                        last: actor.position(),
                    });
                    actor.set_physics_ref(Some(ref_id));
                    debug!(actor = ?id, ?ref_id, ?body_id, "actor bound");
                    ref_id
                }
            };

            let Some(binding) = refs.get_mut(ref_id) else {
                return;
            };
            binding.last = actor.position();
            if let Some(body) = physics.body_mut(binding.body) {
                body.layer = actor.collision_layer();
                body.authoritative = host || actor.is_local();
            }
        });
    }

    /// Reset bodies to their captured positions and run one resolution step
    pub fn process(&mut self) {
        let Some(physics) = self.physics.as_mut() else {
            return;
        };

        for (_, binding) in self.refs.iter() {
            if let Some(body) = physics.body_mut(binding.body) {
                body.position = binding.last;
            }
        }

        self.last_stats = physics.update();
    }

    /// Move each actor by the correction its body received
    pub fn end<G>(&mut self, actors: &mut G)
    where
        G: ActorGroup<Id = K>,
    {
        let Some(physics) = self.physics.as_ref() else {
            return;
        };

        for (_, binding) in self.refs.iter() {
            let Some(body) = physics.body(binding.body) else {
                continue;
            };
            let delta = body.position - binding.last;
            if delta == Vec2::ZERO {
                continue;
            }
            if let Some(actor) = actors.get_mut(binding.actor) {
                actor.move_by(delta);
            }
        }
    }
}

impl<K> Default for PhysicsProcess<K>
where
    K: Copy + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl<C, K> AsyncProcess<C> for PhysicsProcess<K>
where
    C: SimContext,
    C::Actors: ActorGroup<Id = K>,
    K: Copy + Eq + Hash + Debug + Send,
{
    fn init(&mut self, ctx: &C) {
        PhysicsProcess::init(self, ctx.quad_bounds());
    }

    fn reset(&mut self) {
        PhysicsProcess::reset(self);
    }

    fn begin(&mut self, ctx: &mut C) {
        let client = ctx.is_client();
        PhysicsProcess::begin(self, ctx.actors_mut(), client);
    }

    fn process(&mut self) {
        PhysicsProcess::process(self);
    }

    fn end(&mut self, ctx: &mut C) {
        PhysicsProcess::end(self, ctx.actors_mut());
    }
}
