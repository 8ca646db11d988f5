//! Layered overlap resolution
//!
//! Every step the per-layer indices are rebuilt from scratch, each
//! authoritative body queries its own layer, and overlapping pairs are
//! pushed apart by a softened, mass-weighted positional correction.
//! A single step does not fully separate bodies; repeated steps converge.

use crate::body::{Body, LAYER_COUNT};
use crate::geometry::Rect;
use crate::keys::BodyId;
use crate::spatial::{QuadTree, SpatialIndex};
use glam::Vec2;
use slotmap::SlotMap;
use tracing::trace;

/// Divisor applied to every correction so a step never fully snaps bodies apart
pub const SOFTENING: f32 = 1.25;

/// Counters describing one resolution step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Bodies inserted into a layer index
    pub indexed: usize,
    /// Authoritative bodies processed as movers
    pub movers: usize,
    /// Broad-phase candidates returned by index queries
    pub candidates: usize,
    /// Overlapping pairs that received a correction
    pub contacts: usize,
}

/// Owns every active body plus one spatial index per collision layer
#[derive(Debug)]
pub struct PhysicsWorld<I = QuadTree<usize>> {
    bounds: Rect,
    trees: [I; LAYER_COUNT],
    // Dense body storage; `handles[i]` is the key of `bodies[i]`
    bodies: Vec<Body>,
    handles: Vec<BodyId>,
    slots: SlotMap<BodyId, usize>,
    // Reused query buffer
    candidates: Vec<usize>,
}

impl PhysicsWorld {
    pub fn new(bounds: Rect) -> Self {
        Self::with_indices(bounds, std::array::from_fn(|_| QuadTree::new(bounds)))
    }
}

impl<I: SpatialIndex<usize>> PhysicsWorld<I> {
    /// Build a world around caller-supplied per-layer indices
    pub fn with_indices(bounds: Rect, trees: [I; LAYER_COUNT]) -> Self {
        Self {
            bounds,
            trees,
            bodies: Vec::new(),
            handles: Vec::new(),
            slots: SlotMap::with_key(),
            candidates: Vec::new(),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Register a body for future steps
    pub fn add(&mut self, body: Body) -> BodyId {
        let id = self.slots.insert(self.bodies.len());
        self.bodies.push(body);
        self.handles.push(id);
        id
    }

    /// Unregister a body. Unknown ids are ignored.
    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        let index = self.slots.remove(id)?;
        let body = self.bodies.swap_remove(index);
        self.handles.swap_remove(index);
        // The former last body now lives at `index`
        if let Some(&moved) = self.handles.get(index) {
            if let Some(slot) = self.slots.get_mut(moved) {
                *slot = index;
            }
        }
        Some(body)
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.slots.get(id).map(|&index| &self.bodies[index])
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        let index = *self.slots.get(id)?;
        self.bodies.get_mut(index)
    }

    /// Registered bodies in dense order
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.handles.iter().copied().zip(self.bodies.iter())
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Run one full rebuild-and-resolve step
    pub fn update(&mut self) -> StepStats {
        let mut stats = StepStats::default();

        for tree in &mut self.trees {
            tree.clear();
        }

        let bodies = self.bodies.as_mut_slice();

        for (index, body) in bodies.iter_mut().enumerate() {
            let Some(layer) = body.layer else { continue };
            body.resolved = false;
            self.trees[layer.index()].insert(index, body.hitbox());
            stats.indexed += 1;
        }

        for index in 0..bodies.len() {
            let body = &bodies[index];
            // Only bodies this instance owns act as movers; the rest are
            // obstacles whose positions come from elsewhere
            let Some(layer) = body.layer else { continue };
            if !body.authoritative {
                continue;
            }
            stats.movers += 1;

            let hitbox = body.hitbox();
            self.candidates.clear();
            self.trees[layer.index()].intersect(&hitbox, &mut self.candidates);
            stats.candidates += self.candidates.len();

            for &other in &self.candidates {
                if other == index || bodies[other].resolved {
                    continue;
                }
                let (body, other) = pair_mut(bodies, index, other);
                if separate(body, other) {
                    stats.contacts += 1;
                }
            }

            bodies[index].resolved = true;
        }

        trace!(
            indexed = stats.indexed,
            movers = stats.movers,
            candidates = stats.candidates,
            contacts = stats.contacts,
            "physics step"
        );

        stats
    }
}

/// Push `body` (always authoritative) and `other` apart if their circles
/// overlap. Returns true when a correction was applied.
fn separate(body: &mut Body, other: &mut Body) -> bool {
    let radii = body.radius + other.radius;
    let offset = body.position - other.position;
    let dst = offset.length();

    if dst >= radii {
        return false;
    }

    // Coincident centers give a zero direction and therefore no push
    let push: Vec2 = offset.normalize_or_zero() * (radii - dst);
    let mass_sum = body.mass() + other.mass();
    let body_share = other.mass() / mass_sum;
    let other_share = body.mass() / mass_sum;

    body.position += push * body_share / SOFTENING;

    if other.authoritative {
        other.position -= push * other_share / SOFTENING;
    }

    true
}

/// Mutable references to two distinct elements of a slice
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
