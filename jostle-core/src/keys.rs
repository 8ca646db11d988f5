//! Generational handles for bodies and bindings
//!
//! A key whose entry was removed, or cleared along with a finished session,
//! never resolves to a newer entry.

use slotmap::new_key_type;

new_key_type! {
    /// Handle to a body registered with a `PhysicsWorld`
    pub struct BodyId;

    /// Handle to an actor-to-body binding owned by a `PhysicsProcess`
    pub struct RefId;
}
