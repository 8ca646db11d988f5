pub mod actor;
pub mod async_core;
pub mod body;
pub mod config;
pub mod error;
pub mod geometry;
pub mod keys;
pub mod process;
pub mod runtime;
pub mod scenario;
pub mod spatial;
pub mod unit;
pub mod world;

pub use actor::{ActorGroup, NetMode, PhysicsActor, SimContext, WorldBounds};
pub use async_core::{AsyncCore, AsyncProcess};
pub use body::{Body, Layer, LAYER_COUNT, MIN_MASS};
pub use config::PhysicsConfig;
pub use error::{ConfigError, ScenarioError};
pub use geometry::Rect;
pub use keys::{BodyId, RefId};
pub use process::{PhysicRef, PhysicsProcess};
pub use runtime::{
    build_simulation_context, build_simulation_context_from_source, get_unit_states,
    run_scenario, run_source, step_simulation, Session, SimulationContext, SimulationResult,
    UnitState,
};
pub use scenario::{Scenario, UnitDecl};
pub use spatial::{QuadTree, SpatialIndex};
pub use unit::{Unit, UnitGroup, UnitId};
pub use world::{PhysicsWorld, StepStats, SOFTENING};
