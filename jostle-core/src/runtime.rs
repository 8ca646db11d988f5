use crate::actor::{ActorGroup, NetMode, PhysicsActor, SimContext, WorldBounds};
use crate::async_core::AsyncCore;
use crate::error::ScenarioError;
use crate::geometry::Rect;
use crate::process::PhysicsProcess;
use crate::scenario::{Scenario, UnitDecl};
use crate::unit::{Unit, UnitGroup, UnitId};
use glam::Vec2;
use std::collections::HashMap;
use tracing::debug;

/// Live state a tick reads and writes: the units plus session settings
#[derive(Debug)]
pub struct Session {
    pub units: UnitGroup,
    pub bounds: Rect,
    pub client: bool,
    pub tick: u32,
}

impl WorldBounds for Session {
    fn quad_bounds(&self) -> Rect {
        self.bounds
    }
}

impl NetMode for Session {
    fn is_client(&self) -> bool {
        self.client
    }
}

impl SimContext for Session {
    type Actors = UnitGroup;

    fn actors_mut(&mut self) -> &mut UnitGroup {
        &mut self.units
    }
}

/// Final state of one unit
#[derive(Debug, Clone, PartialEq)]
pub struct UnitState {
    pub name: String,
    pub pos: Vec2,
    /// Whether the unit currently has a physics binding
    pub bound: bool,
}

#[derive(Debug)]
pub struct SimulationResult {
    pub ticks: u32,
    pub units: Vec<UnitState>,
}

/// A scenario being stepped tick by tick
pub struct SimulationContext {
    pub scenario: Scenario,
    pub session: Session,
    pub core: AsyncCore<Session>,
    spawned: HashMap<String, UnitId>,
}

impl SimulationContext {
    pub fn current_tick(&self) -> u32 {
        self.session.tick
    }

    pub fn is_finished(&self) -> bool {
        self.session.tick >= self.scenario.ticks
    }

    pub fn unit_id(&self, name: &str) -> Option<UnitId> {
        self.spawned.get(name).copied()
    }
}

/// Parse, validate and run a scenario to completion
pub fn run_source(source: &str) -> Result<SimulationResult, ScenarioError> {
    let scenario = Scenario::from_json(source)?;
    Ok(run_scenario(scenario))
}

pub fn run_scenario(scenario: Scenario) -> SimulationResult {
    let mut ctx = build_simulation_context(scenario);
    while !ctx.is_finished() {
        step_simulation(&mut ctx);
    }
    SimulationResult {
        ticks: ctx.session.tick,
        units: get_unit_states(&ctx),
    }
}

pub fn build_simulation_context_from_source(
    source: &str,
) -> Result<SimulationContext, ScenarioError> {
    Ok(build_simulation_context(Scenario::from_json(source)?))
}

/// Set up a session and an initialized physics process for `scenario`
pub fn build_simulation_context(scenario: Scenario) -> SimulationContext {
    let session = Session {
        units: UnitGroup::new(),
        bounds: scenario.bounds,
        client: scenario.client,
        tick: 0,
    };

    let mut core = AsyncCore::new(scenario.physics.parallel);
    core.add(PhysicsProcess::<UnitId>::new(scenario.physics.clone()));
    core.init(&session);

    debug!(
        units = scenario.units.len(),
        ticks = scenario.ticks,
        client = scenario.client,
        "scenario loaded"
    );

    SimulationContext {
        scenario,
        session,
        core,
        spawned: HashMap::new(),
    }
}

/// Advance one tick: lifecycle events, unit motion, then physics
pub fn step_simulation(ctx: &mut SimulationContext) {
    let tick = ctx.session.tick;

    for decl in &ctx.scenario.units {
        if decl.despawn_tick == Some(tick) {
            if let Some(id) = ctx.spawned.remove(&decl.name) {
                ctx.session.units.despawn(id);
                debug!(unit = %decl.name, tick, "despawned");
            }
        }
        if decl.spawn_tick == tick {
            let unit = spawn_unit(decl, ctx.session.bounds);
            let id = ctx.session.units.spawn(unit);
            ctx.spawned.insert(decl.name.clone(), id);
            debug!(unit = %decl.name, %id, tick, "spawned");
        }
    }

    ctx.session.units.for_each_mut(|_, unit| {
        let vel = unit.vel;
        if vel != Vec2::ZERO {
            unit.move_by(vel);
        }
    });

    ctx.core.tick(&mut ctx.session);
    ctx.session.tick += 1;
}

fn spawn_unit(decl: &UnitDecl, bounds: Rect) -> Unit {
    let mut unit = Unit::new(decl.name.clone(), decl.position, decl.hit_size, decl.mass)
        .with_layer(decl.layer)
        .with_velocity(decl.velocity)
        .with_physics(decl.physics)
        .with_bounds(bounds);
    unit.local = decl.local;
    unit
}

/// Snapshot of every live unit, in spawn order
pub fn get_unit_states(ctx: &SimulationContext) -> Vec<UnitState> {
    ctx.session
        .units
        .iter()
        .map(|(_, unit)| UnitState {
            name: unit.name.clone(),
            pos: unit.pos,
            bound: unit.physics_ref().is_some(),
        })
        .collect()
}
