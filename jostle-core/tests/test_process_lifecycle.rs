//! Binding and lifecycle behavior of the physics process

use glam::Vec2;
use jostle_core::tests::test_helpers::approx_eq_vec2;
use jostle_core::{
    ActorGroup, Layer, PhysicsActor, PhysicsConfig, PhysicsProcess, Rect, Unit, UnitGroup, UnitId,
    MIN_MASS,
};

fn bounds() -> Rect {
    Rect::new(-100.0, -100.0, 200.0, 200.0)
}

fn process() -> PhysicsProcess<UnitId> {
    PhysicsProcess::new(PhysicsConfig {
        collision_radius_scale: 1.0,
        parallel: false,
    })
}

fn tick(process: &mut PhysicsProcess<UnitId>, units: &mut UnitGroup, client: bool) {
    process.begin(units, client);
    process.process();
    process.end(units);
}

fn pos(units: &UnitGroup, id: UnitId) -> Vec2 {
    units.get(id).unwrap().pos
}

#[test]
fn test_phases_are_no_ops_before_init() {
    let mut units = UnitGroup::new();
    let a = units.spawn(Unit::new("a", Vec2::ZERO, 5.0, 1.0));
    let b = units.spawn(Unit::new("b", Vec2::new(6.0, 0.0), 5.0, 1.0));
    let mut process = process();

    tick(&mut process, &mut units, false);

    assert!(!process.is_initialized());
    assert_eq!(process.ref_count(), 0);
    assert_eq!(pos(&units, a), Vec2::ZERO);
    assert_eq!(pos(&units, b), Vec2::new(6.0, 0.0));
    assert!(units.get(a).unwrap().physics_ref().is_none());
}

#[test]
fn test_tick_moves_actors_by_body_correction() {
    let mut units = UnitGroup::new();
    let a = units.spawn(Unit::new("a", Vec2::ZERO, 5.0, 1.0));
    let b = units.spawn(Unit::new("b", Vec2::new(6.0, 0.0), 5.0, 1.0));
    let mut process = process();
    process.init(bounds());

    tick(&mut process, &mut units, false);

    assert!(approx_eq_vec2(pos(&units, a), Vec2::new(-1.6, 0.0), 1e-5));
    assert!(approx_eq_vec2(pos(&units, b), Vec2::new(7.6, 0.0), 1e-5));
    assert_eq!(process.last_stats().contacts, 1);
}

#[test]
fn test_radius_is_scaled_hit_size() {
    let mut units = UnitGroup::new();
    let a = units.spawn(Unit::new("a", Vec2::ZERO, 10.0, 1.0));
    let mut process = PhysicsProcess::new(PhysicsConfig::default());
    process.init(bounds());

    process.begin(&mut units, false);

    let ref_id = units.get(a).unwrap().physics_ref().unwrap();
    let body = process.body_of(ref_id).unwrap();
    assert_eq!(body.radius, 10.0 * 0.6);
}

#[test]
fn test_begin_twice_keeps_one_ref_per_actor() {
    let mut units = UnitGroup::new();
    let a = units.spawn(Unit::new("a", Vec2::ZERO, 5.0, 1.0));
    units.spawn(Unit::new("b", Vec2::new(30.0, 0.0), 5.0, 1.0));
    let mut process = process();
    process.init(bounds());

    process.begin(&mut units, false);
    let first = units.get(a).unwrap().physics_ref();
    process.begin(&mut units, false);

    assert_eq!(process.ref_count(), 2);
    assert_eq!(process.world().unwrap().len(), 2);
    assert_eq!(units.get(a).unwrap().physics_ref(), first);
}

#[test]
fn test_despawned_actor_releases_its_body() {
    let mut units = UnitGroup::new();
    let a = units.spawn(Unit::new("a", Vec2::ZERO, 5.0, 1.0));
    let b = units.spawn(Unit::new("b", Vec2::new(6.0, 0.0), 5.0, 1.0));
    let mut process = process();
    process.init(bounds());
    process.begin(&mut units, false);

    units.despawn(b);
    tick(&mut process, &mut units, false);

    assert_eq!(process.ref_count(), 1);
    assert_eq!(process.world().unwrap().len(), 1);
    assert_eq!(pos(&units, a), Vec2::ZERO);
}

#[test]
fn test_recreated_actor_gets_a_fresh_binding() {
    let mut units = UnitGroup::new();
    units.spawn(Unit::new("anchor", Vec2::new(50.0, 50.0), 5.0, 1.0));
    let old = units.spawn(Unit::new("a", Vec2::ZERO, 5.0, 1.0));
    let mut process = process();
    process.init(bounds());
    tick(&mut process, &mut units, false);

    let stale = units.despawn(old).unwrap();
    let mut revived = Unit::new("a", Vec2::ZERO, 5.0, 1.0);
    // Carry over the old slot as a careless owner might
    revived.set_physics_ref(stale.physics_ref());
    let new = units.spawn(revived);
    tick(&mut process, &mut units, false);

    assert_eq!(process.ref_count(), 2);
    assert_eq!(process.world().unwrap().len(), 2);
    let slot = units.get(new).unwrap().physics_ref();
    assert!(slot.is_some());
    assert_ne!(slot, stale.physics_ref());
}

#[test]
fn test_reset_drops_world_and_refs() {
    let mut units = UnitGroup::new();
    let a = units.spawn(Unit::new("a", Vec2::ZERO, 5.0, 1.0));
    let b = units.spawn(Unit::new("b", Vec2::new(6.0, 0.0), 5.0, 1.0));
    let mut process = process();
    process.init(bounds());
    process.begin(&mut units, false);

    process.reset();
    process.reset();
    tick(&mut process, &mut units, false);

    assert!(!process.is_initialized());
    assert!(process.world().is_none());
    assert_eq!(process.ref_count(), 0);
    assert_eq!(pos(&units, a), Vec2::ZERO);
    assert_eq!(pos(&units, b), Vec2::new(6.0, 0.0));
}

#[test]
fn test_init_after_reset_rebinds_stale_slots() {
    let mut units = UnitGroup::new();
    let a = units.spawn(Unit::new("a", Vec2::ZERO, 5.0, 1.0));
    units.spawn(Unit::new("b", Vec2::new(6.0, 0.0), 5.0, 1.0));
    let mut process = process();
    process.init(bounds());
    process.begin(&mut units, false);
    let before = units.get(a).unwrap().physics_ref();

    process.init(bounds());
    process.begin(&mut units, false);

    assert_eq!(process.ref_count(), 2);
    assert_eq!(process.world().unwrap().len(), 2);
    let after = units.get(a).unwrap().physics_ref();
    assert!(after.is_some());
    assert_ne!(before, after);
}

#[test]
fn test_client_only_moves_local_actor() {
    let mut units = UnitGroup::new();
    let me = units.spawn(Unit::new("me", Vec2::ZERO, 5.0, 1.0).local());
    let other = units.spawn(Unit::new("other", Vec2::new(6.0, 0.0), 5.0, 1.0));
    let mut process = process();
    process.init(bounds());

    tick(&mut process, &mut units, true);

    assert!(approx_eq_vec2(pos(&units, me), Vec2::new(-1.6, 0.0), 1e-5));
    assert_eq!(pos(&units, other), Vec2::new(6.0, 0.0));
}

#[test]
fn test_client_without_local_actor_moves_nothing() {
    let mut units = UnitGroup::new();
    let a = units.spawn(Unit::new("a", Vec2::ZERO, 5.0, 1.0));
    let b = units.spawn(Unit::new("b", Vec2::new(6.0, 0.0), 5.0, 1.0));
    let mut process = process();
    process.init(bounds());

    tick(&mut process, &mut units, true);

    assert_eq!(pos(&units, a), Vec2::ZERO);
    assert_eq!(pos(&units, b), Vec2::new(6.0, 0.0));
    assert_eq!(process.last_stats().movers, 0);
}

#[test]
fn test_actor_without_physics_is_never_bound() {
    let mut units = UnitGroup::new();
    let a = units.spawn(Unit::new("a", Vec2::ZERO, 5.0, 1.0));
    let wall = units.spawn(Unit::new("wall", Vec2::new(6.0, 0.0), 5.0, 1.0).with_physics(false));
    let mut process = process();
    process.init(bounds());

    tick(&mut process, &mut units, false);

    assert_eq!(process.ref_count(), 1);
    assert!(units.get(wall).unwrap().physics_ref().is_none());
    assert_eq!(pos(&units, a), Vec2::ZERO);
}

#[test]
fn test_actor_that_loses_physics_is_unbound() {
    let mut units = UnitGroup::new();
    let a = units.spawn(Unit::new("a", Vec2::ZERO, 5.0, 1.0));
    let mut process = process();
    process.init(bounds());
    process.begin(&mut units, false);
    assert!(units.get(a).unwrap().physics_ref().is_some());

    units.get_mut(a).unwrap().physics = false;
    process.begin(&mut units, false);

    assert_eq!(process.ref_count(), 0);
    assert!(process.world().unwrap().is_empty());
    assert!(units.get(a).unwrap().physics_ref().is_none());
}

#[test]
fn test_layer_is_refreshed_every_begin() {
    let mut units = UnitGroup::new();
    let a = units.spawn(Unit::new("a", Vec2::ZERO, 5.0, 1.0));
    let b = units.spawn(Unit::new("b", Vec2::new(6.0, 0.0), 5.0, 1.0));
    let mut process = process();
    process.init(bounds());
    process.begin(&mut units, false);

    units.get_mut(b).unwrap().layer = Some(Layer::Flying);
    tick(&mut process, &mut units, false);

    assert_eq!(pos(&units, a), Vec2::ZERO);
    assert_eq!(pos(&units, b), Vec2::new(6.0, 0.0));
    let ref_id = units.get(b).unwrap().physics_ref().unwrap();
    assert_eq!(process.body_of(ref_id).unwrap().layer, Some(Layer::Flying));
}

#[test]
fn test_step_starts_from_actor_position() {
    let mut units = UnitGroup::new();
    let a = units.spawn(Unit::new("a", Vec2::ZERO, 5.0, 1.0));
    let b = units.spawn(Unit::new("b", Vec2::new(6.0, 0.0), 5.0, 1.0));
    let mut process = process();
    process.init(bounds());
    tick(&mut process, &mut units, false);

    // Teleport apart between ticks; the stale body positions must not leak
    units.get_mut(a).unwrap().pos = Vec2::new(-50.0, 0.0);
    units.get_mut(b).unwrap().pos = Vec2::new(50.0, 0.0);
    tick(&mut process, &mut units, false);

    assert_eq!(pos(&units, a), Vec2::new(-50.0, 0.0));
    assert_eq!(pos(&units, b), Vec2::new(50.0, 0.0));
    assert_eq!(process.last_stats().contacts, 0);
}

#[test]
fn test_non_positive_actor_mass_is_clamped() {
    let mut units = UnitGroup::new();
    let a = units.spawn(Unit::new("a", Vec2::ZERO, 5.0, 0.0));
    let mut process = process();
    process.init(bounds());

    process.begin(&mut units, false);

    let ref_id = units.get(a).unwrap().physics_ref().unwrap();
    assert_eq!(process.body_of(ref_id).unwrap().mass(), MIN_MASS);
}

/// Actors stored by slot; a freed slot goes to the next actor created
struct Slots(Vec<Option<Unit>>);

impl ActorGroup for Slots {
    type Id = usize;
    type Actor = Unit;

    fn get_mut(&mut self, id: usize) -> Option<&mut Unit> {
        self.0.get_mut(id)?.as_mut()
    }

    fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, &mut Unit),
    {
        for (id, slot) in self.0.iter_mut().enumerate() {
            if let Some(unit) = slot {
                f(id, unit);
            }
        }
    }
}

#[test]
fn test_reused_actor_id_replaces_old_binding() {
    let mut slots = Slots(vec![
        Some(Unit::new("old", Vec2::new(50.0, 50.0), 5.0, 1.0)),
        Some(Unit::new("a", Vec2::ZERO, 5.0, 1.0)),
    ]);
    let mut process: PhysicsProcess<usize> = PhysicsProcess::new(PhysicsConfig {
        collision_radius_scale: 1.0,
        parallel: false,
    });
    process.init(bounds());

    process.begin(&mut slots, false);
    process.process();
    process.end(&mut slots);
    let old_ref = slots.0[0].as_ref().unwrap().physics_ref();
    assert!(old_ref.is_some());

    // Same id, different actor
    slots.0[0] = Some(Unit::new("new", Vec2::new(6.0, 0.0), 5.0, 1.0));
    process.begin(&mut slots, false);
    process.process();
    process.end(&mut slots);

    assert_eq!(process.ref_count(), 2);
    assert_eq!(process.world().unwrap().len(), 2);
    assert!(process.refs().all(|(ref_id, _)| Some(ref_id) != old_ref));

    let new = slots.0[0].as_ref().unwrap();
    let a = slots.0[1].as_ref().unwrap();
    assert!(new.physics_ref().is_some());
    assert_ne!(new.physics_ref(), old_ref);
    assert!(approx_eq_vec2(new.pos, Vec2::new(7.6, 0.0), 1e-5), "new = {:?}", new.pos);
    assert!(approx_eq_vec2(a.pos, Vec2::new(-1.6, 0.0), 1e-5), "a = {:?}", a.pos);
}
