//! Integration tests for trigger areas driven by the physics world

use approx::assert_relative_eq;
use awg_physics::prelude::*;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

const DT: f32 = 1.0 / 60.0;
const FAR: [f32; 2] = [1000.0, 0.0];

#[derive(Default)]
struct Counters {
    enters: AtomicU32,
    leaves: AtomicU32,
}

fn counted(desc: TriggerDesc, counters: &Arc<Counters>) -> TriggerDesc {
    let on_enter = counters.clone();
    let on_leave = counters.clone();
    desc.on_enter(move |_, _| {
        on_enter.enters.fetch_add(1, Ordering::SeqCst);
    })
    .on_leave(move |_, _| {
        on_leave.leaves.fetch_add(1, Ordering::SeqCst);
    })
}

fn hero(world: &mut PhysicsWorld, position: [f32; 2]) -> ObjectId {
    world
        .spawn(
            ObjectDesc::circle(position, 10.0, PhysicProps::kinematic())
                .with_kind(EntityKind::Hero),
        )
        .unwrap()
}

fn steps(world: &mut PhysicsWorld, n: usize) {
    for _ in 0..n {
        world.step(DT).unwrap();
    }
}

#[test]
fn test_enter_and_leave() {
    let counters = Arc::new(Counters::default());
    let mut world = PhysicsWorld::default();
    let trigger = world
        .spawn_trigger(counted(TriggerDesc::new([50.0, 50.0]).at([0.0, 0.0]), &counters))
        .unwrap();
    let actor = hero(&mut world, FAR);
    steps(&mut world, 2);
    assert_eq!(counters.enters.load(Ordering::SeqCst), 0);

    world.set_position(actor, [0.0, 0.0]).unwrap();
    steps(&mut world, 1);
    assert_eq!(counters.enters.load(Ordering::SeqCst), 1);
    assert!(world.trigger(trigger).unwrap().is_inside(actor));

    // Staying inside does not enter again
    steps(&mut world, 5);
    assert_eq!(counters.enters.load(Ordering::SeqCst), 1);

    world.set_position(actor, FAR).unwrap();
    steps(&mut world, 1);
    assert_eq!(counters.leaves.load(Ordering::SeqCst), 1);
    assert!(world.trigger(trigger).unwrap().is_empty());

    world.set_position(actor, [0.0, 0.0]).unwrap();
    steps(&mut world, 1);
    assert_eq!(counters.enters.load(Ordering::SeqCst), 2);
    assert_eq!(world.trigger(trigger).unwrap().activation_count, 2);
}

#[test]
fn test_falling_body_enters() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let log = events.clone();
    let mut world = PhysicsWorld::default();
    world
        .spawn_trigger(
            TriggerDesc::new([200.0, 40.0])
                .at([0.0, 0.0])
                .on_enter(move |event, _| log.lock().push(event.actor.id)),
        )
        .unwrap();
    let body = world
        .spawn(ObjectDesc::circle([0.0, 100.0], 5.0, PhysicProps::dynamic()))
        .unwrap();

    steps(&mut world, 30);

    // Sensors never push back
    assert!(world.position(body).unwrap()[1] < -20.0);
    assert_eq!(events.lock().as_slice(), &[body]);
}

#[test]
fn test_allow_list_and_ignore() {
    let counters = Arc::new(Counters::default());
    let mut world = PhysicsWorld::default();
    let prop = world
        .spawn(ObjectDesc::circle(FAR, 10.0, PhysicProps::kinematic()))
        .unwrap();
    let ignored = hero(&mut world, FAR);
    let welcome = hero(&mut world, FAR);
    let trigger = world
        .spawn_trigger(counted(
            TriggerDesc::new([50.0, 50.0])
                .at([0.0, 0.0])
                .allow_kind(EntityKind::Hero)
                .ignore([ignored]),
            &counters,
        ))
        .unwrap();
    steps(&mut world, 2);

    for id in [prop, ignored, welcome] {
        world.set_position(id, [0.0, 0.0]).unwrap();
    }
    steps(&mut world, 1);

    let trigger = world.trigger(trigger).unwrap();
    assert_eq!(counters.enters.load(Ordering::SeqCst), 1);
    assert!(trigger.is_inside(welcome));
    assert!(!trigger.is_inside(prop));
    assert!(!trigger.is_inside(ignored));
}

#[test]
fn test_triggered_by_categories() {
    let counters = Arc::new(Counters::default());
    let mut world = PhysicsWorld::default();
    let player = CollisionFilter::from_names(&["character", "player"], None, None).unwrap();
    let npc = CollisionFilter::from_names(&["character"], None, None).unwrap();

    let hero = world
        .spawn(ObjectDesc::circle(FAR, 10.0, PhysicProps::kinematic().with_filter(player)))
        .unwrap();
    let other = world
        .spawn(ObjectDesc::circle(FAR, 10.0, PhysicProps::kinematic().with_filter(npc)))
        .unwrap();
    world
        .spawn_trigger(counted(
            TriggerDesc::new([50.0, 50.0])
                .at([0.0, 0.0])
                .triggered_by(CollisionCategory::Player.bits()),
            &counters,
        ))
        .unwrap();
    steps(&mut world, 2);

    world.set_position(other, [0.0, 0.0]).unwrap();
    steps(&mut world, 1);
    assert_eq!(counters.enters.load(Ordering::SeqCst), 0);

    world.set_position(hero, [0.0, 0.0]).unwrap();
    steps(&mut world, 1);
    assert_eq!(counters.enters.load(Ordering::SeqCst), 1);
}

#[test]
fn test_anchored_trigger_follows_one_step_behind() {
    let mut world = PhysicsWorld::default();
    let anchor = hero(&mut world, [0.0, 0.0]);
    let trigger = world
        .spawn_trigger(TriggerDesc::new([20.0, 20.0]).anchored_to(anchor, [0.0, 30.0]))
        .unwrap();
    world.set_velocity(anchor, [60.0, 0.0]).unwrap();
    steps(&mut world, 1);

    for _ in 0..10 {
        world.step(DT).unwrap();
        let [ax, ay] = world.position(anchor).unwrap();
        let [tx, ty] = world.position(trigger).unwrap();
        assert_relative_eq!(tx, ax, epsilon = 1e-3);
        assert_relative_eq!(ty, ay + 30.0, epsilon = 1e-3);
    }

    // Teleporting the anchor moves the trigger only after the next step
    world.set_position(anchor, [500.0, 0.0]).unwrap();
    assert!(world.position(trigger).unwrap()[0] < 100.0);
    world.step(DT).unwrap();
    assert!(world.position(trigger).unwrap()[0] > 499.0);
}

#[test]
fn test_anchor_never_enters_own_trigger() {
    let counters = Arc::new(Counters::default());
    let mut world = PhysicsWorld::default();
    let anchor = hero(&mut world, [0.0, 0.0]);
    let trigger = world
        .spawn_trigger(counted(
            TriggerDesc::new([40.0, 40.0]).anchored_to(anchor, [0.0, 0.0]),
            &counters,
        ))
        .unwrap();
    steps(&mut world, 5);

    assert_eq!(counters.enters.load(Ordering::SeqCst), 0);
    assert!(world.trigger(trigger).unwrap().is_empty());
}

#[test]
fn test_vanishing_anchor_removes_trigger() {
    let mut world = PhysicsWorld::default();
    let anchor = hero(&mut world, [0.0, 0.0]);
    let first = world
        .spawn_trigger(TriggerDesc::new([20.0, 20.0]).anchored_to(anchor, [0.0, 30.0]))
        .unwrap();
    let second = world
        .spawn_trigger(TriggerDesc::new([20.0, 20.0]).anchored_to(anchor, [0.0, -30.0]))
        .unwrap();
    steps(&mut world, 1);
    assert_eq!(world.body_count(), 3);

    world.vanish(anchor).unwrap();
    assert!(!world.contains(first));
    assert!(!world.contains(second));

    steps(&mut world, 1);
    assert_eq!(world.body_count(), 0);
}

#[test]
fn test_removed_actor_leaves() {
    let counters = Arc::new(Counters::default());
    let mut world = PhysicsWorld::default();
    let trigger = world
        .spawn_trigger(counted(TriggerDesc::new([50.0, 50.0]).at([0.0, 0.0]), &counters))
        .unwrap();
    let actor = hero(&mut world, [0.0, 0.0]);
    steps(&mut world, 2);
    assert!(world.trigger(trigger).unwrap().is_inside(actor));

    world.vanish(actor);
    steps(&mut world, 2);

    assert_eq!(counters.leaves.load(Ordering::SeqCst), 1);
    assert!(world.trigger(trigger).unwrap().is_empty());
}

#[test]
fn test_leave_of_removed_actor_applies_commands_same_step() {
    let mut world = PhysicsWorld::default();
    let door = world
        .spawn(ObjectDesc::circle(FAR, 10.0, PhysicProps::kinematic()))
        .unwrap();
    world
        .spawn_trigger(
            TriggerDesc::new([50.0, 50.0])
                .at([0.0, 0.0])
                .on_leave(move |_, commands| commands.set_velocity(door, [0.0, 50.0])),
        )
        .unwrap();
    let actor = hero(&mut world, [0.0, 0.0]);
    steps(&mut world, 2);

    world.vanish(actor);
    steps(&mut world, 1);

    assert_eq!(world.velocity(door).unwrap(), [0.0, 50.0]);
}

#[test]
fn test_callback_commands() {
    let mut world = PhysicsWorld::default();
    let pit = world
        .spawn_trigger(
            TriggerDesc::new([100.0, 20.0])
                .at([0.0, 0.0])
                .on_enter(|event, commands| commands.vanish(event.actor.id)),
        )
        .unwrap();
    let victim = world
        .spawn(ObjectDesc::circle([0.0, 60.0], 5.0, PhysicProps::dynamic()))
        .unwrap();

    steps(&mut world, 60);

    assert!(!world.contains(victim));
    assert!(world.contains(pit));
    assert!(world.trigger(pit).unwrap().is_empty());
}

#[test]
fn test_disabled_trigger() {
    let counters = Arc::new(Counters::default());
    let mut world = PhysicsWorld::default();
    let trigger = world
        .spawn_trigger(counted(TriggerDesc::new([50.0, 50.0]).at([0.0, 0.0]), &counters))
        .unwrap();
    let actor = hero(&mut world, FAR);
    steps(&mut world, 2);

    world.trigger_mut(trigger).unwrap().enabled = false;
    world.set_position(actor, [0.0, 0.0]).unwrap();
    steps(&mut world, 1);

    assert_eq!(counters.enters.load(Ordering::SeqCst), 0);
}
