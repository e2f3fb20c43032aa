//! Falling crates demonstration
//!
//! This example shows:
//! - Level geometry and dynamic crates
//! - A trigger area reporting who passes through
//! - Fall damage removing a fragile crate
//!
//! Run with `RUST_LOG=debug` to see the world's own log output.

use awg_physics::prelude::*;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Falling Crates Demo");
    println!("===================\n");

    let mut world = PhysicsWorld::new(PhysicsConfig::default())?;

    let obstacle = CollisionFilter::from_names(&["obstacle"], None, None)?;
    world.spawn(
        ObjectDesc::polygon(
            [0.0, 0.0],
            rect_points(2000.0, 64.0, [0.0, -32.0]).to_vec(),
            PhysicProps::fixed().with_filter(obstacle),
        )
        .with_kind(EntityKind::Geometry),
    )?;

    world.spawn_trigger(
        TriggerDesc::new([400.0, 64.0])
            .at([0.0, 100.0])
            .on_enter(|event, _| println!("  {} entered {}", event.actor.id, event.trigger))
            .on_leave(|event, _| println!("  {} left {}", event.actor.id, event.trigger)),
    )?;

    let sturdy = world.spawn(
        ObjectDesc::polygon(
            [-100.0, 400.0],
            rect_points(32.0, 32.0, [0.0, 16.0]).to_vec(),
            PhysicProps::dynamic().with_material(PhysicsMaterial::metal()),
        )
        .with_kind(EntityKind::MetalCrate),
    )?;

    let mortal = Mortal::new(10).with_lethal_fall_velocity(64.0).shared();
    let fragile = world.spawn_with_hooks(
        ObjectDesc::polygon(
            [100.0, 400.0],
            rect_points(32.0, 32.0, [0.0, 16.0]).to_vec(),
            PhysicProps::dynamic().with_material(PhysicsMaterial::wood()),
        )
        .with_kind(EntityKind::WoodenCrate),
        Box::new(mortal.clone()),
    )?;

    println!("Simulating 2 seconds...\n");
    for frame in 0..120 {
        world.step(1.0 / 60.0)?;
        if frame % 30 == 29 {
            println!("t = {:.2}s, {} bodies", world.time(), world.body_count());
        }
    }

    println!();
    println!("metal crate at {:?}", world.position(sturdy)?);
    match world.position(fragile) {
        Ok(pos) => println!("wooden crate at {pos:?}, health {}", mortal.lock().health),
        Err(_) => println!("wooden crate broke on landing"),
    }

    Ok(())
}
