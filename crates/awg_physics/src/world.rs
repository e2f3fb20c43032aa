//! Physics world - main simulation container

use crate::body::BodyKind;
use crate::collider::{object_id, with_group, ObjectDesc};
use crate::commands::{Command, Commands};
use crate::config::PhysicsConfig;
use crate::dispatch::{dispatch_trigger_events, post_solve, ChannelEventCollector, PairKey, StepHooks};
use crate::error::{PhysicsError, Result};
use crate::layers::CollisionFilter;
use crate::queue::{PendingQueues, Primitive, PrimitiveRef};
use crate::registry::{CollisionHooks, NullObject, PhysicObject, Registry};
use awg_core::{EntityKind, IdGenerator, JointId, ObjectId};
use rapier2d::prelude as rapier;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::sync::Arc;

/// The main physics world containing all simulation state
pub struct PhysicsWorld {
    /// Configuration
    pub(crate) config: PhysicsConfig,

    /// Rapier physics pipeline
    pub(crate) pipeline: rapier::PhysicsPipeline,

    /// Gravity
    pub(crate) gravity: rapier::Vector<f32>,

    /// Integration parameters
    pub(crate) integration_params: rapier::IntegrationParameters,

    /// Island manager
    pub(crate) islands: rapier::IslandManager,

    /// Broad phase
    pub(crate) broad_phase: rapier::DefaultBroadPhase,

    /// Narrow phase
    pub(crate) narrow_phase: rapier::NarrowPhase,

    /// Impulse joint set
    pub(crate) impulse_joints: rapier::ImpulseJointSet,

    /// Multibody joint set
    pub(crate) multibody_joints: rapier::MultibodyJointSet,

    /// CCD solver
    pub(crate) ccd_solver: rapier::CCDSolver,

    /// Query pipeline, refreshed at the end of every step
    pub(crate) query_pipeline: rapier::QueryPipeline,

    /// Rigid body set
    pub(crate) bodies: rapier::RigidBodySet,

    /// Collider set
    pub(crate) colliders: rapier::ColliderSet,

    /// Id source shared with the command buffer
    pub(crate) ids: Arc<IdGenerator>,

    /// Registered objects
    pub(crate) registry: Registry,

    /// Live body and collider of every flushed object
    pub(crate) handles: HashMap<ObjectId, (rapier::RigidBodyHandle, rapier::ColliderHandle)>,

    /// Live joints and the objects they connect
    pub(crate) joints: HashMap<JointId, (rapier::ImpulseJointHandle, ObjectId, ObjectId)>,

    /// Deferred additions and removals
    pub(crate) pending: PendingQueues,

    /// Colliders removed by the last flush, kept resolvable for their stop events
    pub(crate) retired: HashMap<rapier::ColliderHandle, ObjectId>,

    /// Pairs touching after the last step
    pub(crate) touching: HashSet<PairKey>,

    /// Pairs whose pre-solve hooks already ran for the current touch
    pub(crate) presolved: HashSet<PairKey>,

    /// Bodies with a force to clear after the next step
    pub(crate) forced: HashSet<ObjectId>,

    /// Changes requested by hooks and trigger callbacks
    pub(crate) commands: Commands,

    /// Simulated time
    pub(crate) time: f32,
}

impl PhysicsWorld {
    /// Create a new physics world
    pub fn new(config: PhysicsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: PhysicsConfig) -> Self {
        let gravity = rapier::Vector::new(config.gravity[0], config.gravity[1]);

        let mut integration_params = rapier::IntegrationParameters::default();
        integration_params.dt = config.max_step;
        integration_params.length_unit = config.length_unit;
        integration_params.num_solver_iterations =
            NonZeroUsize::new(config.solver_iterations).unwrap_or(NonZeroUsize::MIN);

        log::debug!(
            "creating physics world: gravity {:?}, max step {:.4}s",
            config.gravity,
            config.max_step
        );

        let ids = Arc::new(IdGenerator::new());

        Self {
            config,
            pipeline: rapier::PhysicsPipeline::new(),
            gravity,
            integration_params,
            islands: rapier::IslandManager::new(),
            broad_phase: rapier::DefaultBroadPhase::new(),
            narrow_phase: rapier::NarrowPhase::new(),
            impulse_joints: rapier::ImpulseJointSet::new(),
            multibody_joints: rapier::MultibodyJointSet::new(),
            ccd_solver: rapier::CCDSolver::new(),
            query_pipeline: rapier::QueryPipeline::new(),
            bodies: rapier::RigidBodySet::new(),
            colliders: rapier::ColliderSet::new(),
            commands: Commands::new(ids.clone()),
            ids,
            registry: Registry::new(),
            handles: HashMap::new(),
            joints: HashMap::new(),
            pending: PendingQueues::default(),
            retired: HashMap::new(),
            touching: HashSet::new(),
            presolved: HashSet::new(),
            forced: HashSet::new(),
            time: 0.0,
        }
    }

    /// Get the physics configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Set gravity
    pub fn set_gravity(&mut self, x: f32, y: f32) {
        self.gravity = rapier::Vector::new(x, y);
        self.config.gravity = [x, y];
    }

    /// Get gravity
    pub fn gravity(&self) -> [f32; 2] {
        [self.gravity.x, self.gravity.y]
    }

    /// Simulated time so far
    pub fn time(&self) -> f32 {
        self.time
    }

    // ==================== Registry ====================

    /// Register an object. Its body must be queued separately with [`add`](Self::add).
    pub fn add_object(&mut self, object: PhysicObject) {
        self.registry.insert(object);
    }

    /// Queue bodies and joints for addition at the end of the next step
    pub fn add(&mut self, primitives: impl IntoIterator<Item = Primitive>) {
        for primitive in primitives {
            self.pending.push_add(primitive);
        }
    }

    /// Queue bodies and joints for removal at the end of the next step
    pub fn delete(&mut self, primitives: impl IntoIterator<Item = PrimitiveRef>) {
        for primitive in primitives {
            self.pending.push_delete(primitive);
        }
    }

    /// Create an object with no collision hooks
    pub fn spawn(&mut self, desc: ObjectDesc) -> Result<ObjectId> {
        self.spawn_with_hooks(desc, Box::new(NullObject))
    }

    /// Create an object.
    ///
    /// The object is registered right away; its body joins the simulation
    /// at the end of the next step.
    pub fn spawn_with_hooks(
        &mut self,
        desc: ObjectDesc,
        hooks: Box<dyn CollisionHooks>,
    ) -> Result<ObjectId> {
        let id = self.ids.next_object();
        self.spawn_as(id, desc, hooks)?;
        Ok(id)
    }

    fn spawn_as(
        &mut self,
        id: ObjectId,
        desc: ObjectDesc,
        hooks: Box<dyn CollisionHooks>,
    ) -> Result<()> {
        let (body, collider) = desc.build(id, &self.config)?;
        self.add_object(PhysicObject::new(id, desc.kind, desc.props.filter).with_hooks(hooks));
        self.add([Primitive::Body { id, body, collider }]);
        log::trace!("spawned {id} ({})", desc.kind);
        Ok(())
    }

    /// Remove an object from the registry now and from the simulation at the
    /// end of the next step. Triggers anchored to it go with it.
    pub fn vanish(&mut self, id: ObjectId) -> Option<PhysicObject> {
        let object = self.registry.remove(id)?;
        self.pending.push_delete(PrimitiveRef::Body(id));
        log::debug!("vanished {id} ({})", object.kind);

        for trigger in self.registry.anchored_to(id) {
            self.vanish(trigger);
        }

        Some(object)
    }

    /// Remove everything
    pub fn clear(&mut self) {
        let count = self.registry.len();

        // One at a time: vanishing an anchor also removes its triggers
        while let Some(id) = self.registry.any_id() {
            self.vanish(id);
        }

        // Queued bodies and joints never enter; every live body leaves
        self.pending.clear();
        let live: Vec<_> = self.handles.keys().copied().collect();
        for id in live {
            self.pending.push_delete(PrimitiveRef::Body(id));
        }

        self.commands.clear();
        self.flush();

        for (_, (handle, _, _)) in self.joints.drain() {
            self.impulse_joints.remove(handle, false);
        }
        self.touching.clear();
        self.presolved.clear();
        self.forced.clear();
        self.query_pipeline.update(&self.colliders);

        log::debug!("cleared physics world ({count} objects)");
    }

    /// Registry record of an object
    pub fn object(&self, id: ObjectId) -> Option<&PhysicObject> {
        self.registry.get(id)
    }

    /// The registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Whether an object is registered
    pub fn contains(&self, id: ObjectId) -> bool {
        self.registry.contains(id)
    }

    /// Entity kind of an object
    pub fn kind(&self, id: ObjectId) -> Result<EntityKind> {
        self.registry
            .get(id)
            .map(|obj| obj.kind)
            .ok_or(PhysicsError::ObjectNotFound(id))
    }

    /// Replace an object's collision filter
    pub fn set_filter(&mut self, id: ObjectId, filter: CollisionFilter) -> Result<()> {
        let object = self
            .registry
            .get_mut(id)
            .ok_or(PhysicsError::ObjectNotFound(id))?;
        object.filter = filter;

        let (body, collider) = self.parts_mut(id)?;
        collider.set_collision_groups(filter.to_rapier());
        collider.user_data = with_group(collider.user_data, filter.group);
        body.user_data = with_group(body.user_data, filter.group);
        Ok(())
    }

    /// Pending additions and removals
    pub fn pending(&self) -> &PendingQueues {
        &self.pending
    }

    // ==================== Body Access ====================

    /// Body and collider of an object, live or still queued
    pub(crate) fn parts(&self, id: ObjectId) -> Result<(&rapier::RigidBody, &rapier::Collider)> {
        if let Some(&(body, collider)) = self.handles.get(&id) {
            if let (Some(body), Some(collider)) = (self.bodies.get(body), self.colliders.get(collider)) {
                return Ok((body, collider));
            }
        }
        self.pending.body(id).ok_or(PhysicsError::ObjectNotFound(id))
    }

    pub(crate) fn parts_mut(
        &mut self,
        id: ObjectId,
    ) -> Result<(&mut rapier::RigidBody, &mut rapier::Collider)> {
        if let Some(&(body, collider)) = self.handles.get(&id) {
            if let (Some(body), Some(collider)) =
                (self.bodies.get_mut(body), self.colliders.get_mut(collider))
            {
                return Ok((body, collider));
            }
        }
        self.pending
            .body_mut(id)
            .ok_or(PhysicsError::ObjectNotFound(id))
    }

    fn body_mut(&mut self, id: ObjectId) -> Result<&mut rapier::RigidBody> {
        self.parts_mut(id).map(|(body, _)| body)
    }

    fn collider_mut(&mut self, id: ObjectId) -> Result<&mut rapier::Collider> {
        self.parts_mut(id).map(|(_, collider)| collider)
    }

    /// Position of the body
    pub fn position(&self, id: ObjectId) -> Result<[f32; 2]> {
        let (body, _) = self.parts(id)?;
        let pos = body.translation();
        Ok([pos.x, pos.y])
    }

    /// Teleport the body
    pub fn set_position(&mut self, id: ObjectId, position: [f32; 2]) -> Result<()> {
        self.body_mut(id)?
            .set_translation(rapier::Vector::new(position[0], position[1]), true);
        Ok(())
    }

    /// Linear velocity of the body
    pub fn velocity(&self, id: ObjectId) -> Result<[f32; 2]> {
        let (body, _) = self.parts(id)?;
        let vel = body.linvel();
        Ok([vel.x, vel.y])
    }

    /// Set linear velocity
    pub fn set_velocity(&mut self, id: ObjectId, velocity: [f32; 2]) -> Result<()> {
        self.body_mut(id)?
            .set_linvel(rapier::Vector::new(velocity[0], velocity[1]), true);
        Ok(())
    }

    /// Rotation in radians
    pub fn rotation(&self, id: ObjectId) -> Result<f32> {
        let (body, _) = self.parts(id)?;
        Ok(body.rotation().angle())
    }

    /// Rotation in degrees
    pub fn rotation_degrees(&self, id: ObjectId) -> Result<f32> {
        self.rotation(id).map(f32::to_degrees)
    }

    /// Set rotation in radians
    pub fn set_rotation(&mut self, id: ObjectId, angle: f32) -> Result<()> {
        self.body_mut(id)?
            .set_rotation(rapier::Rotation::new(angle), true);
        Ok(())
    }

    /// Angular velocity in radians per second
    pub fn angular_velocity(&self, id: ObjectId) -> Result<f32> {
        let (body, _) = self.parts(id)?;
        Ok(body.angvel())
    }

    /// Set angular velocity
    pub fn set_angular_velocity(&mut self, id: ObjectId, angvel: f32) -> Result<()> {
        self.body_mut(id)?.set_angvel(angvel, true);
        Ok(())
    }

    /// Mass of the object's shape
    pub fn mass(&self, id: ObjectId) -> Result<f32> {
        let (_, collider) = self.parts(id)?;
        Ok(collider.mass())
    }

    /// Set mass
    pub fn set_mass(&mut self, id: ObjectId, mass: f32) -> Result<()> {
        self.collider_mut(id)?.set_mass(mass);
        Ok(())
    }

    /// Friction coefficient
    pub fn friction(&self, id: ObjectId) -> Result<f32> {
        let (_, collider) = self.parts(id)?;
        Ok(collider.friction())
    }

    /// Set friction
    pub fn set_friction(&mut self, id: ObjectId, friction: f32) -> Result<()> {
        self.collider_mut(id)?.set_friction(friction);
        Ok(())
    }

    /// Elasticity (restitution)
    pub fn elasticity(&self, id: ObjectId) -> Result<f32> {
        let (_, collider) = self.parts(id)?;
        Ok(collider.restitution())
    }

    /// Set elasticity
    pub fn set_elasticity(&mut self, id: ObjectId, elasticity: f32) -> Result<()> {
        self.collider_mut(id)?.set_restitution(elasticity);
        Ok(())
    }

    /// Allow or forbid rotation. Forbidding it gives the body an infinite moment.
    pub fn set_can_rotate(&mut self, id: ObjectId, can_rotate: bool) -> Result<()> {
        self.body_mut(id)?.lock_rotations(!can_rotate, true);
        Ok(())
    }

    /// Body kind
    pub fn body_kind(&self, id: ObjectId) -> Result<BodyKind> {
        let (body, _) = self.parts(id)?;
        Ok(body.body_type().into())
    }

    /// Apply an impulse at the centre of mass
    pub fn apply_impulse(&mut self, id: ObjectId, impulse: [f32; 2]) -> Result<()> {
        self.body_mut(id)?
            .apply_impulse(rapier::Vector::new(impulse[0], impulse[1]), true);
        Ok(())
    }

    /// Apply a force at the centre of mass for the next step only
    pub fn apply_force(&mut self, id: ObjectId, force: [f32; 2]) -> Result<()> {
        self.body_mut(id)?
            .add_force(rapier::Vector::new(force[0], force[1]), true);
        self.forced.insert(id);
        Ok(())
    }

    // ==================== Simulation ====================

    /// Advance the simulation by `dt` seconds.
    ///
    /// `dt` is clamped to `[0, max_step]`; a zero step does nothing. Returns
    /// the time actually simulated.
    pub fn step(&mut self, dt: f32) -> Result<f32> {
        if !(dt > 0.0) {
            return Ok(0.0);
        }
        let dt = dt.min(self.config.max_step);
        self.integration_params.dt = dt;

        let (event_handler, events) = ChannelEventCollector::new();
        {
            let hooks = StepHooks::new(
                &mut self.registry,
                &mut self.commands,
                &self.touching,
                &mut self.presolved,
                self.gravity,
                dt,
            );

            self.pipeline.step(
                &self.gravity,
                &self.integration_params,
                &mut self.islands,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                None,
                &hooks,
                &event_handler,
            );
        }

        self.reset_forces();
        self.check_finite()?;

        dispatch_trigger_events(
            &events,
            &self.colliders,
            &self.retired,
            &mut self.registry,
            &mut self.commands,
        );
        self.retired.clear();

        post_solve(
            &self.narrow_phase,
            &self.colliders,
            &mut self.registry,
            &mut self.commands,
            &mut self.touching,
            &mut self.presolved,
        );

        self.update_triggers();
        self.apply_commands();
        self.flush();
        // Leave callbacks of removed actors run inside the flush
        self.apply_commands();

        self.query_pipeline.update(&self.colliders);
        self.time += dt;
        Ok(dt)
    }

    /// Forces only last one step
    fn reset_forces(&mut self) {
        let handles = &self.handles;
        let bodies = &mut self.bodies;
        self.forced.retain(|id| match handles.get(id) {
            Some(&(handle, _)) => {
                if let Some(body) = bodies.get_mut(handle) {
                    body.reset_forces(false);
                }
                false
            }
            // Still queued; its force applies on its first step
            None => true,
        });
    }

    fn check_finite(&self) -> Result<()> {
        for (_, body) in self.bodies.iter() {
            let pos = body.translation();
            let vel = body.linvel();
            let finite = pos.x.is_finite()
                && pos.y.is_finite()
                && vel.x.is_finite()
                && vel.y.is_finite()
                && body.angvel().is_finite();

            if !finite {
                let id = object_id(body.user_data).unwrap_or(ObjectId::from_raw(0));
                log::warn!("non-finite state on {id}: pos {pos:?}, vel {vel:?}");
                return Err(PhysicsError::NumericalFault(id));
            }
        }
        Ok(())
    }

    fn apply_commands(&mut self) {
        for command in self.commands.take() {
            let result = match command {
                Command::Vanish(id) => {
                    self.vanish(id);
                    Ok(())
                }
                Command::SetPosition(id, position) => self.set_position(id, position),
                Command::SetVelocity(id, velocity) => self.set_velocity(id, velocity),
                Command::ApplyImpulse(id, impulse) => self.apply_impulse(id, impulse),
                Command::Spawn { id, desc, hooks } => self.spawn_as(id, desc, hooks),
            };
            if let Err(err) = result {
                log::trace!("dropped command: {err}");
            }
        }
    }

    /// Drain the queues: additions first, then removals
    pub(crate) fn flush(&mut self) {
        let adds = self.pending.pending_adds();
        let deletes = self.pending.pending_deletes();

        while let Some(primitive) = self.pending.add.pop_front() {
            match primitive {
                Primitive::Body { id, body, collider } => {
                    let body = self.bodies.insert(body);
                    let collider =
                        self.colliders
                            .insert_with_parent(collider, body, &mut self.bodies);
                    let previous = self.handles.insert(id, (body, collider));
                    debug_assert!(previous.is_none(), "body of {id} added twice");
                }
                Primitive::Joint { id, a, b, joint } => {
                    match (self.handles.get(&a), self.handles.get(&b)) {
                        (Some(&(body_a, _)), Some(&(body_b, _))) => {
                            let handle = self.impulse_joints.insert(body_a, body_b, joint, true);
                            self.joints.insert(id, (handle, a, b));
                        }
                        _ => log::warn!("skipping joint {id}: {a} or {b} no longer exists"),
                    }
                }
            }
        }

        while let Some(primitive) = self.pending.delete.pop_front() {
            match primitive {
                PrimitiveRef::Body(id) => {
                    let Some((body, collider)) = self.handles.remove(&id) else {
                        continue;
                    };
                    // Attached colliders and joints go with the body
                    self.bodies.remove(
                        body,
                        &mut self.islands,
                        &mut self.colliders,
                        &mut self.impulse_joints,
                        &mut self.multibody_joints,
                        true,
                    );
                    self.retired.insert(collider, id);
                    self.release_from_triggers(id);
                    self.joints.retain(|_, (_, a, b)| *a != id && *b != id);
                    self.forced.remove(&id);
                }
                PrimitiveRef::Joint(id) => {
                    if let Some((handle, _, _)) = self.joints.remove(&id) {
                        self.impulse_joints.remove(handle, true);
                    }
                }
            }
        }

        if adds + deletes > 0 {
            log::debug!("flushed {adds} additions and {deletes} removals");
        }
    }

    // ==================== Debug ====================

    /// Number of registered objects
    pub fn object_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of rigid bodies in the simulation
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of colliders in the simulation
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Number of active (awake) bodies
    pub fn active_body_count(&self) -> usize {
        self.islands.active_dynamic_bodies().len()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::build(PhysicsConfig::default())
    }
}

impl std::fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("time", &self.time)
            .field("objects", &self.registry.len())
            .field("bodies", &self.bodies.len())
            .field("joints", &self.joints.len())
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::PhysicProps;
    use crate::collider::rect_points;
    use approx::assert_relative_eq;

    fn ball(world: &mut PhysicsWorld, pos: [f32; 2]) -> ObjectId {
        world
            .spawn(ObjectDesc::circle(pos, 5.0, PhysicProps::dynamic()))
            .unwrap()
    }

    #[test]
    fn test_create_world() {
        let world = PhysicsWorld::new(PhysicsConfig::default()).unwrap();
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.collider_count(), 0);
        assert_eq!(world.gravity(), [0.0, -2000.0]);
    }

    #[test]
    fn test_invalid_config() {
        let config = PhysicsConfig::default().with_max_step(-1.0);
        assert!(matches!(
            PhysicsWorld::new(config),
            Err(PhysicsError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_spawn_is_deferred() {
        let mut world = PhysicsWorld::default();
        let id = ball(&mut world, [0.0, 100.0]);

        assert!(world.contains(id));
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.pending().pending_adds(), 1);
        // Accessors see queued bodies
        assert_eq!(world.position(id).unwrap(), [0.0, 100.0]);

        world.step(1.0 / 60.0).unwrap();
        assert_eq!(world.body_count(), 1);
        assert!(world.pending().is_empty());
    }

    #[test]
    fn test_zero_and_negative_steps() {
        let mut world = PhysicsWorld::default();
        let id = ball(&mut world, [0.0, 0.0]);
        world.step(1.0 / 60.0).unwrap();

        let before = world.position(id).unwrap();
        assert_eq!(world.step(0.0).unwrap(), 0.0);
        assert_eq!(world.step(-1.0).unwrap(), 0.0);
        assert_eq!(world.step(f32::NAN).unwrap(), 0.0);
        assert_eq!(world.position(id).unwrap(), before);
        assert_eq!(world.time(), 1.0 / 60.0);
    }

    #[test]
    fn test_gravity_fall() {
        let mut world = PhysicsWorld::default();
        let id = ball(&mut world, [0.0, 100.0]);

        for _ in 0..30 {
            world.step(1.0 / 60.0).unwrap();
        }

        assert!(world.position(id).unwrap()[1] < 100.0);
        assert!(world.velocity(id).unwrap()[1] < 0.0);
    }

    #[test]
    fn test_accessors() {
        let mut world = PhysicsWorld::default();
        let id = world
            .spawn(ObjectDesc::polygon(
                [0.0, 0.0],
                rect_points(10.0, 10.0, [0.0, 0.0]).to_vec(),
                PhysicProps::dynamic().with_mass(2.0),
            ))
            .unwrap();

        world.set_rotation(id, std::f32::consts::FRAC_PI_2).unwrap();
        assert_relative_eq!(world.rotation_degrees(id).unwrap(), 90.0, epsilon = 1e-3);

        assert_relative_eq!(world.mass(id).unwrap(), 2.0, epsilon = 1e-4);
        world.set_mass(id, 5.0).unwrap();
        assert_relative_eq!(world.mass(id).unwrap(), 5.0, epsilon = 1e-4);

        world.set_friction(id, 0.25).unwrap();
        assert_eq!(world.friction(id).unwrap(), 0.25);
        world.set_elasticity(id, 0.5).unwrap();
        assert_eq!(world.elasticity(id).unwrap(), 0.5);

        assert_eq!(world.body_kind(id).unwrap(), BodyKind::Dynamic);
        assert_eq!(world.kind(id).unwrap(), EntityKind::Prop);

        let missing = ObjectId::from_raw(999);
        assert!(matches!(
            world.position(missing),
            Err(PhysicsError::ObjectNotFound(m)) if m == missing
        ));
    }

    #[test]
    fn test_rotation_lock() {
        let mut world = PhysicsWorld::default();
        let id = ball(&mut world, [0.0, 0.0]);
        world.set_can_rotate(id, false).unwrap();
        world.step(1.0 / 60.0).unwrap();

        let (body, _) = world.parts(id).unwrap();
        assert!(body.locked_axes().contains(rapier::LockedAxes::ROTATION_LOCKED));

        world.set_can_rotate(id, true).unwrap();
        let (body, _) = world.parts(id).unwrap();
        assert!(!body.locked_axes().contains(rapier::LockedAxes::ROTATION_LOCKED));
    }

    #[test]
    fn test_apply_force_lasts_one_step() {
        let config = PhysicsConfig::default().with_gravity(0.0, 0.0);
        let mut world = PhysicsWorld::new(config).unwrap();
        let id = ball(&mut world, [0.0, 0.0]);
        world.step(1.0 / 60.0).unwrap();

        world.apply_force(id, [600.0, 0.0]).unwrap();
        world.step(1.0 / 60.0).unwrap();
        let after_push = world.velocity(id).unwrap()[0];
        assert!(after_push > 0.0);

        world.step(1.0 / 60.0).unwrap();
        assert_relative_eq!(world.velocity(id).unwrap()[0], after_push, epsilon = 1e-3);
    }

    #[test]
    fn test_vanish_and_clear() {
        let mut world = PhysicsWorld::default();
        let a = ball(&mut world, [0.0, 0.0]);
        let b = ball(&mut world, [50.0, 0.0]);
        world.step(1.0 / 60.0).unwrap();

        assert!(world.vanish(a).is_some());
        assert!(world.vanish(a).is_none());
        assert!(!world.contains(a));
        // Body leaves at the end of the next step
        assert_eq!(world.body_count(), 2);
        world.step(1.0 / 60.0).unwrap();
        assert_eq!(world.body_count(), 1);

        world.clear();
        assert!(!world.contains(b));
        assert_eq!(world.object_count(), 0);
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.collider_count(), 0);
    }

    #[test]
    fn test_clear_drops_queued_bodies() {
        let mut world = PhysicsWorld::default();
        let live = ball(&mut world, [0.0, 0.0]);
        world.step(1.0 / 60.0).unwrap();
        let queued = ball(&mut world, [50.0, 0.0]);
        world.attach_soft(live, queued, 20.0, 10.0, 1.0, None, None).unwrap();
        assert_eq!(world.pending().pending_adds(), 2);

        world.clear();
        assert!(world.pending().is_empty());
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.joint_count(), 0);

        world.step(1.0 / 60.0).unwrap();
        assert_eq!(world.body_count(), 0);
        assert!(world.position(queued).is_err());
    }

    #[test]
    fn test_set_filter() {
        let mut world = PhysicsWorld::default();
        let id = ball(&mut world, [0.0, 0.0]);
        let filter = CollisionFilter::new(4, 1).with_group(2);

        world.set_filter(id, filter).unwrap();
        assert_eq!(world.object(id).unwrap().filter, filter);

        let (_, collider) = world.parts(id).unwrap();
        assert_eq!(crate::collider::collider_filter(collider), filter);
        assert_eq!(object_id(collider.user_data), Some(id));
    }
}
