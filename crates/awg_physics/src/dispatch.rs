//! Collision dispatch
//!
//! Routes simulator contacts to the objects that own the shapes:
//!
//! - pre-solve hooks, from inside the solver ([`StepHooks`])
//! - post-solve hooks, after the pipeline step ([`post_solve`])
//! - trigger enter/leave, from sensor events ([`dispatch_trigger_events`])
//!
//! Owners are looked up by the [`ObjectId`] stored in collider user data. A
//! lookup miss runs the [`NullObject`](crate::registry::NullObject) hooks.

use crate::collider::{filter_group, object_id};
use crate::commands::Commands;
use crate::layers::groups_exclude;
use crate::registry::Registry;
use awg_core::{Contact, ObjectId};
use parking_lot::Mutex;
use rapier2d::parry;
use rapier2d::prelude as rapier;
use std::collections::{HashMap, HashSet};

/// Ordered collider pair, as the narrow phase reports it
pub(crate) type PairKey = (rapier::ColliderHandle, rapier::ColliderHandle);

/// Channel-based event collector for Rapier
pub(crate) struct ChannelEventCollector {
    collision_events: crossbeam_channel::Sender<rapier::CollisionEvent>,
}

impl ChannelEventCollector {
    pub(crate) fn new() -> (Self, crossbeam_channel::Receiver<rapier::CollisionEvent>) {
        let (collision_events, receiver) = crossbeam_channel::unbounded();
        (Self { collision_events }, receiver)
    }
}

impl rapier::EventHandler for ChannelEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &rapier::RigidBodySet,
        _colliders: &rapier::ColliderSet,
        event: rapier::CollisionEvent,
        _contact_pair: Option<&rapier::ContactPair>,
    ) {
        let _ = self.collision_events.send(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &rapier::RigidBodySet,
        _colliders: &rapier::ColliderSet,
        _contact_pair: &rapier::ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

/// Hooks installed for one pipeline step.
///
/// Rapier calls them through `&self`, so the registry and command buffer are
/// borrowed behind mutexes for the duration of the step.
pub(crate) struct StepHooks<'a> {
    registry: Mutex<&'a mut Registry>,
    commands: Mutex<&'a mut Commands>,
    previous: &'a HashSet<PairKey>,
    presolved: Mutex<&'a mut HashSet<PairKey>>,
    gravity: rapier::Vector<f32>,
    dt: f32,
}

impl<'a> StepHooks<'a> {
    pub(crate) fn new(
        registry: &'a mut Registry,
        commands: &'a mut Commands,
        previous: &'a HashSet<PairKey>,
        presolved: &'a mut HashSet<PairKey>,
        gravity: rapier::Vector<f32>,
        dt: f32,
    ) -> Self {
        Self {
            registry: Mutex::new(registry),
            commands: Mutex::new(commands),
            previous,
            presolved: Mutex::new(presolved),
            gravity,
            dt,
        }
    }

    fn same_group(
        colliders: &rapier::ColliderSet,
        a: rapier::ColliderHandle,
        b: rapier::ColliderHandle,
    ) -> bool {
        match (colliders.get(a), colliders.get(b)) {
            (Some(a), Some(b)) => {
                groups_exclude(filter_group(a.user_data), filter_group(b.user_data))
            }
            _ => false,
        }
    }

    /// Velocity of a body at `point` once this step's gravity is applied
    fn velocity_at(
        &self,
        bodies: &rapier::RigidBodySet,
        body: Option<rapier::RigidBodyHandle>,
        point: &rapier::Point<f32>,
    ) -> rapier::Vector<f32> {
        match body.and_then(|h| bodies.get(h)) {
            Some(body) if body.is_dynamic() => {
                body.velocity_at_point(point) + self.gravity * (body.gravity_scale() * self.dt)
            }
            Some(body) => body.velocity_at_point(point),
            None => rapier::Vector::zeros(),
        }
    }

    /// Whether any solver contact is penetrating or closes within this step.
    ///
    /// Speculative contacts further apart than that get no impulse, so they
    /// are not a touch yet.
    fn closes_this_step(&self, context: &rapier::ContactModificationContext) -> bool {
        let normal = *context.normal;
        context.solver_contacts.iter().any(|c| {
            let v1 = self.velocity_at(context.bodies, context.rigid_body1, &c.point);
            let v2 = self.velocity_at(context.bodies, context.rigid_body2, &c.point);
            c.dist <= 0.0 || c.dist + (v2 - v1).dot(&normal) * self.dt <= 0.0
        })
    }
}

impl rapier::PhysicsHooks for StepHooks<'_> {
    fn filter_contact_pair(
        &self,
        context: &rapier::PairFilterContext,
    ) -> Option<rapier::SolverFlags> {
        if Self::same_group(context.colliders, context.collider1, context.collider2) {
            None
        } else {
            Some(rapier::SolverFlags::COMPUTE_IMPULSES)
        }
    }

    fn filter_intersection_pair(&self, context: &rapier::PairFilterContext) -> bool {
        !Self::same_group(context.colliders, context.collider1, context.collider2)
    }

    fn modify_solver_contacts(&self, context: &mut rapier::ContactModificationContext) {
        if context.solver_contacts.is_empty() {
            return;
        }

        let key = (context.collider1, context.collider2);
        if self.previous.contains(&key) || !self.closes_this_step(context) {
            return;
        }
        if !self.presolved.lock().insert(key) {
            return;
        }

        let id1 = context
            .colliders
            .get(context.collider1)
            .and_then(|c| object_id(c.user_data));
        let id2 = context
            .colliders
            .get(context.collider2)
            .and_then(|c| object_id(c.user_data));
        let normal = [context.normal.x, context.normal.y];
        let points = context
            .solver_contacts
            .iter()
            .map(|c| [c.point.x, c.point.y])
            .collect();

        let mut registry = self.registry.lock();
        let mut commands = self.commands.lock();
        let commands: &mut Commands = &mut **commands;
        for contact in contact_sides(id1, id2, normal, points, [0.0, 0.0]) {
            let handled = registry.with_hooks(Some(contact.this), |hooks| {
                hooks.pre_collision_handle(&contact, commands)
            });
            log::trace!("pre-solve {} vs {:?}: {}", contact.this, contact.other, handled);
        }
    }
}

/// Run post-solve hooks for pairs that started touching this step and
/// remember which pairs touch now.
///
/// A pair starts touching on the step it gets an impulse or penetrates.
/// Until then its contacts are only speculative. `presolved` is pruned to the
/// pairs the narrow phase still reports.
pub(crate) fn post_solve(
    narrow_phase: &rapier::NarrowPhase,
    colliders: &rapier::ColliderSet,
    registry: &mut Registry,
    commands: &mut Commands,
    touching: &mut HashSet<PairKey>,
    presolved: &mut HashSet<PairKey>,
) {
    let mut current = HashSet::with_capacity(touching.len());
    let mut active = HashSet::with_capacity(touching.len());

    for pair in narrow_phase.contact_pairs() {
        if !pair.has_any_active_contact {
            continue;
        }

        let key = (pair.collider1, pair.collider2);
        active.insert(key);
        if touching.contains(&key) {
            current.insert(key);
            continue;
        }

        let impulse = pair.total_impulse();
        let penetrating = pair
            .manifolds
            .iter()
            .flat_map(|m| m.data.solver_contacts.iter())
            .any(|c| c.dist <= 0.0);
        if impulse.norm_squared() == 0.0 && !penetrating {
            continue;
        }
        current.insert(key);

        let id1 = colliders.get(pair.collider1).and_then(|c| object_id(c.user_data));
        let id2 = colliders.get(pair.collider2).and_then(|c| object_id(c.user_data));

        let mut normal = [0.0, 0.0];
        let mut points = Vec::new();
        for manifold in &pair.manifolds {
            if manifold.data.solver_contacts.is_empty() {
                continue;
            }
            if points.is_empty() {
                normal = [manifold.data.normal.x, manifold.data.normal.y];
            }
            points.extend(
                manifold
                    .data
                    .solver_contacts
                    .iter()
                    .map(|c| [c.point.x, c.point.y]),
            );
        }
        for contact in contact_sides(id1, id2, normal, points, [impulse.x, impulse.y]) {
            let handled = registry.with_hooks(Some(contact.this), |hooks| {
                hooks.post_collision_handle(&contact, commands)
            });
            log::trace!(
                "post-solve {} vs {:?}, impulse {:.1}: {}",
                contact.this,
                contact.other,
                contact.impulse_magnitude(),
                handled
            );
        }
    }

    *touching = current;
    presolved.retain(|key| active.contains(key));
}

/// The contact as seen from each registered side.
///
/// `normal` points from the first object to the second and `impulse` is what
/// the second one received; each side gets the impulse applied to itself.
fn contact_sides(
    id1: Option<ObjectId>,
    id2: Option<ObjectId>,
    normal: [f32; 2],
    points: Vec<[f32; 2]>,
    impulse: [f32; 2],
) -> Vec<Contact> {
    let mut sides = Vec::with_capacity(2);
    if let Some(a) = id1 {
        sides.push(
            Contact::new(a, id2)
                .with_normal(normal)
                .with_points(points.clone())
                .with_impulse([-impulse[0], -impulse[1]]),
        );
    }
    if let Some(b) = id2 {
        sides.push(
            Contact::new(b, id1)
                .with_normal([-normal[0], -normal[1]])
                .with_points(points)
                .with_impulse(impulse),
        );
    }
    sides
}

/// Which of two objects is the trigger and which the actor.
///
/// When both are triggers the later-created one (larger id) is the trigger.
pub(crate) fn trigger_roles(
    registry: &Registry,
    a: ObjectId,
    b: ObjectId,
) -> Option<(ObjectId, ObjectId)> {
    let is_trigger = |id: ObjectId| registry.get(id).is_some_and(|obj| obj.is_trigger());
    match (is_trigger(a), is_trigger(b)) {
        (true, true) => Some((a.max(b), a.min(b))),
        (true, false) => Some((a, b)),
        (false, true) => Some((b, a)),
        (false, false) => None,
    }
}

/// Feed sensor start/stop events to the triggers involved.
///
/// `retired` resolves colliders removed since the previous step; their stop
/// events arrive after they are gone from the collider set.
pub(crate) fn dispatch_trigger_events(
    events: &crossbeam_channel::Receiver<rapier::CollisionEvent>,
    colliders: &rapier::ColliderSet,
    retired: &HashMap<rapier::ColliderHandle, ObjectId>,
    registry: &mut Registry,
    commands: &mut Commands,
) {
    let resolve = |handle: rapier::ColliderHandle| {
        colliders
            .get(handle)
            .and_then(|c| object_id(c.user_data))
            .or_else(|| retired.get(&handle).copied())
    };

    while let Ok(event) = events.try_recv() {
        let (h1, h2) = (event.collider1(), event.collider2());
        let (Some(id1), Some(id2)) = (resolve(h1), resolve(h2)) else {
            continue;
        };
        let Some((trigger_id, actor_id)) = trigger_roles(registry, id1, id2) else {
            continue;
        };
        let (trigger_handle, actor_handle) = if trigger_id == id1 { (h1, h2) } else { (h2, h1) };
        let actor = registry.actor(actor_id);

        let Some(trigger) = registry
            .get_mut(trigger_id)
            .and_then(|obj| obj.trigger.as_mut())
        else {
            continue;
        };

        if event.started() {
            // A repeated start for an actor already inside is not a first contact
            let contact =
                sensor_contact(colliders, trigger_handle, actor_handle, trigger_id, actor_id)
                    .with_first_contact(!trigger.is_inside(actor_id));
            if contact.is_first_contact {
                trigger.enter(actor, contact, commands);
            } else {
                log::trace!("repeated start for {actor_id} in trigger {trigger_id}");
            }
        } else {
            let contact = Contact::new(trigger_id, Some(actor_id)).with_first_contact(false);
            trigger.leave(actor, contact, commands);
        }
    }
}

/// Contact data for a sensor overlap, seen from the trigger.
///
/// Sensors get no solver contacts, so the normal and point come from a direct
/// shape query.
fn sensor_contact(
    colliders: &rapier::ColliderSet,
    trigger: rapier::ColliderHandle,
    actor: rapier::ColliderHandle,
    trigger_id: ObjectId,
    actor_id: ObjectId,
) -> Contact {
    let contact = Contact::new(trigger_id, Some(actor_id));

    let (Some(t), Some(a)) = (colliders.get(trigger), colliders.get(actor)) else {
        return contact;
    };

    match parry::query::contact(t.position(), t.shape(), a.position(), a.shape(), 0.0) {
        Ok(Some(c)) => contact
            .with_normal([c.normal1.x, c.normal1.y])
            .with_points(vec![[c.point1.x, c.point1.y]]),
        _ => contact,
    }
}
