//! Trigger areas
//!
//! A trigger is a kinematic sensor rectangle with a [`Trigger`] state machine
//! in its registry record. It sits at a fixed position or follows an anchor
//! object; anchored triggers are moved after every step, so they trail their
//! anchor by one step.

use crate::body::PhysicProps;
use crate::collider::{ObjectDesc, ShapeDesc};
use crate::commands::Commands;
use crate::error::{PhysicsError, Result};
use crate::layers::{CollisionFilter, TRIGGER_BITS};
use crate::queue::Primitive;
use crate::registry::PhysicObject;
use crate::world::PhysicsWorld;
use awg_core::{Contact, EntityKind, ObjectId};
use awg_triggers::{Trigger, TriggerEvent, TriggerFilter, TriggerHandler, TriggerPlacement};
use rapier2d::prelude as rapier;

/// Categories a trigger reacts to unless told otherwise: everything but other triggers
pub const DEFAULT_TRIGGERED_BY: u32 = u32::MAX & !TRIGGER_BITS;

/// Description of a trigger to create
pub struct TriggerDesc {
    /// Fixed position
    pub position: Option<[f32; 2]>,
    /// Object to follow
    pub anchor: Option<ObjectId>,
    /// Offset from the anchor
    pub offset: [f32; 2],
    /// Full width and height
    pub size: [f32; 2],
    /// Who may activate it
    pub filter: TriggerFilter,
    handler: TriggerHandler<Commands>,
}

impl TriggerDesc {
    /// A trigger of the given size, not placed yet
    pub fn new(size: [f32; 2]) -> Self {
        Self {
            position: None,
            anchor: None,
            offset: [0.0, 0.0],
            size,
            filter: TriggerFilter::new().with_categories(DEFAULT_TRIGGERED_BY),
            handler: TriggerHandler::new(),
        }
    }

    /// Place at a fixed position
    pub fn at(mut self, position: [f32; 2]) -> Self {
        self.position = Some(position);
        self
    }

    /// Follow `anchor` at `offset`
    pub fn anchored_to(mut self, anchor: ObjectId, offset: [f32; 2]) -> Self {
        self.anchor = Some(anchor);
        self.offset = offset;
        self
    }

    /// Set enter callback
    pub fn on_enter<F>(mut self, f: F) -> Self
    where
        F: FnMut(&TriggerEvent, &mut Commands) + Send + 'static,
    {
        self.handler = self.handler.on_enter(f);
        self
    }

    /// Set leave callback
    pub fn on_leave<F>(mut self, f: F) -> Self
    where
        F: FnMut(&TriggerEvent, &mut Commands) + Send + 'static,
    {
        self.handler = self.handler.on_leave(f);
        self
    }

    /// Restrict activation to the given categories
    pub fn triggered_by(mut self, categories: u32) -> Self {
        self.filter.categories = categories;
        self
    }

    /// Allow an entity kind
    pub fn allow_kind(mut self, kind: EntityKind) -> Self {
        self.filter = self.filter.allow_kind(kind);
        self
    }

    /// Never react to these objects
    pub fn ignore<I: IntoIterator<Item = ObjectId>>(mut self, ids: I) -> Self {
        self.filter = self.filter.ignore(ids);
        self
    }
}

impl std::fmt::Debug for TriggerDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerDesc")
            .field("position", &self.position)
            .field("anchor", &self.anchor)
            .field("offset", &self.offset)
            .field("size", &self.size)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

impl PhysicsWorld {
    /// Create a trigger area.
    ///
    /// Like any object it is registered now and simulated from the end of the
    /// next step.
    pub fn spawn_trigger(&mut self, desc: TriggerDesc) -> Result<ObjectId> {
        let placement = TriggerPlacement::from_parts(desc.position, desc.anchor, desc.offset)?;

        let [width, height] = desc.size;
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            return Err(PhysicsError::ShapeCreationFailed(format!(
                "trigger size must be positive, got {width}x{height}"
            )));
        }

        let position = match placement {
            TriggerPlacement::Fixed(position) => position,
            TriggerPlacement::Anchored { anchor, offset } => {
                let p = self.position(anchor)?;
                [p[0] + offset[0], p[1] + offset[1]]
            }
        };

        let filter = CollisionFilter::new(TRIGGER_BITS, desc.filter.categories);
        let object = ObjectDesc::new(
            position,
            ShapeDesc::rect(width, height, [0.0, 0.0]),
            PhysicProps::kinematic().with_filter(filter),
        )
        .with_kind(EntityKind::Trigger)
        .sensor();

        let id = self.ids.next_object();
        let (body, mut collider) = object.build(id, &self.config)?;
        collider.set_active_events(rapier::ActiveEvents::COLLISION_EVENTS);
        collider.set_active_collision_types(rapier::ActiveCollisionTypes::all());

        let trigger = Trigger::new(id, placement)
            .with_filter(desc.filter)
            .with_handler(desc.handler);

        self.add_object(PhysicObject::new(id, EntityKind::Trigger, filter).with_trigger(trigger));
        self.add([Primitive::Body { id, body, collider }]);

        log::debug!("spawned trigger {id} at {position:?} ({width}x{height})");
        Ok(id)
    }

    /// Trigger state of a trigger object
    pub fn trigger(&self, id: ObjectId) -> Option<&Trigger<Commands>> {
        self.registry.get(id)?.trigger.as_ref()
    }

    /// Mutable trigger state, e.g. to disable it
    pub fn trigger_mut(&mut self, id: ObjectId) -> Option<&mut Trigger<Commands>> {
        self.registry.get_mut(id)?.trigger.as_mut()
    }

    /// Fire leave for every trigger `id` is inside; its body is leaving the simulation
    pub(crate) fn release_from_triggers(&mut self, id: ObjectId) {
        let holding: Vec<ObjectId> = self
            .registry
            .iter()
            .filter(|obj| obj.trigger.as_ref().is_some_and(|t| t.is_inside(id)))
            .map(|obj| obj.id)
            .collect();
        if holding.is_empty() {
            return;
        }

        let actor = self.registry.actor(id);
        for trigger_id in holding {
            if let Some(trigger) = self
                .registry
                .get_mut(trigger_id)
                .and_then(|obj| obj.trigger.as_mut())
            {
                let contact = Contact::new(trigger_id, Some(id)).with_first_contact(false);
                trigger.leave(actor, contact, &mut self.commands);
            }
        }
    }

    /// Move anchored triggers to their anchor's current position
    pub(crate) fn update_triggers(&mut self) {
        let anchored: Vec<(ObjectId, ObjectId)> = self
            .registry
            .iter()
            .filter_map(|obj| Some((obj.id, obj.trigger.as_ref()?.anchor()?)))
            .collect();

        for (id, anchor) in anchored {
            let Ok(anchor_position) = self.position(anchor) else {
                log::warn!("trigger {id}: anchor {anchor} no longer exists");
                continue;
            };

            let target = self
                .trigger(id)
                .and_then(|trigger| trigger.update(Some(anchor_position)));
            if let Some(target) = target {
                // Both ids come from the registry, so this only fails for a
                // trigger whose body was removed behind the registry's back
                if let Err(err) = self.set_position(id, target) {
                    log::warn!("trigger {id}: {err}");
                }
            }
        }
    }
}
