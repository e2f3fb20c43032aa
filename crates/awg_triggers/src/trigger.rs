//! Trigger state machine

use crate::events::{Actor, TriggerEvent, TriggerHandler};
use crate::filter::TriggerFilter;
use awg_core::{Contact, ObjectId};
use std::collections::HashSet;
use thiserror::Error;

/// Where a trigger sits
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerPlacement {
    /// Fixed world position
    Fixed([f32; 2]),
    /// Follows another object at an offset
    Anchored {
        /// Object followed
        anchor: ObjectId,
        /// Offset from the anchor's position
        offset: [f32; 2],
    },
}

/// Invalid placement arguments
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("trigger needs either a position or an anchor")]
    Missing,

    #[error("trigger cannot have both a position and an anchor")]
    Conflicting,
}

impl TriggerPlacement {
    /// Build a placement from the optional position / anchor pair.
    ///
    /// Exactly one of the two must be given.
    pub fn from_parts(
        position: Option<[f32; 2]>,
        anchor: Option<ObjectId>,
        offset: [f32; 2],
    ) -> Result<Self, PlacementError> {
        match (position, anchor) {
            (Some(pos), None) => Ok(Self::Fixed(pos)),
            (None, Some(anchor)) => Ok(Self::Anchored { anchor, offset }),
            (Some(_), Some(_)) => Err(PlacementError::Conflicting),
            (None, None) => Err(PlacementError::Missing),
        }
    }

    /// Anchor, if any
    pub fn anchor(&self) -> Option<ObjectId> {
        match self {
            Self::Fixed(_) => None,
            Self::Anchored { anchor, .. } => Some(*anchor),
        }
    }
}

/// A trigger area.
///
/// Keeps the set of actors currently inside. An id is in the set exactly when
/// its last delivered event was an enter.
pub struct Trigger<C> {
    id: ObjectId,
    placement: TriggerPlacement,
    /// Trigger filter
    pub filter: TriggerFilter,
    /// Whether the trigger reacts to enters
    pub enabled: bool,
    inside: HashSet<ObjectId>,
    handler: TriggerHandler<C>,
    /// Total enter transitions
    pub activation_count: u32,
}

impl<C> Trigger<C> {
    /// Create a new trigger
    pub fn new(id: ObjectId, placement: TriggerPlacement) -> Self {
        Self {
            id,
            placement,
            filter: TriggerFilter::new(),
            enabled: true,
            inside: HashSet::new(),
            handler: TriggerHandler::new(),
            activation_count: 0,
        }
    }

    /// Set filter
    pub fn with_filter(mut self, filter: TriggerFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set event handler
    pub fn with_handler(mut self, handler: TriggerHandler<C>) -> Self {
        self.handler = handler;
        self
    }

    /// Set enter callback
    pub fn on_enter<F>(mut self, f: F) -> Self
    where
        F: FnMut(&TriggerEvent, &mut C) + Send + 'static,
    {
        self.handler = self.handler.on_enter(f);
        self
    }

    /// Set leave callback
    pub fn on_leave<F>(mut self, f: F) -> Self
    where
        F: FnMut(&TriggerEvent, &mut C) + Send + 'static,
    {
        self.handler = self.handler.on_leave(f);
        self
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn placement(&self) -> TriggerPlacement {
        self.placement
    }

    pub fn anchor(&self) -> Option<ObjectId> {
        self.placement.anchor()
    }

    /// Check if an entity is currently inside
    pub fn is_inside(&self, entity: ObjectId) -> bool {
        self.inside.contains(&entity)
    }

    /// Entities currently inside
    pub fn entities(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.inside.iter().copied()
    }

    /// Number of entities inside
    pub fn len(&self) -> usize {
        self.inside.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inside.is_empty()
    }

    /// An actor started touching the trigger.
    ///
    /// Returns `true` if this was an `outside -> inside` transition (and the
    /// enter callback ran). Guard failures and repeated enters return `false`.
    pub fn enter(&mut self, actor: Actor, contact: Contact, ctx: &mut C) -> bool {
        if !self.enabled || !self.filter.passes(&actor, self.anchor()) {
            log::trace!("trigger {}: {} filtered out", self.id, actor.id);
            return false;
        }

        if !self.inside.insert(actor.id) {
            return false;
        }

        self.activation_count += 1;
        log::trace!("trigger {}: {} entered", self.id, actor.id);

        let event = TriggerEvent::enter(self.id, actor, contact).with_anchor(self.anchor());
        self.handler.handle(&event, ctx);
        true
    }

    /// An actor stopped touching the trigger.
    ///
    /// Returns `true` if the actor was inside. No guards apply: an actor that
    /// got in always gets out.
    pub fn leave(&mut self, actor: Actor, contact: Contact, ctx: &mut C) -> bool {
        if !self.inside.remove(&actor.id) {
            return false;
        }

        log::trace!("trigger {}: {} left", self.id, actor.id);

        let event = TriggerEvent::leave(self.id, actor, contact).with_anchor(self.anchor());
        self.handler.handle(&event, ctx);
        true
    }

    /// Position the trigger should move to, given its anchor's position.
    ///
    /// `None` for fixed triggers or when the anchor's position is unknown.
    pub fn update(&self, anchor_position: Option<[f32; 2]>) -> Option<[f32; 2]> {
        match self.placement {
            TriggerPlacement::Fixed(_) => None,
            TriggerPlacement::Anchored { offset, .. } => {
                anchor_position.map(|p| [p[0] + offset[0], p[1] + offset[1]])
            }
        }
    }

    /// Forget every actor inside without firing callbacks
    pub fn reset(&mut self) {
        self.inside.clear();
    }
}

impl<C> std::fmt::Debug for Trigger<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trigger")
            .field("id", &self.id)
            .field("placement", &self.placement)
            .field("filter", &self.filter)
            .field("enabled", &self.enabled)
            .field("inside_count", &self.inside.len())
            .field("handler", &self.handler)
            .finish()
    }
}
