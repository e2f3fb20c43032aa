//! Trigger events

use awg_core::{Contact, EntityKind, ObjectId};

/// Type of trigger event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerEventType {
    /// Entity entered the trigger area
    Enter,
    /// Entity left the trigger area
    Leave,
}

/// The entity crossing a trigger boundary, as far as the trigger cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// Actor identity
    pub id: ObjectId,
    /// Actor kind, checked against the allow-list
    pub kind: EntityKind,
    /// Collision categories of the actor's shape
    pub categories: u32,
}

impl Actor {
    pub fn new(id: ObjectId, kind: EntityKind, categories: u32) -> Self {
        Self {
            id,
            kind,
            categories,
        }
    }

    /// An actor that is no longer registered.
    ///
    /// Carries no categories, so it never passes an enter guard. Leave still
    /// works because leave only looks at the id.
    pub fn detached(id: ObjectId) -> Self {
        Self {
            id,
            kind: EntityKind::Prop,
            categories: 0,
        }
    }
}

/// A trigger event
#[derive(Debug, Clone)]
pub struct TriggerEvent {
    /// Type of event
    pub event_type: TriggerEventType,
    /// The trigger
    pub trigger: ObjectId,
    /// The entity that caused the event
    pub actor: Actor,
    /// Anchor of the trigger, if it follows one
    pub anchor: Option<ObjectId>,
    /// The sensor contact, seen from the trigger
    pub contact: Contact,
}

impl TriggerEvent {
    /// Create an enter event
    pub fn enter(trigger: ObjectId, actor: Actor, contact: Contact) -> Self {
        Self {
            event_type: TriggerEventType::Enter,
            trigger,
            actor,
            anchor: None,
            contact,
        }
    }

    /// Create a leave event
    pub fn leave(trigger: ObjectId, actor: Actor, contact: Contact) -> Self {
        Self {
            event_type: TriggerEventType::Leave,
            trigger,
            actor,
            anchor: None,
            contact,
        }
    }

    /// Set the anchor
    pub fn with_anchor(mut self, anchor: Option<ObjectId>) -> Self {
        self.anchor = anchor;
        self
    }

    /// Check if this is an enter event
    pub fn is_enter(&self) -> bool {
        self.event_type == TriggerEventType::Enter
    }

    /// Check if this is a leave event
    pub fn is_leave(&self) -> bool {
        self.event_type == TriggerEventType::Leave
    }
}

/// Callback type for trigger events.
///
/// `C` is whatever context the owner passes along, the physics world hands
/// out its command buffer here.
pub type TriggerCallback<C> = Box<dyn FnMut(&TriggerEvent, &mut C) + Send>;

/// Enter/leave callbacks of a trigger
pub struct TriggerHandler<C> {
    /// Callback for enter events
    pub on_enter: Option<TriggerCallback<C>>,
    /// Callback for leave events
    pub on_leave: Option<TriggerCallback<C>>,
}

impl<C> TriggerHandler<C> {
    /// Create a new empty handler
    pub fn new() -> Self {
        Self {
            on_enter: None,
            on_leave: None,
        }
    }

    /// Set enter callback
    pub fn on_enter<F>(mut self, f: F) -> Self
    where
        F: FnMut(&TriggerEvent, &mut C) + Send + 'static,
    {
        self.on_enter = Some(Box::new(f));
        self
    }

    /// Set leave callback
    pub fn on_leave<F>(mut self, f: F) -> Self
    where
        F: FnMut(&TriggerEvent, &mut C) + Send + 'static,
    {
        self.on_leave = Some(Box::new(f));
        self
    }

    /// Handle an event
    pub fn handle(&mut self, event: &TriggerEvent, ctx: &mut C) {
        let callback = match event.event_type {
            TriggerEventType::Enter => self.on_enter.as_mut(),
            TriggerEventType::Leave => self.on_leave.as_mut(),
        };
        if let Some(callback) = callback {
            callback(event, ctx);
        }
    }
}

impl<C> Default for TriggerHandler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for TriggerHandler<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerHandler")
            .field("on_enter", &self.on_enter.is_some())
            .field("on_leave", &self.on_leave.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn ids() -> (ObjectId, Actor) {
        let trigger = ObjectId::from_raw(1);
        let actor = Actor::new(ObjectId::from_raw(2), EntityKind::Hero, 16);
        (trigger, actor)
    }

    #[test]
    fn test_event_creation() {
        let (trigger, actor) = ids();
        let event = TriggerEvent::enter(trigger, actor, Contact::new(trigger, Some(actor.id)))
            .with_anchor(Some(ObjectId::from_raw(9)));

        assert!(event.is_enter());
        assert!(!event.is_leave());
        assert_eq!(event.trigger, trigger);
        assert_eq!(event.actor.id.raw(), 2);
        assert_eq!(event.anchor, Some(ObjectId::from_raw(9)));
    }

    #[test]
    fn test_handler_callbacks() {
        let enter_count = Arc::new(AtomicU32::new(0));
        let leave_count = Arc::new(AtomicU32::new(0));

        let enter_count_clone = enter_count.clone();
        let leave_count_clone = leave_count.clone();

        let mut handler: TriggerHandler<()> = TriggerHandler::new()
            .on_enter(move |_, _| {
                enter_count_clone.fetch_add(1, Ordering::SeqCst);
            })
            .on_leave(move |_, _| {
                leave_count_clone.fetch_add(1, Ordering::SeqCst);
            });

        let (trigger, actor) = ids();
        let contact = Contact::new(trigger, Some(actor.id));
        handler.handle(&TriggerEvent::enter(trigger, actor, contact.clone()), &mut ());
        handler.handle(&TriggerEvent::enter(trigger, actor, contact.clone()), &mut ());
        handler.handle(&TriggerEvent::leave(trigger, actor, contact), &mut ());

        assert_eq!(enter_count.load(Ordering::SeqCst), 2);
        assert_eq!(leave_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_context() {
        let mut handler: TriggerHandler<Vec<ObjectId>> =
            TriggerHandler::new().on_enter(|event, seen: &mut Vec<ObjectId>| seen.push(event.actor.id));

        let (trigger, actor) = ids();
        let mut seen = Vec::new();
        handler.handle(
            &TriggerEvent::enter(trigger, actor, Contact::new(trigger, Some(actor.id))),
            &mut seen,
        );
        // No leave callback installed
        handler.handle(
            &TriggerEvent::leave(trigger, actor, Contact::new(trigger, Some(actor.id))),
            &mut seen,
        );
        assert_eq!(seen, vec![actor.id]);
    }
}
