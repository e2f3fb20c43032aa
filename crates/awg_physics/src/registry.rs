//! Object registry and collision hooks

use crate::commands::Commands;
use crate::layers::CollisionFilter;
use awg_core::{Contact, EntityKind, ObjectId};
use awg_triggers::{Actor, Trigger};
use std::collections::HashMap;

/// Per-object collision callbacks.
///
/// Both hooks run once per touching pair, on the step the pair starts
/// touching. `pre_collision_handle` runs inside the solver before impulses are
/// computed, `post_collision_handle` after the step with the total impulse
/// filled in. The returned flag is advisory: it is logged, nothing else.
pub trait CollisionHooks: Send {
    fn pre_collision_handle(&mut self, _contact: &Contact, _commands: &mut Commands) -> bool {
        true
    }

    fn post_collision_handle(&mut self, _contact: &Contact, _commands: &mut Commands) -> bool {
        true
    }
}

/// Stand-in for shapes with no registered owner
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObject;

impl CollisionHooks for NullObject {}

/// Registry record of a physics object
pub struct PhysicObject {
    /// Object identity
    pub id: ObjectId,
    /// Entity kind
    pub kind: EntityKind,
    /// Current collision filter
    pub filter: CollisionFilter,
    /// Collision callbacks
    pub hooks: Box<dyn CollisionHooks>,
    /// Trigger state, for trigger objects
    pub trigger: Option<Trigger<Commands>>,
}

impl PhysicObject {
    /// Record with no-op hooks
    pub fn new(id: ObjectId, kind: EntityKind, filter: CollisionFilter) -> Self {
        Self {
            id,
            kind,
            filter,
            hooks: Box::new(NullObject),
            trigger: None,
        }
    }

    /// Set the hooks
    pub fn with_hooks(mut self, hooks: Box<dyn CollisionHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Attach trigger state
    pub fn with_trigger(mut self, trigger: Trigger<Commands>) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub fn is_trigger(&self) -> bool {
        self.trigger.is_some()
    }

    /// This object as a trigger actor
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.kind, self.filter.categories)
    }
}

impl std::fmt::Debug for PhysicObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicObject")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("filter", &self.filter)
            .field("trigger", &self.trigger)
            .finish()
    }
}

/// `ObjectId -> PhysicObject` map of one world
#[derive(Debug, Default)]
pub struct Registry {
    objects: HashMap<ObjectId, PhysicObject>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. Ids are unique; inserting one twice is a bug.
    pub fn insert(&mut self, object: PhysicObject) {
        debug_assert!(
            !self.objects.contains_key(&object.id),
            "object {} registered twice",
            object.id
        );
        self.objects.insert(object.id, object);
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<PhysicObject> {
        self.objects.remove(&id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&PhysicObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut PhysicObject> {
        self.objects.get_mut(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Registered ids, in no particular order
    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhysicObject> {
        self.objects.values()
    }

    /// Some registered id, no particular one
    pub fn any_id(&self) -> Option<ObjectId> {
        self.objects.keys().next().copied()
    }

    /// Triggers anchored to `anchor`
    pub fn anchored_to(&self, anchor: ObjectId) -> Vec<ObjectId> {
        self.objects
            .values()
            .filter(|obj| {
                obj.trigger
                    .as_ref()
                    .is_some_and(|t| t.anchor() == Some(anchor))
            })
            .map(|obj| obj.id)
            .collect()
    }

    /// Actor description for `id`; a detached actor when unregistered
    pub fn actor(&self, id: ObjectId) -> Actor {
        self.get(id).map_or(Actor::detached(id), PhysicObject::actor)
    }

    /// Run `f` with the hooks of `id`, or with [`NullObject`] on a miss
    pub fn with_hooks<R>(
        &mut self,
        id: Option<ObjectId>,
        f: impl FnOnce(&mut dyn CollisionHooks) -> R,
    ) -> R {
        match id.and_then(|id| self.objects.get_mut(&id)) {
            Some(obj) => f(obj.hooks.as_mut()),
            None => f(&mut NullObject),
        }
    }
}
