//! Deferred world changes requested from callbacks
//!
//! Hooks and trigger callbacks run while the world is in the middle of a
//! step, so they can't touch it directly. They record what they want here and
//! the world applies it after dispatch, before the queue flush of the same step.

use crate::collider::ObjectDesc;
use crate::error::Result;
use crate::registry::{CollisionHooks, NullObject};
use awg_core::{IdGenerator, ObjectId};
use std::sync::Arc;

/// One recorded change
pub enum Command {
    /// Remove an object
    Vanish(ObjectId),
    /// Teleport a body
    SetPosition(ObjectId, [f32; 2]),
    /// Set a body's velocity
    SetVelocity(ObjectId, [f32; 2]),
    /// Apply an impulse at the centre of mass
    ApplyImpulse(ObjectId, [f32; 2]),
    /// Create an object under an already reserved id
    Spawn {
        id: ObjectId,
        desc: ObjectDesc,
        hooks: Box<dyn CollisionHooks>,
    },
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vanish(id) => f.debug_tuple("Vanish").field(id).finish(),
            Self::SetPosition(id, p) => f.debug_tuple("SetPosition").field(id).field(p).finish(),
            Self::SetVelocity(id, v) => f.debug_tuple("SetVelocity").field(id).field(v).finish(),
            Self::ApplyImpulse(id, i) => f.debug_tuple("ApplyImpulse").field(id).field(i).finish(),
            Self::Spawn { id, desc, .. } => f
                .debug_struct("Spawn")
                .field("id", id)
                .field("desc", desc)
                .finish_non_exhaustive(),
        }
    }
}

/// Command buffer handed to hooks and trigger callbacks
pub struct Commands {
    ids: Arc<IdGenerator>,
    queue: Vec<Command>,
}

impl Commands {
    /// Buffer drawing spawn ids from `ids`
    pub fn new(ids: Arc<IdGenerator>) -> Self {
        Self {
            ids,
            queue: Vec::new(),
        }
    }

    /// Buffer with its own id source, for driving hooks outside a world
    pub fn detached() -> Self {
        Self::new(Arc::new(IdGenerator::new()))
    }

    /// Remove an object (and the triggers anchored to it)
    pub fn vanish(&mut self, id: ObjectId) {
        self.queue.push(Command::Vanish(id));
    }

    pub fn set_position(&mut self, id: ObjectId, position: [f32; 2]) {
        self.queue.push(Command::SetPosition(id, position));
    }

    pub fn set_velocity(&mut self, id: ObjectId, velocity: [f32; 2]) {
        self.queue.push(Command::SetVelocity(id, velocity));
    }

    pub fn apply_impulse(&mut self, id: ObjectId, impulse: [f32; 2]) {
        self.queue.push(Command::ApplyImpulse(id, impulse));
    }

    /// Create an object. The id is reserved now, the object is registered
    /// when the buffer is applied.
    pub fn spawn(&mut self, desc: ObjectDesc) -> Result<ObjectId> {
        self.spawn_with_hooks(desc, Box::new(NullObject))
    }

    /// Create an object with custom hooks
    pub fn spawn_with_hooks(
        &mut self,
        desc: ObjectDesc,
        hooks: Box<dyn CollisionHooks>,
    ) -> Result<ObjectId> {
        desc.validate()?;
        let id = self.ids.next_object();
        self.queue.push(Command::Spawn { id, desc, hooks });
        Ok(id)
    }

    /// Recorded commands, oldest first
    pub fn pending(&self) -> &[Command] {
        &self.queue
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub(crate) fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.queue)
    }

    pub(crate) fn clear(&mut self) {
        self.queue.clear();
    }
}

impl std::fmt::Debug for Commands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Commands")
            .field("queue", &self.queue)
            .finish()
    }
}
