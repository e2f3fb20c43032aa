//! Deferred add/remove queues
//!
//! Nothing enters or leaves the simulation in the middle of a step. Additions
//! and removals are queued and drained once per step, additions first.

use awg_core::{JointId, ObjectId};
use rapier2d::prelude as rapier;
use std::collections::VecDeque;

/// Something waiting to enter the simulation
#[derive(Debug)]
pub enum Primitive {
    /// A body with its shape
    Body {
        id: ObjectId,
        body: rapier::RigidBody,
        collider: rapier::Collider,
    },
    /// A joint between two objects
    Joint {
        id: JointId,
        a: ObjectId,
        b: ObjectId,
        joint: rapier::GenericJoint,
    },
}

/// Something waiting to leave the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveRef {
    Body(ObjectId),
    Joint(JointId),
}

/// FIFO add and delete queues
#[derive(Debug, Default)]
pub struct PendingQueues {
    pub(crate) add: VecDeque<Primitive>,
    pub(crate) delete: VecDeque<PrimitiveRef>,
}

impl PendingQueues {
    pub fn push_add(&mut self, primitive: Primitive) {
        self.add.push_back(primitive);
    }

    pub fn push_delete(&mut self, primitive: PrimitiveRef) {
        self.delete.push_back(primitive);
    }

    /// Queued body of `id`, if it has not been flushed yet
    pub fn body(&self, id: ObjectId) -> Option<(&rapier::RigidBody, &rapier::Collider)> {
        self.add.iter().find_map(|p| match p {
            Primitive::Body {
                id: pid,
                body,
                collider,
            } if *pid == id => Some((body, collider)),
            _ => None,
        })
    }

    pub fn body_mut(
        &mut self,
        id: ObjectId,
    ) -> Option<(&mut rapier::RigidBody, &mut rapier::Collider)> {
        self.add.iter_mut().find_map(|p| match p {
            Primitive::Body {
                id: pid,
                body,
                collider,
            } if *pid == id => Some((body, collider)),
            _ => None,
        })
    }

    pub fn has_joint(&self, id: JointId) -> bool {
        self.add
            .iter()
            .any(|p| matches!(p, Primitive::Joint { id: jid, .. } if *jid == id))
    }

    /// Number of queued additions
    pub fn pending_adds(&self) -> usize {
        self.add.len()
    }

    /// Number of queued removals
    pub fn pending_deletes(&self) -> usize {
        self.delete.len()
    }

    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.delete.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.add.clear();
        self.delete.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(raw: u64) -> Primitive {
        Primitive::Body {
            id: ObjectId::from_raw(raw),
            body: rapier::RigidBodyBuilder::dynamic().build(),
            collider: rapier::ColliderBuilder::ball(1.0).build(),
        }
    }

    #[test]
    fn test_lookup_pending_body() {
        let mut queues = PendingQueues::default();
        queues.push_add(body(1));
        queues.push_add(body(2));

        assert!(queues.body(ObjectId::from_raw(2)).is_some());
        assert!(queues.body(ObjectId::from_raw(3)).is_none());

        let (b, _) = queues.body_mut(ObjectId::from_raw(1)).unwrap();
        b.set_linvel(rapier::Vector::new(3.0, 0.0), false);
        let (b, _) = queues.body(ObjectId::from_raw(1)).unwrap();
        assert_eq!(b.linvel().x, 3.0);
    }

    #[test]
    fn test_fifo_order() {
        let mut queues = PendingQueues::default();
        queues.push_add(body(1));
        queues.push_add(body(2));
        queues.push_delete(PrimitiveRef::Body(ObjectId::from_raw(1)));

        let first = queues.add.pop_front().unwrap();
        assert!(matches!(first, Primitive::Body { id, .. } if id.raw() == 1));
        assert_eq!(queues.pending_adds(), 1);
        assert_eq!(queues.pending_deletes(), 1);
        queues.clear();
        assert!(queues.is_empty());
    }
}
