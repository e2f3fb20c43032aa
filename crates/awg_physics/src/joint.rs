//! Joints between objects
//!
//! Joints are queued like bodies and become live at the end of the next
//! step. A joint whose bodies are gone by then is dropped with a warning.

use crate::error::{PhysicsError, Result};
use crate::queue::{Primitive, PrimitiveRef};
use crate::world::PhysicsWorld;
use awg_core::{JointId, ObjectId};
use rapier2d::prelude as rapier;

impl PhysicsWorld {
    /// Local anchor point on an object: `point` if given, else its centre of mass
    fn local_anchor(&self, id: ObjectId, point: Option<[f32; 2]>) -> Result<rapier::Point<f32>> {
        let (_, collider) = self.parts(id)?;
        Ok(match point {
            Some([x, y]) => rapier::Point::new(x, y),
            None => collider.mass_properties().local_com,
        })
    }

    fn world_point(&self, id: ObjectId, local: rapier::Point<f32>) -> Result<rapier::Point<f32>> {
        let (body, _) = self.parts(id)?;
        Ok(body.position() * local)
    }

    /// Keep two objects at their current distance.
    ///
    /// Anchor points are in each object's local frame and default to the
    /// centre of mass.
    pub fn attach_rigid(
        &mut self,
        a: ObjectId,
        b: ObjectId,
        point_a: Option<[f32; 2]>,
        point_b: Option<[f32; 2]>,
    ) -> Result<JointId> {
        let local_a = self.local_anchor(a, point_a)?;
        let local_b = self.local_anchor(b, point_b)?;
        let distance = (self.world_point(a, local_a)? - self.world_point(b, local_b)?).norm();

        let mut joint: rapier::GenericJoint = rapier::RopeJointBuilder::new(distance)
            .local_anchor1(local_a)
            .local_anchor2(local_b)
            .build()
            .into();
        joint.set_limits(rapier::JointAxis::LinX, [distance, distance]);

        Ok(self.queue_joint(a, b, joint, "rigid"))
    }

    /// Connect two objects with a damped spring
    #[allow(clippy::too_many_arguments)]
    pub fn attach_soft(
        &mut self,
        a: ObjectId,
        b: ObjectId,
        rest_length: f32,
        stiffness: f32,
        damping: f32,
        point_a: Option<[f32; 2]>,
        point_b: Option<[f32; 2]>,
    ) -> Result<JointId> {
        let local_a = self.local_anchor(a, point_a)?;
        let local_b = self.local_anchor(b, point_b)?;

        let joint: rapier::GenericJoint =
            rapier::SpringJointBuilder::new(rest_length, stiffness, damping)
                .local_anchor1(local_a)
                .local_anchor2(local_b)
                .build()
                .into();

        Ok(self.queue_joint(a, b, joint, "soft"))
    }

    fn queue_joint(
        &mut self,
        a: ObjectId,
        b: ObjectId,
        joint: rapier::GenericJoint,
        what: &str,
    ) -> JointId {
        let id = self.ids.next_joint();
        self.add([Primitive::Joint { id, a, b, joint }]);
        log::debug!("{what} joint {id} between {a} and {b}");
        id
    }

    /// Remove a joint at the end of the next step
    pub fn detach(&mut self, joint: JointId) -> Result<()> {
        if !self.joints.contains_key(&joint) && !self.pending.has_joint(joint) {
            return Err(PhysicsError::JointNotFound(joint));
        }
        self.delete([PrimitiveRef::Joint(joint)]);
        Ok(())
    }

    /// Whether a joint is live
    pub fn has_joint(&self, joint: JointId) -> bool {
        self.joints.contains_key(&joint)
    }

    /// Number of live joints
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }
}

#[cfg(test)]
mod tests {
    use crate::body::PhysicProps;
    use crate::collider::ObjectDesc;
    use crate::error::PhysicsError;
    use crate::world::PhysicsWorld;
    use awg_core::{JointId, ObjectId};

    fn pair(world: &mut PhysicsWorld) -> (ObjectId, ObjectId) {
        let a = world
            .spawn(ObjectDesc::circle([0.0, 0.0], 5.0, PhysicProps::fixed()))
            .unwrap();
        let b = world
            .spawn(ObjectDesc::circle([100.0, 0.0], 5.0, PhysicProps::dynamic()))
            .unwrap();
        (a, b)
    }

    #[test]
    fn test_joint_is_deferred() {
        let mut world = PhysicsWorld::default();
        let (a, b) = pair(&mut world);
        let joint = world.attach_rigid(a, b, None, None).unwrap();

        assert!(!world.has_joint(joint));
        world.step(1.0 / 60.0).unwrap();
        assert!(world.has_joint(joint));
        assert_eq!(world.joint_count(), 1);

        world.detach(joint).unwrap();
        world.step(1.0 / 60.0).unwrap();
        assert_eq!(world.joint_count(), 0);
        assert!(matches!(
            world.detach(joint),
            Err(PhysicsError::JointNotFound(j)) if j == joint
        ));
    }

    #[test]
    fn test_unknown_objects() {
        let mut world = PhysicsWorld::default();
        let (a, _) = pair(&mut world);
        let ghost = ObjectId::from_raw(77);
        assert!(matches!(
            world.attach_soft(a, ghost, 10.0, 1.0, 0.1, None, None),
            Err(PhysicsError::ObjectNotFound(id)) if id == ghost
        ));
        assert!(world.detach(JointId::from_raw(5)).is_err());
    }

    #[test]
    fn test_joint_dropped_with_body() {
        let mut world = PhysicsWorld::default();
        let (a, b) = pair(&mut world);
        world.attach_soft(a, b, 50.0, 100.0, 1.0, None, None).unwrap();
        world.step(1.0 / 60.0).unwrap();
        assert_eq!(world.joint_count(), 1);

        world.vanish(b);
        world.step(1.0 / 60.0).unwrap();
        assert_eq!(world.joint_count(), 0);
    }

    #[test]
    fn test_joint_skipped_when_body_vanishes_first() {
        let mut world = PhysicsWorld::default();
        let (a, b) = pair(&mut world);
        world.step(1.0 / 60.0).unwrap();

        let joint = world.attach_rigid(a, b, None, None).unwrap();
        world.vanish(b);
        world.step(1.0 / 60.0).unwrap();
        // Body removal runs after the joint is added, taking the joint with it
        assert!(!world.has_joint(joint));
    }
}
