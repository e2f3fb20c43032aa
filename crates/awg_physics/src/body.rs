//! Rigid body kinds and construction properties

use crate::config::PhysicsConfig;
use crate::layers::CollisionFilter;
use crate::material::PhysicsMaterial;
use rapier2d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Type of rigid body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyKind {
    /// Level geometry, never moves
    #[default]
    Static,
    /// Fully simulated
    Dynamic,
    /// Moved by code, pushes dynamic bodies
    Kinematic,
}

impl From<BodyKind> for rapier::RigidBodyType {
    fn from(kind: BodyKind) -> Self {
        match kind {
            BodyKind::Static => rapier::RigidBodyType::Fixed,
            BodyKind::Dynamic => rapier::RigidBodyType::Dynamic,
            BodyKind::Kinematic => rapier::RigidBodyType::KinematicVelocityBased,
        }
    }
}

impl From<rapier::RigidBodyType> for BodyKind {
    fn from(t: rapier::RigidBodyType) -> Self {
        match t {
            rapier::RigidBodyType::Fixed => BodyKind::Static,
            rapier::RigidBodyType::Dynamic => BodyKind::Dynamic,
            rapier::RigidBodyType::KinematicPositionBased
            | rapier::RigidBodyType::KinematicVelocityBased => BodyKind::Kinematic,
        }
    }
}

/// Physical properties of an object.
///
/// Every object gets its own copy; there are no shared per-type defaults to
/// mutate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicProps {
    /// Body kind
    pub kind: BodyKind,
    /// Mass. `None` derives it from the material density and shape area.
    pub mass: Option<f32>,
    /// Surface material. `None` uses the world's default material.
    pub material: Option<PhysicsMaterial>,
    /// Collision filter
    pub filter: CollisionFilter,
    /// Whether the body may rotate
    pub can_rotate: bool,
    /// Gravity multiplier (0 = floats)
    pub gravity_scale: f32,
}

impl Default for PhysicProps {
    fn default() -> Self {
        Self {
            kind: BodyKind::Static,
            mass: Some(1.0),
            material: None,
            filter: CollisionFilter::ALL,
            can_rotate: true,
            gravity_scale: 1.0,
        }
    }
}

impl PhysicProps {
    /// Static body properties
    pub fn fixed() -> Self {
        Self::default()
    }

    /// Dynamic body properties
    pub fn dynamic() -> Self {
        Self {
            kind: BodyKind::Dynamic,
            ..Default::default()
        }
    }

    /// Kinematic body properties
    pub fn kinematic() -> Self {
        Self {
            kind: BodyKind::Kinematic,
            ..Default::default()
        }
    }

    /// Set mass
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }

    /// Derive mass from density
    pub fn with_density_mass(mut self) -> Self {
        self.mass = None;
        self
    }

    /// Set material
    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = Some(material);
        self
    }

    /// Set collision filter
    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Allow or forbid rotation
    pub fn with_rotation(mut self, can_rotate: bool) -> Self {
        self.can_rotate = can_rotate;
        self
    }

    /// Set gravity scale
    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    /// Build the rapier body
    pub(crate) fn build_body(
        &self,
        position: [f32; 2],
        rotation: f32,
        user_data: u128,
        config: &PhysicsConfig,
    ) -> rapier::RigidBody {
        let mut builder = rapier::RigidBodyBuilder::new(self.kind.into())
            .translation(rapier::Vector::new(position[0], position[1]))
            .rotation(rotation)
            .gravity_scale(self.gravity_scale)
            .can_sleep(config.sleeping_enabled)
            .ccd_enabled(config.ccd_enabled && self.kind == BodyKind::Dynamic)
            .user_data(user_data);

        if !self.can_rotate {
            builder = builder.lock_rotations();
        }

        let mut body = builder.build();
        body.activation_mut().time_until_sleep = config.sleep_time_threshold;
        body
    }
}
