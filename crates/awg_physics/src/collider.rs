//! Shapes and object descriptions

use crate::body::PhysicProps;
use crate::config::PhysicsConfig;
use crate::error::{PhysicsError, Result};
use awg_core::{EntityKind, ObjectId};
use rapier2d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Collision shape, in body-local coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeDesc {
    /// Convex hull of the given points
    Polygon { points: Vec<[f32; 2]> },
    /// Circle centred on the body origin
    Circle { radius: f32 },
}

impl ShapeDesc {
    /// Polygon shape
    pub fn polygon(points: Vec<[f32; 2]>) -> Self {
        Self::Polygon { points }
    }

    /// Axis-aligned rectangle, see [`rect_points`]
    pub fn rect(width: f32, height: f32, offset: [f32; 2]) -> Self {
        Self::Polygon {
            points: rect_points(width, height, offset).to_vec(),
        }
    }

    /// Circle shape
    pub fn circle(radius: f32) -> Self {
        Self::Circle { radius }
    }

    /// Build a rapier shared shape
    pub(crate) fn to_rapier(&self) -> Result<rapier::SharedShape> {
        match self {
            Self::Polygon { points } => {
                let points: Vec<_> = points
                    .iter()
                    .map(|p| rapier::Point::new(p[0], p[1]))
                    .collect();
                rapier::SharedShape::convex_hull(&points)
                    .filter(|shape| {
                        shape
                            .as_convex_polygon()
                            .map_or(false, |poly| poly.points().len() >= 3)
                    })
                    .ok_or_else(|| {
                        PhysicsError::ShapeCreationFailed(format!(
                            "degenerate polygon with {} points",
                            points.len()
                        ))
                    })
            }
            Self::Circle { radius } => {
                if radius.is_finite() && *radius > 0.0 {
                    Ok(rapier::SharedShape::ball(*radius))
                } else {
                    Err(PhysicsError::ShapeCreationFailed(format!(
                        "circle radius must be positive, got {radius}"
                    )))
                }
            }
        }
    }
}

/// Corners of a `width` x `height` rectangle centred on `offset`.
///
/// Starts at the bottom-left corner and goes clockwise.
pub fn rect_points(width: f32, height: f32, offset: [f32; 2]) -> [[f32; 2]; 4] {
    let w = width / 2.0;
    let h = height / 2.0;
    let [x, y] = offset;
    [
        [-w + x, -h + y],
        [-w + x, h + y],
        [w + x, h + y],
        [w + x, -h + y],
    ]
}

/// Everything needed to create a physics object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDesc {
    /// World position of the body
    pub position: [f32; 2],
    /// Rotation in radians
    pub rotation: f32,
    /// Collision shape
    pub shape: ShapeDesc,
    /// Physical properties
    pub props: PhysicProps,
    /// Entity kind, used by trigger allow-lists
    pub kind: EntityKind,
    /// Sensor shapes detect overlaps without collision response
    pub sensor: bool,
}

impl ObjectDesc {
    /// Polygon object
    pub fn polygon(position: [f32; 2], points: Vec<[f32; 2]>, props: PhysicProps) -> Self {
        Self::new(position, ShapeDesc::polygon(points), props)
    }

    /// Circle object
    pub fn circle(position: [f32; 2], radius: f32, props: PhysicProps) -> Self {
        Self::new(position, ShapeDesc::circle(radius), props)
    }

    /// Object with any shape
    pub fn new(position: [f32; 2], shape: ShapeDesc, props: PhysicProps) -> Self {
        Self {
            position,
            rotation: 0.0,
            shape,
            props,
            kind: EntityKind::default(),
            sensor: false,
        }
    }

    /// Set the entity kind
    pub fn with_kind(mut self, kind: EntityKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the rotation (radians)
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Make the shape a sensor
    pub fn sensor(mut self) -> Self {
        self.sensor = true;
        self
    }

    /// Check the shape without building anything
    pub fn validate(&self) -> Result<()> {
        self.shape.to_rapier().map(|_| ())
    }

    /// Build the rapier body and collider for object `id`
    pub(crate) fn build(
        &self,
        id: ObjectId,
        config: &PhysicsConfig,
    ) -> Result<(rapier::RigidBody, rapier::Collider)> {
        let shape = self.shape.to_rapier()?;
        let user_data = pack_user_data(id, self.props.filter.group);
        let material = self.props.material.unwrap_or(config.default_material);

        let body = self
            .props
            .build_body(self.position, self.rotation, user_data, config);

        let mut hooks = rapier::ActiveHooks::FILTER_CONTACT_PAIRS;
        if self.sensor {
            hooks |= rapier::ActiveHooks::FILTER_INTERSECTION_PAIR;
        } else {
            hooks |= rapier::ActiveHooks::MODIFY_SOLVER_CONTACTS;
        }

        let mut builder = rapier::ColliderBuilder::new(shape)
            .sensor(self.sensor)
            .friction(material.friction)
            .restitution(material.restitution)
            .friction_combine_rule(material.friction_combine.into())
            .restitution_combine_rule(material.restitution_combine.into())
            .collision_groups(self.props.filter.to_rapier())
            .active_hooks(hooks)
            .user_data(user_data);

        builder = match self.props.mass {
            Some(mass) => builder.mass(mass),
            None => builder.density(material.density),
        };

        Ok((body, builder.build()))
    }
}

/// Pack an object id and a filter group into collider user data.
///
/// Low 64 bits hold the id, the next 32 the group, so the contact hooks can
/// apply group rules without the registry.
pub fn pack_user_data(id: ObjectId, group: u32) -> u128 {
    ((group as u128) << 64) | id.raw() as u128
}

/// Object id stored in user data (`None` for untagged shapes)
pub fn object_id(user_data: u128) -> Option<ObjectId> {
    let raw = user_data as u64;
    (raw != 0).then(|| ObjectId::from_raw(raw))
}

/// Filter group stored in user data
pub fn filter_group(user_data: u128) -> u32 {
    (user_data >> 64) as u32
}

/// Replace the group in packed user data
pub(crate) fn with_group(user_data: u128, group: u32) -> u128 {
    (user_data & u64::MAX as u128) | ((group as u128) << 64)
}

/// Filter a collider was built with
#[cfg(test)]
pub(crate) fn collider_filter(collider: &rapier::Collider) -> crate::layers::CollisionFilter {
    let groups = collider.collision_groups();
    crate::layers::CollisionFilter {
        group: filter_group(collider.user_data),
        categories: groups.memberships.bits(),
        mask: groups.filter.bits(),
    }
}
