//! Segment queries
//!
//! A ray runs from `start` to `end`; `alpha` on a hit is the fraction of that
//! segment travelled. A positive radius sweeps a circle along the segment.
//! Sensors (and so triggers) are never hit.

use crate::collider::{filter_group, object_id};
use crate::layers::{groups_exclude, CollisionFilter};
use crate::world::PhysicsWorld;
use awg_core::ObjectId;
use rapier2d::parry;
use rapier2d::parry::query::ShapeCastOptions;
use rapier2d::prelude as rapier;

/// Result of a segment query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Object hit (`None` for untagged shapes)
    pub object: Option<ObjectId>,
    /// Hit point in world space
    pub point: [f32; 2],
    /// Surface normal at the hit point
    pub normal: [f32; 2],
    /// Fraction of the segment travelled, in `[0, 1]`
    pub alpha: f32,
}

/// Query interface for physics world
pub struct PhysicsQuery<'a> {
    pub(crate) query_pipeline: &'a rapier::QueryPipeline,
    pub(crate) colliders: &'a rapier::ColliderSet,
    pub(crate) bodies: &'a rapier::RigidBodySet,
}

impl<'a> PhysicsQuery<'a> {
    /// All hits along the segment, nearest first
    pub fn ray_cast(
        &self,
        start: [f32; 2],
        end: [f32; 2],
        filter: Option<CollisionFilter>,
        radius: f32,
    ) -> Vec<RayHit> {
        let filter = filter.unwrap_or_default();
        let origin = rapier::Point::new(start[0], start[1]);
        let dir = rapier::Vector::new(end[0] - start[0], end[1] - start[1]);
        if dir.norm_squared() <= f32::EPSILON {
            return Vec::new();
        }

        let same_group = |_: rapier::ColliderHandle, collider: &rapier::Collider| {
            !groups_exclude(filter.group, filter_group(collider.user_data))
        };
        let query_filter = rapier::QueryFilter::new()
            .groups(filter.to_rapier())
            .exclude_sensors()
            .predicate(&same_group);

        let mut hits = Vec::new();

        if radius <= 0.0 {
            let ray = rapier::Ray::new(origin, dir);
            self.query_pipeline.intersections_with_ray(
                self.bodies,
                self.colliders,
                &ray,
                1.0,
                true,
                query_filter,
                |handle, intersection| {
                    let point = ray.point_at(intersection.time_of_impact);
                    hits.push(RayHit {
                        object: self.colliders.get(handle).and_then(|c| object_id(c.user_data)),
                        point: [point.x, point.y],
                        normal: [intersection.normal.x, intersection.normal.y],
                        alpha: intersection.time_of_impact,
                    });
                    true // Continue searching
                },
            );
        } else {
            // Broad pass with the swept capsule, then an exact sweep per candidate
            let capsule = parry::shape::Capsule::new(origin, origin + dir, radius);
            let mut candidates = Vec::new();
            self.query_pipeline.intersections_with_shape(
                self.bodies,
                self.colliders,
                &rapier::Isometry::identity(),
                &capsule,
                query_filter,
                |handle| {
                    candidates.push(handle);
                    true
                },
            );

            let ball = parry::shape::Ball::new(radius);
            let ball_pos = rapier::Isometry::translation(start[0], start[1]);
            for handle in candidates {
                let Some(collider) = self.colliders.get(handle) else {
                    continue;
                };
                let hit = parry::query::cast_shapes(
                    &ball_pos,
                    &dir,
                    &ball,
                    collider.position(),
                    &rapier::Vector::zeros(),
                    collider.shape(),
                    sweep_options(),
                );
                if let Ok(Some(hit)) = hit {
                    hits.push(Self::sweep_hit(collider, &hit));
                }
            }
        }

        hits.sort_by(|a, b| a.alpha.total_cmp(&b.alpha));
        hits
    }

    /// Nearest hit along the segment
    pub fn ray_cast_first(
        &self,
        start: [f32; 2],
        end: [f32; 2],
        filter: Option<CollisionFilter>,
        radius: f32,
    ) -> Option<RayHit> {
        let filter = filter.unwrap_or_default();
        let origin = rapier::Point::new(start[0], start[1]);
        let dir = rapier::Vector::new(end[0] - start[0], end[1] - start[1]);
        if dir.norm_squared() <= f32::EPSILON {
            return None;
        }

        let same_group = |_: rapier::ColliderHandle, collider: &rapier::Collider| {
            !groups_exclude(filter.group, filter_group(collider.user_data))
        };
        let query_filter = rapier::QueryFilter::new()
            .groups(filter.to_rapier())
            .exclude_sensors()
            .predicate(&same_group);

        if radius <= 0.0 {
            let ray = rapier::Ray::new(origin, dir);
            let (handle, intersection) = self.query_pipeline.cast_ray_and_get_normal(
                self.bodies,
                self.colliders,
                &ray,
                1.0,
                true,
                query_filter,
            )?;
            let point = ray.point_at(intersection.time_of_impact);
            Some(RayHit {
                object: self.colliders.get(handle).and_then(|c| object_id(c.user_data)),
                point: [point.x, point.y],
                normal: [intersection.normal.x, intersection.normal.y],
                alpha: intersection.time_of_impact,
            })
        } else {
            let ball = parry::shape::Ball::new(radius);
            let (handle, hit) = self.query_pipeline.cast_shape(
                self.bodies,
                self.colliders,
                &rapier::Isometry::translation(start[0], start[1]),
                &dir,
                &ball,
                sweep_options(),
                query_filter,
            )?;
            let collider = self.colliders.get(handle)?;
            Some(Self::sweep_hit(collider, &hit))
        }
    }

    /// Hit data of a circle sweep, taken from the collider's side
    fn sweep_hit(collider: &rapier::Collider, hit: &parry::query::ShapeCastHit) -> RayHit {
        let position = collider.position();
        let point = position * hit.witness2;
        let normal = position.rotation * hit.normal2.into_inner();
        RayHit {
            object: object_id(collider.user_data),
            point: [point.x, point.y],
            normal: [normal.x, normal.y],
            alpha: hit.time_of_impact,
        }
    }
}

fn sweep_options() -> ShapeCastOptions {
    ShapeCastOptions {
        max_time_of_impact: 1.0,
        stop_at_penetration: true,
        ..Default::default()
    }
}

impl PhysicsWorld {
    /// Query interface over the current step's state
    pub fn query(&self) -> PhysicsQuery<'_> {
        PhysicsQuery {
            query_pipeline: &self.query_pipeline,
            colliders: &self.colliders,
            bodies: &self.bodies,
        }
    }

    /// All hits along a segment, nearest first.
    ///
    /// Bodies still waiting in the add queue are not seen.
    pub fn ray_cast(
        &self,
        start: [f32; 2],
        end: [f32; 2],
        filter: Option<CollisionFilter>,
        radius: f32,
    ) -> Vec<RayHit> {
        self.query().ray_cast(start, end, filter, radius)
    }

    /// Nearest hit along a segment
    pub fn ray_cast_first(
        &self,
        start: [f32; 2],
        end: [f32; 2],
        filter: Option<CollisionFilter>,
        radius: f32,
    ) -> Option<RayHit> {
        self.query().ray_cast_first(start, end, filter, radius)
    }
}
