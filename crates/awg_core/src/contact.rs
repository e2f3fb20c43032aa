//! Contact data handed to collision hooks and triggers

use crate::id::ObjectId;

/// A contact between two shapes, seen from one of them.
///
/// `this` is the object the hook or trigger belongs to, `other` is the
/// opposite shape's owner (`None` when it is not registered any more).
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    /// Object receiving the contact
    pub this: ObjectId,
    /// Object on the other side of the contact
    pub other: Option<ObjectId>,
    /// Contact normal, pointing from `this` towards `other` (zero if unknown)
    pub normal: [f32; 2],
    /// Contact points in world space
    pub points: Vec<[f32; 2]>,
    /// Total impulse the solver applied to `this` (zero before solving)
    pub total_impulse: [f32; 2],
    /// Whether the pair started touching during the current step
    pub is_first_contact: bool,
}

impl Contact {
    /// A contact with no geometric data
    pub fn new(this: ObjectId, other: Option<ObjectId>) -> Self {
        Self {
            this,
            other,
            normal: [0.0, 0.0],
            points: Vec::new(),
            total_impulse: [0.0, 0.0],
            is_first_contact: true,
        }
    }

    /// Set the normal
    pub fn with_normal(mut self, normal: [f32; 2]) -> Self {
        self.normal = normal;
        self
    }

    /// Set the contact points
    pub fn with_points(mut self, points: Vec<[f32; 2]>) -> Self {
        self.points = points;
        self
    }

    /// Set the total impulse
    pub fn with_impulse(mut self, impulse: [f32; 2]) -> Self {
        self.total_impulse = impulse;
        self
    }

    /// Set the first-contact flag
    pub fn with_first_contact(mut self, first: bool) -> Self {
        self.is_first_contact = first;
        self
    }

    /// The same contact seen from the other side.
    ///
    /// Returns `None` when the other side is unknown.
    pub fn flipped(&self) -> Option<Self> {
        let other = self.other?;
        Some(Self {
            this: other,
            other: Some(self.this),
            normal: [-self.normal[0], -self.normal[1]],
            points: self.points.clone(),
            total_impulse: [-self.total_impulse[0], -self.total_impulse[1]],
            is_first_contact: self.is_first_contact,
        })
    }

    /// Length of the total impulse
    pub fn impulse_magnitude(&self) -> f32 {
        let [x, y] = self.total_impulse;
        (x * x + y * y).sqrt()
    }

    /// Average of the contact points
    pub fn average_point(&self) -> Option<[f32; 2]> {
        if self.points.is_empty() {
            return None;
        }
        let mut sum = [0.0f32; 2];
        for p in &self.points {
            sum[0] += p[0];
            sum[1] += p[1];
        }
        let n = self.points.len() as f32;
        Some([sum[0] / n, sum[1] / n])
    }
}
