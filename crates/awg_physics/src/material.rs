//! Physics materials defining surface properties

use rapier2d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Physics material defining friction and elasticity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsMaterial {
    /// Friction coefficient (0 = frictionless)
    pub friction: f32,
    /// Elasticity (0 = no bounce, 1 = perfect bounce)
    pub restitution: f32,
    /// Density, used when no explicit mass is given
    pub density: f32,
    /// How friction is combined between two shapes
    pub friction_combine: CombineRule,
    /// How restitution is combined between two shapes
    pub restitution_combine: CombineRule,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            friction: 1.0,
            restitution: 0.0,
            density: 1.0,
            friction_combine: CombineRule::Multiply,
            restitution_combine: CombineRule::Multiply,
        }
    }
}

impl PhysicsMaterial {
    /// Create a new physics material
    pub fn new(friction: f32, restitution: f32) -> Self {
        Self {
            friction,
            restitution,
            ..Default::default()
        }
    }

    /// Frictionless ice-like material
    pub fn ice() -> Self {
        Self {
            friction: 0.05,
            restitution: 0.0,
            density: 0.9,
            ..Default::default()
        }
    }

    /// Bouncy rubber-like material
    pub fn rubber() -> Self {
        Self {
            friction: 0.8,
            restitution: 0.8,
            density: 1.1,
            ..Default::default()
        }
    }

    /// Metal material
    pub fn metal() -> Self {
        Self {
            friction: 0.3,
            restitution: 0.2,
            density: 7.8,
            ..Default::default()
        }
    }

    /// Wood material
    pub fn wood() -> Self {
        Self {
            friction: 0.5,
            restitution: 0.3,
            density: 0.6,
            ..Default::default()
        }
    }

    /// Stone material
    pub fn stone() -> Self {
        Self {
            friction: 0.7,
            restitution: 0.1,
            density: 2.5,
            ..Default::default()
        }
    }

    /// Set friction
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction.max(0.0);
        self
    }

    /// Set restitution
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution.clamp(0.0, 1.0);
        self
    }

    /// Set density
    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density.max(0.001);
        self
    }
}

/// Rule for combining material properties of two touching shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CombineRule {
    /// Use the average of both values
    Average,
    /// Use the minimum value
    Min,
    /// Use the maximum value
    Max,
    /// Multiply the values
    #[default]
    Multiply,
}

impl From<CombineRule> for rapier::CoefficientCombineRule {
    fn from(rule: CombineRule) -> Self {
        match rule {
            CombineRule::Average => rapier::CoefficientCombineRule::Average,
            CombineRule::Min => rapier::CoefficientCombineRule::Min,
            CombineRule::Max => rapier::CoefficientCombineRule::Max,
            CombineRule::Multiply => rapier::CoefficientCombineRule::Multiply,
        }
    }
}
