//! Physics configuration

use crate::error::{PhysicsError, Result};
use crate::material::PhysicsMaterial;
use serde::{Deserialize, Serialize};

/// Physics world configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity vector in pixels per second squared
    pub gravity: [f32; 2],

    /// Longest time one `step` may simulate; longer deltas are clamped
    pub max_step: f32,

    /// Seconds a body must stay still before it falls asleep
    pub sleep_time_threshold: f32,

    /// Enable sleeping for inactive bodies
    pub sleeping_enabled: bool,

    /// Typical object size, used by the solver to scale its tolerances
    pub length_unit: f32,

    /// Solver iterations per step
    pub solver_iterations: usize,

    /// Enable continuous collision detection for dynamic bodies
    pub ccd_enabled: bool,

    /// Material for bodies that don't name one
    pub default_material: PhysicsMaterial,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -2000.0],
            max_step: 1.0 / 30.0,
            sleep_time_threshold: 0.3,
            sleeping_enabled: true,
            length_unit: 32.0,
            solver_iterations: 4,
            ccd_enabled: false,
            default_material: PhysicsMaterial::default(),
        }
    }
}

impl PhysicsConfig {
    /// Create a configuration for high-precision simulation
    pub fn high_precision() -> Self {
        Self {
            solver_iterations: 8,
            max_step: 1.0 / 60.0,
            ccd_enabled: true,
            ..Default::default()
        }
    }

    /// Create a configuration for fast simulation (lower quality)
    pub fn fast() -> Self {
        Self {
            solver_iterations: 2,
            sleep_time_threshold: 0.15,
            ..Default::default()
        }
    }

    /// Set gravity
    pub fn with_gravity(mut self, x: f32, y: f32) -> Self {
        self.gravity = [x, y];
        self
    }

    /// Set the maximum step
    pub fn with_max_step(mut self, max_step: f32) -> Self {
        self.max_step = max_step;
        self
    }

    /// Set the default material
    pub fn with_default_material(mut self, material: PhysicsMaterial) -> Self {
        self.default_material = material;
        self
    }

    /// Check the values the simulation can't work with
    pub fn validate(&self) -> Result<()> {
        if !self.gravity.iter().all(|g| g.is_finite()) {
            return Err(PhysicsError::InvalidConfig(format!(
                "gravity must be finite, got {:?}",
                self.gravity
            )));
        }
        if !(self.max_step.is_finite() && self.max_step > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "max_step must be positive, got {}",
                self.max_step
            )));
        }
        if !(self.length_unit.is_finite() && self.length_unit > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "length_unit must be positive, got {}",
                self.length_unit
            )));
        }
        if self.solver_iterations == 0 {
            return Err(PhysicsError::InvalidConfig(
                "solver_iterations must be at least 1".into(),
            ));
        }
        if self.sleep_time_threshold.is_nan() || self.sleep_time_threshold < 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "sleep_time_threshold must not be negative, got {}",
                self.sleep_time_threshold
            )));
        }
        Ok(())
    }
}
