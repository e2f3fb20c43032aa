//! Error types for the physics system

use awg_core::{JointId, ObjectId};
use awg_triggers::PlacementError;
use thiserror::Error;

/// Physics system errors
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// Category name not in the category table
    #[error("Unknown collision category: {0}")]
    UnknownCategory(String),

    /// `ignore` and `collide_with` given together
    #[error("Pass only one of `ignore` and `collide_with`")]
    ConflictingFilterArgs,

    /// Trigger placement or shape is wrong
    #[error("Invalid trigger: {0}")]
    InvalidTrigger(String),

    /// Shape creation failed
    #[error("Failed to create collision shape: {0}")]
    ShapeCreationFailed(String),

    /// Invalid configuration
    #[error("Invalid physics configuration: {0}")]
    InvalidConfig(String),

    /// No object with this id, live or pending
    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectId),

    /// No joint with this id, live or pending
    #[error("Joint not found: {0}")]
    JointNotFound(JointId),

    /// Simulation produced a non-finite position or velocity
    #[error("Non-finite body state for object {0} after step")]
    NumericalFault(ObjectId),
}

impl From<PlacementError> for PhysicsError {
    fn from(err: PlacementError) -> Self {
        Self::InvalidTrigger(err.to_string())
    }
}

/// Result type for physics operations
pub type Result<T> = std::result::Result<T, PhysicsError>;
