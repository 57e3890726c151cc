//! Error types for the physics layer

use gameplay_components::ComponentError;
use rapier3d::prelude as rapier;
use thiserror::Error;

/// Physics layer errors
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// Rigid body not found
    #[error("Rigid body not found: {0:?}")]
    BodyNotFound(rapier::RigidBodyHandle),

    /// Collider not found
    #[error("Collider not found: {0:?}")]
    ColliderNotFound(rapier::ColliderHandle),

    /// Invalid configuration
    #[error("Invalid physics configuration: {0}")]
    InvalidConfig(String),

    /// The driven component refused an operation
    #[error(transparent)]
    Component(#[from] ComponentError),
}

/// Result type for physics operations
pub type Result<T> = std::result::Result<T, PhysicsError>;
