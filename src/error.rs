//! Error types shared by the physics adapter and the scene loader.

use bevy_ecs::prelude::Entity;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsError {
    /// A rigid body was found without a box or circle collider.
    #[error("entity {0:?} has a rigid body but no collider; attach a collider to all physics-affected entities")]
    MissingCollider(Entity),
    /// The entity has no simulated body, either because it lacks a
    /// `RigidBody` or because physics was not initialized yet.
    #[error("entity {0:?} has no physics body")]
    NoBody(Entity),
    #[error("joint no longer exists in the physics world")]
    NoJoint,
}

/// Startup failures of the [`Kernel`](crate::kernel::Kernel).
#[derive(Debug, Error)]
pub enum KernelError {
    #[error(transparent)]
    Physics(#[from] PhysicsError),
    #[error("failed to build the update schedule: {0}")]
    Schedule(String),
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scene file: {0}")]
    Parse(#[from] serde_json::Error),
}
