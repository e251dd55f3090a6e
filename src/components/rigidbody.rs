//! Rigid body component.
//!
//! A [`RigidBody`] marks an entity as simulated by the physics world. It stores
//! the initial parameters used to build the body and, once
//! [`initialize_physics`](crate::systems::physics::initialize_physics) has run,
//! the handle of the body owned by [`PhysicsWorld`](crate::resources::physicsworld::PhysicsWorld).
//!
//! The body is created once and lives as long as the physics world. Changing
//! the parameters after initialization has no effect on the simulation.

use bevy_ecs::prelude::Component;
use glam::Vec2;
use rapier2d::prelude::RigidBodyHandle;
use serde::{Deserialize, Serialize};

/// How the simulation treats a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyType {
    /// Never moves. Terrain, walls.
    Static,
    /// Moved by its velocity only, ignores forces.
    Kinematic,
    /// Fully simulated.
    #[default]
    Dynamic,
}

/// Parameters the body is created with.
///
/// `position_offset` is added to the entity's transform position when the
/// body is placed, and subtracted again when the body pose is written back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyParameters {
    #[serde(rename = "type")]
    pub body_type: BodyType,
    pub position_offset: Vec2,
    pub allow_sleep: bool,
    pub awake: bool,
    /// Continuous collision detection for fast movers.
    pub bullet: bool,
    pub enabled: bool,
    pub fixed_rotation: bool,
    pub gravity_scale: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub linear_velocity: Vec2,
    /// Radians per second.
    pub angular_velocity: f32,
}

impl Default for BodyParameters {
    fn default() -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position_offset: Vec2::ZERO,
            allow_sleep: true,
            awake: true,
            bullet: false,
            enabled: true,
            fixed_rotation: false,
            gravity_scale: 1.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
        }
    }
}

/// ECS handle onto a physics body.
///
/// # Example
/// ```ignore
/// world.spawn((
///     Transform::from_xy(-100.0, 50.0),
///     RigidBody::fixed(),
///     BoxCollider::new(20.0, 1.0),
/// ));
/// ```
#[derive(Component, Clone, Debug, Default)]
pub struct RigidBody {
    pub initial: BodyParameters,
    pub(crate) handle: Option<RigidBodyHandle>,
}

impl RigidBody {
    /// A dynamic body with default parameters.
    pub fn dynamic() -> Self {
        Self::default()
    }

    /// A static body that never moves.
    pub fn fixed() -> Self {
        Self::from_parameters(BodyParameters {
            body_type: BodyType::Static,
            ..BodyParameters::default()
        })
    }

    /// A kinematic body driven by its velocity.
    pub fn kinematic() -> Self {
        Self::from_parameters(BodyParameters {
            body_type: BodyType::Kinematic,
            ..BodyParameters::default()
        })
    }

    pub fn from_parameters(initial: BodyParameters) -> Self {
        Self {
            initial,
            handle: None,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.initial.position_offset = offset;
        self
    }

    pub fn with_linear_velocity(mut self, v: Vec2) -> Self {
        self.initial.linear_velocity = v;
        self
    }

    pub fn with_angular_velocity(mut self, w: f32) -> Self {
        self.initial.angular_velocity = w;
        self
    }

    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.initial.linear_damping = linear;
        self.initial.angular_damping = angular;
        self
    }

    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.initial.gravity_scale = scale;
        self
    }

    pub fn with_fixed_rotation(mut self, fixed: bool) -> Self {
        self.initial.fixed_rotation = fixed;
        self
    }

    pub fn with_bullet(mut self, bullet: bool) -> Self {
        self.initial.bullet = bullet;
        self
    }

    pub fn body_type(&self) -> BodyType {
        self.initial.body_type
    }

    /// Handle of the simulated body, `None` before initialization.
    pub fn handle(&self) -> Option<RigidBodyHandle> {
        self.handle
    }

    /// Whether the physics world already owns a body for this component.
    pub fn is_attached(&self) -> bool {
        self.handle.is_some()
    }
}
