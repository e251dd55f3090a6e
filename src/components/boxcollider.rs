use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::resources::physicsworld::{FixtureDef, FixtureShape};

/// Rectangular collision shape attached to an entity's [`RigidBody`].
///
/// Sizes are half-extents, measured from the body origin.
///
/// [`RigidBody`]: super::rigidbody::RigidBody
#[derive(Debug, Clone, Copy, PartialEq, Component, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxCollider {
    pub half_width: f32,
    pub half_height: f32,
    pub density: f32,
    pub friction: f32,
    /// Sensors detect overlaps but produce no contact response.
    pub sensor: bool,
}

impl Default for BoxCollider {
    fn default() -> Self {
        Self {
            half_width: 1.0,
            half_height: 1.0,
            density: 1.0,
            friction: 0.5,
            sensor: false,
        }
    }
}

impl BoxCollider {
    /// Create a BoxCollider with given half-extents
    pub fn new(half_width: f32, half_height: f32) -> Self {
        Self {
            half_width,
            half_height,
            ..Self::default()
        }
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn as_sensor(mut self) -> Self {
        self.sensor = true;
        self
    }

    pub fn fixture(&self) -> FixtureDef {
        FixtureDef {
            shape: FixtureShape::Box {
                half_width: self.half_width,
                half_height: self.half_height,
            },
            density: self.density,
            friction: self.friction,
            sensor: self.sensor,
        }
    }
}
