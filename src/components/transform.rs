//! Spatial transform of an entity.
//!
//! The scene lives in a 2D plane, but the transform keeps three components per
//! vector so that scene data authored for 3D views (depth, euler angles) can be
//! stored without loss. Only `position.xy` and `rotation.z` take part in the
//! physics simulation.

use bevy_ecs::prelude::Component;
use glam::{Vec2, Vec3};

/// Position, rotation (euler angles in radians) and scale of an entity.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Transform at `(x, y)` with no rotation and unit scale.
    pub fn from_xy(x: f32, y: f32) -> Self {
        Self {
            position: Vec3::new(x, y, 0.0),
            ..Self::default()
        }
    }

    pub fn with_angle(mut self, radians: f32) -> Self {
        self.rotation.z = radians;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Position projected on the simulation plane.
    pub fn planar(&self) -> Vec2 {
        self.position.truncate()
    }

    /// Rotation around the plane normal, in radians.
    pub fn angle(&self) -> f32 {
        self.rotation.z
    }

    /// Overwrite the planar part of the transform, keeping depth and the
    /// off-plane rotations.
    pub fn set_planar(&mut self, position: Vec2, angle: f32) {
        self.position.x = position.x;
        self.position.y = position.y;
        self.rotation.z = angle;
    }
}
