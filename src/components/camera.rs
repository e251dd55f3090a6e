//! View camera component.
//!
//! The render pass looks through the first entity holding a [`Camera`]. When
//! `follow` is set, [`camera_follow`](crate::systems::camera::camera_follow)
//! moves the camera transform to track that entity every frame.

use bevy_ecs::prelude::{Component, Entity};

#[derive(Component, Clone, Copy, Debug)]
pub struct Camera {
    /// Pixels per world unit.
    pub zoom: f32,
    pub follow: Option<Entity>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            zoom: 8.0,
            follow: None,
        }
    }
}

impl Camera {
    pub fn following(target: Entity) -> Self {
        Self {
            follow: Some(target),
            ..Self::default()
        }
    }

    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }
}
