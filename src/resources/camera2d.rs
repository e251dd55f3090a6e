//! Shared 2D camera resource.
//!
//! Wraps raylib's [`raylib::prelude::Camera2D`] so that the render pass and the
//! debug overlay agree on a single world/screen transform. Refreshed every
//! frame from the scene's [`Camera`](crate::components::camera::Camera)
//! entity.

use bevy_ecs::prelude::Resource;
use raylib::prelude::Camera2D;

/// ECS resource that holds the active 2D camera parameters.
#[derive(Resource)]
pub struct Camera2DRes(pub Camera2D);
