//! Camera tracking system.
use bevy_ecs::prelude::*;

use crate::components::camera::Camera;
use crate::components::transform::Transform;

/// Move every following camera over its target, keeping the camera depth.
pub fn camera_follow(
    mut cameras: Query<(&Camera, &mut Transform)>,
    targets: Query<&Transform, Without<Camera>>,
) {
    for (camera, mut transform) in cameras.iter_mut() {
        let Some(target) = camera.follow else {
            continue;
        };
        if let Ok(target_transform) = targets.get(target) {
            transform.position.x = target_transform.position.x;
            transform.position.y = target_transform.position.y;
        }
    }
}
