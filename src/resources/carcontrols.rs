//! Drive state of the player car.
//!
//! Inserted by [`crate::game::mount_wheels`] once both wheels are mounted. The
//! input listener reads the wheel handles from here to change motor speeds.

use bevy_ecs::prelude::{Entity, Resource};

use crate::resources::physicsworld::Wheel;

#[derive(Resource, Debug, Clone, Copy)]
pub struct CarControls {
    pub chassis: Entity,
    pub back_wheel: Wheel,
    pub front_wheel: Wheel,
    /// Motor speed applied by the drive inputs, radians per second.
    pub speed: f32,
}

impl CarControls {
    pub fn wheels(&self) -> [Wheel; 2] {
        [self.back_wheel, self.front_wheel]
    }
}
