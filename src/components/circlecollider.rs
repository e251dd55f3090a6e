use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::resources::physicsworld::{FixtureDef, FixtureShape};

/// Circular collision shape centred on the body origin.
#[derive(Debug, Clone, Copy, PartialEq, Component, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleCollider {
    pub radius: f32,
    pub density: f32,
    pub friction: f32,
    pub sensor: bool,
}

impl Default for CircleCollider {
    fn default() -> Self {
        Self {
            radius: 1.0,
            density: 1.0,
            friction: 0.5,
            sensor: false,
        }
    }
}

impl CircleCollider {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
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
            shape: FixtureShape::Circle {
                radius: self.radius,
            },
            density: self.density,
            friction: self.friction,
            sensor: self.sensor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_radius_is_one() {
        assert_eq!(CircleCollider::default().radius, 1.0);
    }

    #[test]
    fn test_sensor_fixture() {
        let f = CircleCollider::new(0.8).as_sensor().fixture();
        assert_eq!(f.shape, FixtureShape::Circle { radius: 0.8 });
        assert!(f.sensor);
    }
}
