//! JSON scene files.
//!
//! A scene file lists entities to spawn before physics initialization:
//!
//! ```json
//! {
//!   "entities": [
//!     {
//!       "name": "ramp",
//!       "position": [-52.0, 21.0],
//!       "rotation": -0.8,
//!       "body": { "type": "static" },
//!       "collider": { "shape": "box", "half_width": 40.0, "half_height": 1.0 },
//!       "color": [120, 90, 60, 255]
//!     }
//!   ]
//! }
//! ```
//!
//! Entities without a `body` are spawned without a [`RigidBody`] and take no
//! part in the simulation. A `body` without a `collider` is accepted here and
//! rejected later by physics initialization.

use std::path::Path;

use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3};
use log::info;
use serde::{Deserialize, Serialize};

use crate::components::boxcollider::BoxCollider;
use crate::components::circlecollider::CircleCollider;
use crate::components::node::Node;
use crate::components::rigidbody::{BodyParameters, RigidBody};
use crate::components::transform::Transform;
use crate::error::SceneError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ColliderDescription {
    Box(BoxCollider),
    Circle(CircleCollider),
}

fn unit_scale() -> Vec2 {
    Vec2::ONE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDescription {
    pub name: String,
    #[serde(default)]
    pub position: Vec2,
    /// Radians.
    #[serde(default)]
    pub rotation: f32,
    #[serde(default = "unit_scale")]
    pub scale: Vec2,
    #[serde(default)]
    pub body: Option<BodyParameters>,
    #[serde(default)]
    pub collider: Option<ColliderDescription>,
    #[serde(default)]
    pub color: Option<[u8; 4]>,
}

impl EntityDescription {
    fn transform(&self) -> Transform {
        Transform::from_xy(self.position.x, self.position.y)
            .with_angle(self.rotation)
            .with_scale(Vec3::new(self.scale.x, self.scale.y, 1.0))
    }

    /// Spawn the entity into `world`.
    pub fn spawn(&self, world: &mut World) -> Entity {
        let mut node = Node::new(self.name.clone());
        if let Some(color) = self.color {
            node = node.with_color(color);
        }
        let mut entity = world.spawn((self.transform(), node));
        if let Some(params) = self.body {
            entity.insert(RigidBody::from_parameters(params));
        }
        match self.collider {
            Some(ColliderDescription::Box(c)) => {
                entity.insert(c);
            }
            Some(ColliderDescription::Circle(c)) => {
                entity.insert(c);
            }
            None => {}
        }
        entity.id()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub entities: Vec<EntityDescription>,
}

impl SceneDescription {
    pub fn from_json_str(text: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let scene = Self::from_json_str(&text)?;
        info!(
            "Loaded scene {:?} with {} entities",
            path,
            scene.entities.len()
        );
        Ok(scene)
    }

    /// Spawn every entity in file order.
    pub fn spawn(&self, world: &mut World) -> Vec<Entity> {
        self.entities.iter().map(|e| e.spawn(world)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::rigidbody::BodyType;

    const RAMP: &str = r#"{
        "entities": [
            {
                "name": "ramp",
                "position": [-52.0, 21.0],
                "rotation": -0.8,
                "body": { "type": "static" },
                "collider": { "shape": "box", "half_width": 40.0, "half_height": 1.0 },
                "color": [120, 90, 60, 255]
            },
            {
                "name": "ball",
                "position": [0.0, 10.0],
                "body": {},
                "collider": { "shape": "circle", "radius": 0.5, "friction": 0.2 }
            },
            { "name": "marker" }
        ]
    }"#;

    #[test]
    fn test_parse_scene() {
        let scene = SceneDescription::from_json_str(RAMP).unwrap();
        assert_eq!(scene.entities.len(), 3);
        let ramp = &scene.entities[0];
        assert_eq!(ramp.position, Vec2::new(-52.0, 21.0));
        assert_eq!(ramp.scale, Vec2::ONE);
        assert_eq!(ramp.body.unwrap().body_type, BodyType::Static);
        assert_eq!(
            ramp.collider,
            Some(ColliderDescription::Box(BoxCollider::new(40.0, 1.0)))
        );
        let ball = &scene.entities[1];
        assert_eq!(ball.body.unwrap().body_type, BodyType::Dynamic);
        match &ball.collider {
            Some(ColliderDescription::Circle(c)) => {
                assert_eq!(c.radius, 0.5);
                assert_eq!(c.friction, 0.2);
                assert_eq!(c.density, 1.0);
            }
            other => panic!("unexpected collider {:?}", other),
        }
        assert!(scene.entities[2].body.is_none());
    }

    #[test]
    fn test_spawn_components() {
        let scene = SceneDescription::from_json_str(RAMP).unwrap();
        let mut world = World::new();
        let spawned = scene.spawn(&mut world);
        assert_eq!(spawned.len(), 3);

        let ramp = world.entity(spawned[0]);
        let t = ramp.get::<Transform>().unwrap();
        assert_eq!(t.angle(), -0.8);
        assert_eq!(ramp.get::<Node>().unwrap().color, [120, 90, 60, 255]);
        assert!(ramp.get::<RigidBody>().is_some());
        assert!(ramp.get::<BoxCollider>().is_some());

        let ball = world.entity(spawned[1]);
        assert!(ball.get::<CircleCollider>().is_some());
        assert!(ball.get::<BoxCollider>().is_none());

        let marker = world.entity(spawned[2]);
        assert!(marker.get::<RigidBody>().is_none());
        assert_eq!(marker.get::<Node>().unwrap().name(), "marker");
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = SceneDescription::from_json_str("{ entities: ").unwrap_err();
        assert!(matches!(err, SceneError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SceneDescription::load_file("./no/such/scene.json").unwrap_err();
        assert!(matches!(err, SceneError::Io(_)));
    }
}
