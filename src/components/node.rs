//! Named, drawable scene node.
//!
//! Every visible entity carries a [`Node`] with a unique-ish name (used for
//! lookups and logs) and the colour its collider outline is drawn with.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

#[derive(Component, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    /// RGBA.
    #[serde(default = "default_color")]
    pub color: [u8; 4],
}

fn default_color() -> [u8; 4] {
    [200, 200, 200, 255]
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: default_color(),
        }
    }

    pub fn with_color(mut self, color: [u8; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
