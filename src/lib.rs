//! Terrain car library.
//!
//! A motorized car driving over static terrain, simulated with Rapier and
//! organised as bevy ECS components, resources, systems and events. The
//! library is what the binary and the integration tests build on.

pub mod components;
pub mod error;
pub mod events;
pub mod game;
pub mod kernel;
pub mod resources;
pub mod scene;
pub mod systems;
