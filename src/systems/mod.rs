//! Game systems.
//!
//! Submodules overview
//! - [`camera`] – keep following cameras over their targets
//! - [`input`] – read hardware input and trigger input events (`render` only)
//! - [`physics`] – create bodies, step the world, sync transforms, forward
//!   sensor entries
//! - [`render`] – draw the scene and debug overlays using Raylib (`render` only)
//! - [`time`] – update simulation time and delta

pub mod camera;
#[cfg(feature = "render")]
pub mod input;
pub mod physics;
#[cfg(feature = "render")]
pub mod render;
pub mod time;
