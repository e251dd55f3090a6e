//! ECS resources made available to systems.
//!
//! Overview
//! - `camera2d` – shared raylib camera used by the render pass (`render` only)
//! - `carcontrols` – wheel handles and drive speed of the player car
//! - `debugmode` – presence toggles optional debug overlays and logs
//! - `gameconfig` – window, physics and car settings loaded from INI
//! - `input` – per-frame keyboard state of keys relevant to the game (`render` only)
//! - `kernelstate` – run flag of the frame loop
//! - `physicsworld` – the Rapier world, body bookkeeping and joint helpers
//! - `racestate` – whether the finish line was reached
//! - `screensize` – current framebuffer dimensions in pixels
//! - `worldtime` – simulation time and delta
#[cfg(feature = "render")]
pub mod camera2d;
pub mod carcontrols;
pub mod debugmode;
pub mod gameconfig;
#[cfg(feature = "render")]
pub mod input;
pub mod kernelstate;
pub mod physicsworld;
pub mod racestate;
pub mod screensize;
pub mod worldtime;
