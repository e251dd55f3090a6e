//! Event types and observers.
//!
//! Submodules:
//! - [`input`] – logical input actions triggered on key press
//! - [`switchdebug`] – toggle debug rendering and diagnostics on/off
//! - [`trigger`] – an entity entered a sensor collider
pub mod input;
pub mod switchdebug;
pub mod trigger;
