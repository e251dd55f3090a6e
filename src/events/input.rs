//! Input action events.
//!
//! This module defines [`InputEvent`], triggered when a gameplay-relevant key
//! is pressed. Listeners registered as observers receive it synchronously,
//! in the same frame, without reading keyboard state themselves.

use bevy_ecs::prelude::*;

/// Enumeration of logical input actions.
///
/// These abstract the physical keys into gameplay-meaningful actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Leave the game (default: Escape).
    Quit,
    /// Default: W / Up arrow.
    Forward,
    /// Reverse or brake (default: S / Down arrow).
    Backwards,
    /// Drive to the left (default: A / Left arrow).
    Left,
    /// Drive to the right (default: D / Right arrow).
    Right,
}

/// Event emitted when an input action is pressed.
#[derive(Event, Debug, Clone, Copy)]
pub struct InputEvent {
    pub action: InputAction,
}
