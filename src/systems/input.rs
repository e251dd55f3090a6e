//! Input systems.
//!
//! - [`update_input_state`] reads hardware input from Raylib each frame and
//!   writes the results into [`crate::resources::input::InputState`].
//! - Newly pressed actions are triggered as [`InputEvent`]s so the game's
//!   listeners react in the same frame. F11 toggles debug mode via
//!   [`SwitchDebugEvent`].
use bevy_ecs::prelude::*;
use raylib::ffi::KeyboardKey;

use crate::events::input::InputEvent;
use crate::events::switchdebug::SwitchDebugEvent;
use crate::resources::input::InputState;

/// Poll Raylib for keyboard input and update the `InputState` resource.
pub fn update_input_state(
    mut input: ResMut<InputState>,
    rl: NonSend<raylib::RaylibHandle>,
    mut commands: Commands,
) {
    let is_key_down = |key: KeyboardKey| key != KeyboardKey::KEY_NULL && rl.is_key_down(key);
    let is_key_pressed =
        |key: KeyboardKey| key != KeyboardKey::KEY_NULL && rl.is_key_pressed(key);

    for (action, state) in input.actions_mut() {
        state.active = is_key_down(state.key_binding) || is_key_down(state.alt_binding);
        state.just_pressed =
            is_key_pressed(state.key_binding) || is_key_pressed(state.alt_binding);
        if state.just_pressed {
            commands.trigger(InputEvent { action });
        }
    }

    input.mode_debug.active = is_key_down(input.mode_debug.key_binding);
    input.mode_debug.just_pressed = is_key_pressed(input.mode_debug.key_binding);
    if input.mode_debug.just_pressed {
        commands.trigger(SwitchDebugEvent {});
    }
}
