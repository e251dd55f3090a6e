//! Per-frame keyboard input resource.
//!
//! Captures the keys the driving scene cares about and exposes them to
//! systems via the [`InputState`] resource. Each logical action has a primary
//! binding (WASD, Escape) and an alternate one (arrow keys, Q).
use bevy_ecs::prelude::*;
use raylib::prelude::*;

use crate::events::input::InputAction;

#[derive(Debug, Clone, Copy)]
/// Boolean key state with its keyboard bindings.
pub struct BoolState {
    /// Whether a bound key is currently held this frame.
    pub active: bool,
    /// Whether a bound key was just pressed this frame.
    pub just_pressed: bool,

    pub key_binding: KeyboardKey,
    pub alt_binding: KeyboardKey,
}

impl BoolState {
    fn bound(key_binding: KeyboardKey, alt_binding: KeyboardKey) -> Self {
        Self {
            active: false,
            just_pressed: false,
            key_binding,
            alt_binding,
        }
    }
}

impl Default for BoolState {
    fn default() -> Self {
        Self::bound(KeyboardKey::KEY_NULL, KeyboardKey::KEY_NULL)
    }
}

/// Resource capturing the per-frame keyboard state relevant to driving.
#[derive(Resource, Debug, Clone)]
pub struct InputState {
    pub quit: BoolState,
    pub forward: BoolState,
    pub backwards: BoolState,
    pub left: BoolState,
    pub right: BoolState,
    pub mode_debug: BoolState,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            quit: BoolState::bound(KeyboardKey::KEY_ESCAPE, KeyboardKey::KEY_Q),
            forward: BoolState::bound(KeyboardKey::KEY_W, KeyboardKey::KEY_UP),
            backwards: BoolState::bound(KeyboardKey::KEY_S, KeyboardKey::KEY_DOWN),
            left: BoolState::bound(KeyboardKey::KEY_A, KeyboardKey::KEY_LEFT),
            right: BoolState::bound(KeyboardKey::KEY_D, KeyboardKey::KEY_RIGHT),
            mode_debug: BoolState::bound(KeyboardKey::KEY_F11, KeyboardKey::KEY_NULL),
        }
    }
}

impl InputState {
    /// Key states paired with the action they emit.
    pub fn actions_mut(&mut self) -> [(InputAction, &mut BoolState); 5] {
        [
            (InputAction::Quit, &mut self.quit),
            (InputAction::Forward, &mut self.forward),
            (InputAction::Backwards, &mut self.backwards),
            (InputAction::Left, &mut self.left),
            (InputAction::Right, &mut self.right),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolstate_default() {
        let bs = BoolState::default();
        assert!(!bs.active);
        assert!(!bs.just_pressed);
        assert_eq!(bs.key_binding, KeyboardKey::KEY_NULL);
    }

    #[test]
    fn test_inputstate_default_key_bindings() {
        let input = InputState::default();
        assert_eq!(input.quit.key_binding, KeyboardKey::KEY_ESCAPE);
        assert_eq!(input.forward.key_binding, KeyboardKey::KEY_W);
        assert_eq!(input.backwards.alt_binding, KeyboardKey::KEY_DOWN);
        assert_eq!(input.left.alt_binding, KeyboardKey::KEY_LEFT);
        assert_eq!(input.right.key_binding, KeyboardKey::KEY_D);
        assert_eq!(input.mode_debug.key_binding, KeyboardKey::KEY_F11);
    }
}
