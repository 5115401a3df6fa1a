use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState, MouseButton, MouseButtonState};

/// Current input state for the window.
#[derive(Debug, Default)]
pub struct InputState {
    pub focused: bool,

    /// Pointer position in logical pixels; `None` while outside the window.
    pub pointer_pos: Option<(f32, f32)>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies an event to the held state and records transitions into `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::Focused(f) => {
                self.focused = f;
                if !f {
                    // Releases are not delivered while unfocused.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved { x, y } => {
                if let Some((px, py)) = self.pointer_pos {
                    frame.pointer_delta.0 += x - px;
                    frame.pointer_delta.1 += y - py;
                }
                self.pointer_pos = Some((x, y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(key) {
                        frame.keys_pressed.insert(key);
                    }
                }
                KeyState::Released => {
                    self.keys_down.remove(&key);
                }
            },

            InputEvent::PointerButton { button, state } => match state {
                MouseButtonState::Pressed => {
                    self.buttons_down.insert(button);
                }
                MouseButtonState::Released => {
                    self.buttons_down.remove(&button);
                }
            },
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved { x, y }
    }

    #[test]
    fn pointer_delta_accumulates_from_the_first_known_position() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, moved(10.0, 10.0));
        assert_eq!(frame.pointer_delta, (0.0, 0.0));

        state.apply_event(&mut frame, moved(14.0, 7.0));
        state.apply_event(&mut frame, moved(15.0, 9.0));
        assert_eq!(frame.pointer_delta, (5.0, -1.0));

        frame.clear();
        assert_eq!(frame.pointer_delta, (0.0, 0.0));
    }

    #[test]
    fn held_key_reports_one_press_transition() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        let press = InputEvent::Key {
            key: Key::Digit1,
            state: KeyState::Pressed,
            repeat: false,
        };

        state.apply_event(&mut frame, press);
        state.apply_event(
            &mut frame,
            InputEvent::Key {
                key: Key::Digit1,
                state: KeyState::Pressed,
                repeat: true,
            },
        );

        assert!(state.key_down(Key::Digit1));
        assert_eq!(frame.keys_pressed.len(), 1);
        assert!(frame.key_pressed(Key::Digit1));

        frame.clear();
        state.apply_event(
            &mut frame,
            InputEvent::Key {
                key: Key::Digit1,
                state: KeyState::Released,
                repeat: false,
            },
        );
        assert!(!state.key_down(Key::Digit1));
        assert!(!frame.key_pressed(Key::Digit1));
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(
            &mut frame,
            InputEvent::PointerButton {
                button: MouseButton::Left,
                state: MouseButtonState::Pressed,
            },
        );
        assert!(state.button_down(MouseButton::Left));

        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(!state.button_down(MouseButton::Left));
    }
}
