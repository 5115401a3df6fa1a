use std::collections::HashSet;

use super::types::Key;

/// Per-frame input deltas; cleared by the runtime after each frame.
///
/// `InputState` holds what is currently down; this holds what changed.
#[derive(Debug, Default)]
pub struct InputFrame {
    pub keys_pressed: HashSet<Key>,

    /// Accumulated pointer motion this frame, in logical pixels.
    pub pointer_delta: (f32, f32),
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.pointer_delta = (0.0, 0.0);
    }

    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }
}
