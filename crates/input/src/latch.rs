use serde::{Deserialize, Serialize};

use crate::frame::InputFrame;

/// Raw held state of every key the simulation cares about, as sampled by a host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub shift: bool,
    pub toggle: bool,
}

/// Converts successive [`HeldKeys`] samples into [`InputFrame`]s.
///
/// Edges are derived from the previous sample, so holding a key for many
/// ticks produces exactly one press edge and one release edge.
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    prev: HeldKeys,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the frame for this tick and remember `held` for the next one.
    pub fn next(&mut self, held: HeldKeys) -> InputFrame {
        let prev = std::mem::replace(&mut self.prev, held);
        let frame = InputFrame {
            left: held.left,
            right: held.right,
            jump_held: held.jump,
            jump_pressed: held.jump && !prev.jump,
            jump_released: !held.jump && prev.jump,
            shift_held: held.shift,
            shift_pressed: held.shift && !prev.shift,
            mode_toggle_presses: u8::from(held.toggle && !prev.toggle),
        };
        if frame.jump_pressed || frame.jump_released || frame.shift_pressed {
            tracing::trace!(?frame, "input edge");
        }
        frame
    }

    /// Forget the previous sample, e.g. after a level restart.
    pub fn reset(&mut self) {
        self.prev = HeldKeys::default();
    }
}
