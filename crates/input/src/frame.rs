use serde::{Deserialize, Serialize};

/// Input signals for one simulation tick.
///
/// Level-triggered fields describe what is held during the tick;
/// edge-triggered fields fire only on the tick the transition happened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFrame {
    pub left: bool,
    pub right: bool,
    pub jump_held: bool,
    pub jump_pressed: bool,
    pub jump_released: bool,
    pub shift_held: bool,
    pub shift_pressed: bool,
    /// Number of mode-toggle presses since the previous tick.
    pub mode_toggle_presses: u8,
}

impl InputFrame {
    /// Net horizontal direction: -1, 0 or 1. Both directions held cancel out.
    pub fn horizontal(&self) -> i8 {
        match (self.left, self.right) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }

    /// Frame with only the given direction held.
    pub fn holding_left() -> Self {
        Self {
            left: true,
            ..Self::default()
        }
    }

    pub fn holding_right() -> Self {
        Self {
            right: true,
            ..Self::default()
        }
    }

    /// Frame carrying a single mode-toggle edge.
    pub fn toggle() -> Self {
        Self {
            mode_toggle_presses: 1,
            ..Self::default()
        }
    }
}
