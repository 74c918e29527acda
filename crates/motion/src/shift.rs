use chrono_input::InputFrame;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::ShiftConfig;

/// Airborne shift sub-mode.
///
/// Entered on a shift press while airborne and off cooldown. Ends when the
/// key is released, when the duration runs out, or on landing. Re-entry is
/// blocked until the player touches ground again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftState {
    active: bool,
    remaining_ms: u32,
    can_enter: bool,
    reach_offset: Vec2,
}

impl Default for ShiftState {
    fn default() -> Self {
        Self {
            active: false,
            remaining_ms: 0,
            can_enter: true,
            reach_offset: Vec2::ZERO,
        }
    }
}

impl ShiftState {
    pub fn new(config: &ShiftConfig) -> Self {
        Self {
            reach_offset: config.reach_neutral,
            ..Self::default()
        }
    }

    /// Advance one tick using the ground contact from the previous tick.
    pub fn update(&mut self, config: &ShiftConfig, input: &InputFrame, grounded: bool, dt_ms: u32) {
        if !config.enabled {
            self.active = false;
            self.reach_offset = config.reach_neutral;
            return;
        }

        if grounded {
            if self.active {
                tracing::debug!("shift ended on landing");
            }
            self.active = false;
            self.can_enter = true;
        }

        if self.active {
            self.remaining_ms = self.remaining_ms.saturating_sub(dt_ms);
            if self.remaining_ms == 0 || !input.shift_held {
                tracing::debug!(expired = self.remaining_ms == 0, "shift ended");
                self.active = false;
            }
        }

        if input.shift_pressed && !self.active && !grounded && self.can_enter {
            tracing::debug!(duration_ms = config.duration_ms, "shift entered");
            self.active = true;
            self.can_enter = false;
            self.remaining_ms = config.duration_ms;
        }

        self.reach_offset = if self.active {
            match input.horizontal() {
                -1 => config.reach_left,
                1 => config.reach_right,
                _ => config.reach_neutral,
            }
        } else {
            config.reach_neutral
        };
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether a shift press would be accepted once airborne.
    pub fn can_enter(&self) -> bool {
        self.can_enter
    }

    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }

    /// Hook anchor relative to the player's top-left corner.
    pub fn reach_offset(&self) -> Vec2 {
        self.reach_offset
    }

    pub fn reset(&mut self, config: &ShiftConfig) {
        *self = Self::new(config);
    }
}
