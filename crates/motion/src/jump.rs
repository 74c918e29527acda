//! Jump state machine.
//!
//! Tracks whether a grounded jump is still armed for the current ground
//! contact and, for the charged model, the speed accumulated while the jump
//! input is held. The charge timer is a countdown advanced once per tick.

use chrono_input::InputFrame;
use serde::{Deserialize, Serialize};

use crate::config::JumpModel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpState {
    /// A grounded jump may still fire for the current ground contact.
    armed: bool,
    /// Charged model: speed that a release would launch with.
    charge_speed: f32,
    /// Charged model: time held since the last increment (ms).
    charge_elapsed_ms: u32,
}

impl Default for JumpState {
    fn default() -> Self {
        Self {
            armed: true,
            charge_speed: 0.0,
            charge_elapsed_ms: 0,
        }
    }
}

impl JumpState {
    /// Fresh state for the given model, charge at its minimum.
    pub fn new(model: &JumpModel) -> Self {
        let mut state = Self::default();
        state.reset(model);
        state
    }

    /// Advance one tick. Returns the upward speed to launch with, if a jump fires.
    pub fn update(
        &mut self,
        model: &JumpModel,
        input: &InputFrame,
        grounded: bool,
        dt_ms: u32,
    ) -> Option<f32> {
        match *model {
            JumpModel::Instant { speed } => {
                if input.jump_pressed && grounded && self.armed {
                    self.armed = false;
                    return Some(speed);
                }
                None
            }
            JumpModel::Charged {
                min_speed,
                max_speed,
                increment,
                cadence_ms,
            } => {
                if input.jump_held {
                    self.charge_elapsed_ms = self.charge_elapsed_ms.saturating_add(dt_ms);
                    while self.charge_elapsed_ms >= cadence_ms.max(1) {
                        self.charge_elapsed_ms -= cadence_ms.max(1);
                        if self.charge_speed < max_speed {
                            self.charge_speed = (self.charge_speed + increment).min(max_speed);
                        }
                    }
                } else {
                    self.charge_elapsed_ms = 0;
                }

                if !input.jump_released {
                    return None;
                }
                let speed = self.charge_speed;
                self.charge_speed = min_speed;
                self.charge_elapsed_ms = 0;
                if grounded && self.armed && speed > 0.0 {
                    self.armed = false;
                    return Some(speed);
                }
                None
            }
        }
    }

    /// Re-arm after the tick's collision result. Only ground contact arms.
    pub fn touch_ground(&mut self, grounded: bool) {
        if grounded {
            self.armed = true;
        }
    }

    /// Clear all charge and re-arm, e.g. on respawn.
    pub fn reset(&mut self, model: &JumpModel) {
        self.armed = true;
        self.charge_elapsed_ms = 0;
        self.charge_speed = match *model {
            JumpModel::Instant { .. } => 0.0,
            JumpModel::Charged { min_speed, .. } => min_speed,
        };
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Speed a release would launch with right now (charged model).
    pub fn charge_speed(&self) -> f32 {
        self.charge_speed
    }
}
