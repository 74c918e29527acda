//! Player Motion Controller.
//!
//! Turns per-tick [`chrono_input::InputFrame`]s into player movement through
//! the collision world:
//!
//! - acceleration-based horizontal movement with symmetric deceleration
//! - constant gravity, suppressed only while the shift sub-mode is active
//! - instant or charged jumps, selected by [`JumpModel`]
//! - a time-boxed airborne shift sub-mode with a ground-reset cooldown
//!
//! # Invariants
//! - Velocity components never exceed the configured maxima after a tick.
//! - The motion state is derived from velocity, ground contact and the
//!   shift flag; it cannot be set directly.
//! - At most one grounded jump fires per ground contact.

mod config;
mod controller;
mod jump;
mod shift;
mod state;

pub use config::{ConfigError, JumpModel, MotionConfig, ShiftConfig};
pub use controller::PlayerController;
pub use jump::JumpState;
pub use shift::ShiftState;
pub use state::{Facing, MotionState, PlayerState};

pub fn crate_info() -> &'static str {
    "chrono-motion v0.1.0"
}
