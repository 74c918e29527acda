//! Input: already-debounced per-tick signals consumed by the simulation.
//!
//! # Invariants
//! - The simulation consumes [`InputFrame`]s, never raw device events.
//! - An edge is reported in exactly one frame per physical press or release.

mod frame;
mod latch;

pub use frame::InputFrame;
pub use latch::{HeldKeys, InputLatch};

pub fn crate_info() -> &'static str {
    "chrono-input v0.1.0"
}
