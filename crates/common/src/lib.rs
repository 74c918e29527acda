//! Shared value types used across the chrono-switch crates.
//!
//! # Invariants
//! - World space is 2D with the y axis pointing down.
//! - `Rect` positions are the top-left corner; sizes are never negative.

pub mod types;

pub use types::{LayerId, Rect, TemporalMode};

pub fn crate_info() -> &'static str {
    "chrono-common v0.1.0"
}
