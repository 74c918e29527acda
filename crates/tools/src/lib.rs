//! Developer tooling: session inspector, frame dumps, ASCII level view.
//!
//! # Invariants
//! - Tools only read a [`chrono_kernel::Session`]; nothing here mutates it.

pub mod inspector;
pub mod view;

pub use inspector::{SessionInspector, SessionSummary};
pub use view::ascii_view;

pub fn crate_info() -> &'static str {
    "chrono-tools v0.1.0"
}
