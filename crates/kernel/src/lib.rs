//! Gameplay kernel: the fixed-tick simulation of one level.
//!
//! Per tick, in order: mode toggles, player motion and collision, hazard
//! check (respawn short-circuits the rest of the tick), checkpoint claim.
//! The result is a [`FrameSnapshot`] for hosts to render and play audio from.
//!
//! # Invariants
//! - Exactly one temporal mode is active; the active layer set is a pure
//!   function of it, so a toggle commits in a single assignment.
//! - The player rectangle never overlaps a solid cell of the active set
//!   once a tick completes.
//! - A consumed checkpoint never returns to the pending set, and
//!   `LevelCompleted` is emitted at most once per session.
//! - Hosts only read snapshots; all mutation flows through [`Session::step`].

pub mod checkpoint;
pub mod config;
pub mod event;
pub mod level;
pub mod respawn;
pub mod session;
pub mod temporal;

pub use checkpoint::{Checkpoint, CheckpointRef, CheckpointRegistry};
pub use config::{CheckpointConfig, SessionConfig, SessionError, TemporalConfig};
pub use event::{FrameEvent, FrameSnapshot};
pub use level::{LayerDef, LayerRole, Level, LevelDef, LevelError, ModeRoles};
pub use respawn::{Respawn, RespawnCoordinator};
pub use session::Session;
pub use temporal::TemporalController;

pub fn crate_info() -> &'static str {
    "chrono-kernel v0.1.0"
}
