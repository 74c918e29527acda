//! Collision World Model: named grid layers queried by set membership.
//!
//! # Invariants
//! - Layers are immutable once registered.
//! - The model has no notion of a "current mode"; callers pass the
//!   active [`LayerSelection`] with every query.
//! - After [`CollisionWorld::resolve_collision`] the rectangle does not
//!   overlap a solid cell of the selection.

mod layer;
mod world;

pub use layer::{Cell, CellCoord, CollisionLayer, LayerError, OVERLAP_EPSILON};
pub use world::{CollisionWorld, ContactFlags, HazardContact, LayerSelection, Resolution};

pub fn crate_info() -> &'static str {
    "chrono-collision v0.1.0"
}
