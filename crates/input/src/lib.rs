//! Input normalization: raw pixel, touch, and tilt events mapped to one
//! shared normalized pointer state.
//!
//! # Invariants
//! - Pose code consumes [`PointerState`], never raw events.
//! - Last write wins; writer and reader share one thread, no locking.

pub mod pointer;

pub use pointer::{DragTracker, PointerState};

pub fn crate_info() -> &'static str {
    "mascot-input v0.1.0"
}
