//! Render-loop driver: clamped per-frame deltas and loop lifecycle.
//!
//! # Invariants
//! - Elapsed time is the sum of clamped deltas and never decreases.
//! - A stopped loop produces no frames; stopping is idempotent.
//! - A missing render surface is a no-op, never an error.

mod clock;
mod timer;

pub use clock::{FrameClock, FrameLoop, FrameTick};
pub use timer::FrameTimer;

pub fn crate_info() -> &'static str {
    "mascot-frame v0.1.0"
}
