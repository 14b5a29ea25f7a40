//! Shared types: spatial transform, smoothing/clamping helpers, seeded RNG.
//!
//! # Invariants
//! - All procedural randomness flows through `SeededRng` for reproducibility.
//! - Smoothing factors are per-frame fractions, never per-second rates.

pub mod math;
pub mod rng;
pub mod types;

pub use math::{clamp_abs, lerp, lerp_angle};
pub use rng::{splitmix64, SeededRng};
pub use types::Transform;
