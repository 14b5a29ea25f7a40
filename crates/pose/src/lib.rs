//! Per-frame pose computation: the mapping from (time, pointer, flags) to
//! node transforms.
//!
//! # Invariants
//! - Pose updates are additive oscillation + smoothed pointer offset, with
//!   every pointer-driven rotation channel explicitly clamped.
//! - Moods are multipliers, not guarded states; the last one set wins.
//! - Time is the caller's clamped elapsed time; nothing here integrates
//!   velocities, so a paused window resumes without jumps.

pub mod avatar;
pub mod field;
pub mod rings;

pub use avatar::{AvatarFlags, AvatarPose, AvatarRig, Mood};
pub use field::ShapeField;
pub use rings::{RingField, RingStroke};

pub fn crate_info() -> &'static str {
    "mascot-pose v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("pose"));
    }
}
