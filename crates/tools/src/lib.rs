//! Developer tooling: scene and pose inspectors.
//!
//! # Invariants
//! - Inspectors are read-only; they never mutate what they report on.

pub mod inspector;

pub use inspector::{PoseInspector, PoseReadout, SceneInspector, SceneSummary};

pub fn crate_info() -> &'static str {
    "mascot-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
