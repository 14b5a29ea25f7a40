//! Scene graph: a tree of renderable nodes with parent-relative transforms.
//!
//! # Invariants
//! - Structure (which nodes exist, parent/child links) is fixed at build
//!   time; only per-node transforms and material parameters mutate.
//! - Node indices are topologically ordered: a parent always precedes its
//!   children, so one forward pass propagates global transforms.

pub mod graph;

pub use graph::{NodeId, SceneError, SceneGraph, SceneGraphBuilder, ShapeDesc};

pub fn crate_info() -> &'static str {
    "mascot-scene v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scene"));
    }
}
