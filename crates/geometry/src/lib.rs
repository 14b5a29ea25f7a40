//! Procedural geometry: simple solids, wireframe shapes, particle clouds.
//!
//! Everything here is constructed once at mount time and static afterward;
//! animation happens in node transforms, never in vertex data.

pub mod desc;
pub mod mesh;
pub mod particles;
pub mod wireframe;

pub use desc::{GeometryDesc, Material, Topology};
pub use mesh::Mesh;
pub use particles::particle_cloud;
pub use wireframe::{tetrahedron_wireframe, Wireframe};

pub fn crate_info() -> &'static str {
    "mascot-geometry v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("geometry"));
    }
}
