use serde::{Deserialize, Serialize};

use crate::mesh::{self, Mesh};
use crate::particles::particle_cloud;
use crate::wireframe::{tetrahedron_wireframe, Wireframe};

/// How a geometry is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Triangles,
    Lines,
    Points,
}

/// Description of a procedural geometry, as plain data.
///
/// Segment counts are requests; generators clamp them to sane minimums
/// rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeometryDesc {
    Sphere {
        radius: f32,
        segments: u32,
    },
    /// Upper part of a sphere, swept from the pole down by
    /// `sweep` * pi (a full sphere would be sweep = 1.0).
    Dome {
        radius: f32,
        segments: u32,
        sweep: f32,
    },
    Capsule {
        radius: f32,
        half_height: f32,
        segments: u32,
    },
    Cone {
        radius: f32,
        height: f32,
        segments: u32,
    },
    Cylinder {
        radius: f32,
        height: f32,
        segments: u32,
    },
    Torus {
        radius: f32,
        tube_radius: f32,
        segments: u32,
        tube_segments: u32,
    },
    Box {
        half_extents: [f32; 3],
    },
    /// Flat disc in the XY plane, facing +Z.
    Disc {
        radius: f32,
        segments: u32,
    },
    /// The four-vertex wireframe solid from the ambient shape field.
    TetrahedronWireframe,
    /// Deterministic point scatter in a cube of the given half extent.
    ParticleCloud {
        count: u32,
        half_extent: f32,
        seed: u64,
    },
}

impl GeometryDesc {
    pub fn topology(&self) -> Topology {
        match self {
            Self::TetrahedronWireframe => Topology::Lines,
            Self::ParticleCloud { .. } => Topology::Points,
            _ => Topology::Triangles,
        }
    }

    /// Build the triangle mesh for solid variants; `None` for wireframe
    /// and particle geometries.
    pub fn build_mesh(&self) -> Option<Mesh> {
        match *self {
            Self::Sphere { radius, segments } => Some(mesh::sphere(radius, segments)),
            Self::Dome {
                radius,
                segments,
                sweep,
            } => Some(mesh::dome(radius, segments, sweep)),
            Self::Capsule {
                radius,
                half_height,
                segments,
            } => Some(mesh::capsule(radius, half_height, segments)),
            Self::Cone {
                radius,
                height,
                segments,
            } => Some(mesh::cone(radius, height, segments)),
            Self::Cylinder {
                radius,
                height,
                segments,
            } => Some(mesh::cylinder(radius, height, segments)),
            Self::Torus {
                radius,
                tube_radius,
                segments,
                tube_segments,
            } => Some(mesh::torus(radius, tube_radius, segments, tube_segments)),
            Self::Box { half_extents } => Some(mesh::cuboid(half_extents)),
            Self::Disc { radius, segments } => Some(mesh::disc(radius, segments)),
            Self::TetrahedronWireframe | Self::ParticleCloud { .. } => None,
        }
    }

    /// Wireframe data, for line-topology variants.
    pub fn build_wireframe(&self) -> Option<Wireframe> {
        match self {
            Self::TetrahedronWireframe => Some(tetrahedron_wireframe()),
            _ => None,
        }
    }

    /// Scatter points, for particle variants.
    pub fn build_particles(&self) -> Option<Vec<glam::Vec3>> {
        match *self {
            Self::ParticleCloud {
                count,
                half_extent,
                seed,
            } => Some(particle_cloud(count, half_extent, seed)),
            _ => None,
        }
    }
}

/// Surface parameters, renderer-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// RGBA, linear, 0..1.
    pub base_color: [f32; 4],
    /// Self-illumination added on top of lighting.
    pub emissive: f32,
    pub roughness: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: [0.8, 0.8, 0.8, 1.0],
            emissive: 0.0,
            roughness: 0.5,
        }
    }
}

impl Material {
    pub fn colored(base_color: [f32; 4]) -> Self {
        Self {
            base_color,
            ..Self::default()
        }
    }
}
