//! wgpu rendering backend for the mascot scene graph.
//!
//! Geometry is uploaded once at construction (the scene structure never
//! changes); per-frame work is one instance-buffer write per draw plus the
//! camera uniform.

mod gpu;
mod shaders;

pub use gpu::WgpuSceneRenderer;
