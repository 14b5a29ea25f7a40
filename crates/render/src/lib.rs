//! Renderer-agnostic rendering interface.
//!
//! The scene graph owns the truth; renderers read it and produce output,
//! never mutating it. The 2D variant projects wireframe vertices to screen
//! space itself and hands the host a paint-ordered draw list.

pub mod camera;
pub mod palette;
pub mod renderer;

pub use camera::{OrbitCamera, ResumePolicy};
pub use palette::{palette_index_for_click, Palette, PaletteError, PALETTES};
pub use renderer::{
    DebugTextRenderer, FrameComposition, GradientSpec, HoleSpec, LineSegment, Renderer,
    Wireframe2dRenderer,
};

pub fn crate_info() -> &'static str {
    "mascot-render v0.1.0"
}
