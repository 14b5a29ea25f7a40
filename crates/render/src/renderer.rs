use glam::{Vec2, Vec4, Vec4Swizzles};
use mascot_pose::RingStroke;
use mascot_scene::SceneGraph;

use crate::camera::OrbitCamera;
use crate::palette::Palette;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene graph and a camera, then produces output.
/// It never mutates the scene — the graph owns the truth.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene state and camera.
    fn render(&self, scene: &SceneGraph, camera: &OrbitCamera) -> Self::Output;
}

/// One stroked line in canvas units, origin at the canvas center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub from: Vec2,
    pub to: Vec2,
    pub color: [f32; 4],
    pub width: f32,
}

/// Radial mask punched over the scene: opaque inside `inner`, fading out
/// by `outer` (fractions of the surface width).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoleSpec {
    pub inner_radius_frac: f32,
    pub outer_radius_frac: f32,
}

impl Default for HoleSpec {
    fn default() -> Self {
        Self {
            inner_radius_frac: 0.2,
            outer_radius_frac: 0.35,
        }
    }
}

/// Vertical background gradient, top color to bottom color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientSpec {
    pub top: [f32; 4],
    pub bottom: [f32; 4],
}

/// Everything the host paints for one frame, in paint order: wireframe
/// segments, then the hole mask, then the background gradient, then the
/// ring overlay.
#[derive(Debug, Clone)]
pub struct FrameComposition {
    pub segments: Vec<LineSegment>,
    pub hole: HoleSpec,
    pub background: GradientSpec,
    pub rings: Vec<RingStroke>,
}

impl FrameComposition {
    pub fn compose(
        palette: &Palette,
        segments: Vec<LineSegment>,
        rings: Vec<RingStroke>,
    ) -> Self {
        let (top, bottom) = palette.background();
        Self {
            segments,
            hole: HoleSpec::default(),
            background: GradientSpec { top, bottom },
            rings,
        }
    }
}

/// Manual 3D-to-2D projection of the scene's wireframe shapes.
///
/// Per frame, per shape: world transform, then the camera's
/// view-projection, then a screen-space scale into canvas units. Segments
/// with a vertex behind the camera are skipped.
#[derive(Debug, Clone)]
pub struct Wireframe2dRenderer {
    /// Canvas units from center to edge (the canvas spans 100 units, so
    /// NDC maps through a factor of 50).
    pub screen_scale: f32,
    pub line_width: f32,
}

impl Default for Wireframe2dRenderer {
    fn default() -> Self {
        Self {
            screen_scale: 50.0,
            line_width: 0.5,
        }
    }
}

impl Wireframe2dRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn project(&self, clip: Vec4) -> Option<Vec2> {
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.xyz() / clip.w;
        // Canvas y grows downward.
        Some(Vec2::new(
            ndc.x * self.screen_scale,
            -ndc.y * self.screen_scale,
        ))
    }
}

impl Renderer for Wireframe2dRenderer {
    type Output = Vec<LineSegment>;

    fn render(&self, scene: &SceneGraph, camera: &OrbitCamera) -> Vec<LineSegment> {
        let view_proj = camera.view_projection();
        let mut segments = Vec::new();

        for (_, shape, global) in scene.shapes() {
            let Some(wireframe) = shape.geometry.build_wireframe() else {
                continue;
            };
            let clip_space: Vec<Vec4> = wireframe
                .vertices
                .iter()
                .map(|v| view_proj * global * v.extend(1.0))
                .collect();

            for [a, b] in &wireframe.edges {
                let (Some(from), Some(to)) = (
                    self.project(clip_space[*a as usize]),
                    self.project(clip_space[*b as usize]),
                ) else {
                    continue;
                };
                segments.push(LineSegment {
                    from,
                    to,
                    color: shape.material.base_color,
                    width: self.line_width,
                });
            }
        }
        segments
    }
}

/// Text renderer: a human-readable scene summary.
///
/// Useful for CLI output, logging, and testing the render interface
/// without a GPU.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &SceneGraph, camera: &OrbitCamera) -> String {
        let mut out = String::new();
        let eye = camera.eye();
        out.push_str(&format!(
            "=== Scene ({} nodes, {} shapes) ===\n",
            scene.node_count(),
            scene.shape_count()
        ));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) azimuth={:.2} elevation={:.2} distance={:.1}\n",
            eye.x, eye.y, eye.z, camera.azimuth, camera.elevation, camera.distance
        ));
        for (id, shape, global) in scene.shapes() {
            let p = global.transform_point3(glam::Vec3::ZERO);
            let name = scene.name(id).filter(|n| !n.is_empty()).unwrap_or("-");
            out.push_str(&format!(
                "  [{name}] {:?} pos=({:.2}, {:.2}, {:.2})\n",
                shape.geometry.topology(),
                p.x,
                p.y,
                p.z
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mascot_common::Transform;
    use mascot_geometry::{GeometryDesc, Material};
    use mascot_pose::RingField;
    use mascot_scene::{SceneGraphBuilder, ShapeDesc};
    use crate::palette::PALETTES;

    fn wireframe_scene(count: usize) -> SceneGraph {
        let mut builder = SceneGraphBuilder::new();
        let root = builder.group(None, "root", Transform::default()).unwrap();
        for i in 0..count {
            builder
                .shape(
                    Some(root),
                    format!("tetra_{i}"),
                    Transform::from_position(glam::Vec3::new(i as f32, 0.0, 0.0)),
                    ShapeDesc {
                        geometry: GeometryDesc::TetrahedronWireframe,
                        material: Material::colored([1.0, 0.0, 1.0, 1.0]),
                    },
                )
                .unwrap();
        }
        let mut graph = builder.build().unwrap();
        graph.propagate();
        graph
    }

    #[test]
    fn each_visible_tetrahedron_strokes_six_edges() {
        let scene = wireframe_scene(3);
        let renderer = Wireframe2dRenderer::new();
        let camera = OrbitCamera::default();
        let segments = renderer.render(&scene, &camera);
        assert_eq!(segments.len(), 3 * 6);
    }

    #[test]
    fn segments_carry_material_color() {
        let scene = wireframe_scene(1);
        let segments = Wireframe2dRenderer::new().render(&scene, &OrbitCamera::default());
        assert!(segments.iter().all(|s| s.color == [1.0, 0.0, 1.0, 1.0]));
    }

    #[test]
    fn solid_shapes_do_not_stroke() {
        let mut builder = SceneGraphBuilder::new();
        builder
            .shape(
                None,
                "ball",
                Transform::default(),
                ShapeDesc {
                    geometry: GeometryDesc::Sphere {
                        radius: 1.0,
                        segments: 8,
                    },
                    material: Material::default(),
                },
            )
            .unwrap();
        let mut scene = builder.build().unwrap();
        scene.propagate();
        let segments = Wireframe2dRenderer::new().render(&scene, &OrbitCamera::default());
        assert!(segments.is_empty());
    }

    #[test]
    fn vertices_behind_the_camera_are_skipped() {
        let mut builder = SceneGraphBuilder::new();
        // Far beyond the camera eye (default distance 15 along +Z).
        builder
            .shape(
                None,
                "behind",
                Transform::from_position(glam::Vec3::new(0.0, 0.0, 100.0)),
                ShapeDesc {
                    geometry: GeometryDesc::TetrahedronWireframe,
                    material: Material::default(),
                },
            )
            .unwrap();
        let mut scene = builder.build().unwrap();
        scene.propagate();
        let segments = Wireframe2dRenderer::new().render(&scene, &OrbitCamera::default());
        assert!(segments.is_empty());
    }

    #[test]
    fn composition_orders_layers_from_palette() {
        let scene = wireframe_scene(1);
        let segments = Wireframe2dRenderer::new().render(&scene, &OrbitCamera::default());
        let rings = RingField::new(&PALETTES[0].colors, 1).strokes(0.0);
        let frame = FrameComposition::compose(&PALETTES[0], segments, rings);
        assert_eq!(frame.background.top, PALETTES[0].colors[0]);
        assert_eq!(frame.background.bottom, PALETTES[0].colors[4]);
        assert_eq!(frame.rings.len(), 25);
        assert!(frame.hole.inner_radius_frac < frame.hole.outer_radius_frac);
    }

    #[test]
    fn debug_renderer_reports_counts() {
        let scene = wireframe_scene(2);
        let out = DebugTextRenderer::new().render(&scene, &OrbitCamera::default());
        assert!(out.contains("2 shapes"));
        assert!(out.contains("tetra_0"));
    }
}
