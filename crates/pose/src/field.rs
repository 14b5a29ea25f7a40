use glam::{EulerRot, Quat, Vec3};
use mascot_common::{SeededRng, Transform};
use mascot_geometry::{GeometryDesc, Material};
use mascot_scene::{NodeId, SceneError, SceneGraph, SceneGraphBuilder, ShapeDesc};

/// Palette slot the wireframe shapes stroke with.
const FIELD_PALETTE_SLOT: usize = 2;

#[derive(Debug, Clone)]
struct SpinShape {
    node: NodeId,
    /// Rotation at t = 0, radians per axis.
    init: Vec3,
    /// Angular rate, radians per second per axis.
    rate: Vec3,
}

/// Ambient field of spinning wireframe tetrahedra.
///
/// Placement and spin rates are rolled once from a seed; per-frame update
/// re-derives each rotation from absolute time (`init + rate * t`) instead
/// of integrating, so the field cannot drift under delta clamping.
#[derive(Debug)]
pub struct ShapeField {
    shapes: Vec<SpinShape>,
}

impl ShapeField {
    /// Scatter `count` shapes under `parent`.
    pub fn build(
        builder: &mut SceneGraphBuilder,
        parent: Option<NodeId>,
        count: usize,
        seed: u64,
    ) -> Result<Self, SceneError> {
        let mut rng = SeededRng::new(seed);
        let mut shapes = Vec::with_capacity(count);
        for i in 0..count {
            let init = Vec3::new(rng.next_f32(), rng.next_f32(), rng.next_f32())
                * std::f32::consts::TAU;
            let magnitude = (0.2 + rng.next_f32() * 0.2) * std::f32::consts::PI * rng.next_sign();
            let rate =
                Vec3::new(rng.next_f32(), rng.next_f32(), rng.next_f32()) * magnitude;
            let position = Vec3::new(
                rng.next_range(-0.5, 0.5),
                rng.next_range(-0.5, 0.5),
                rng.next_range(-0.5, 0.5),
            ) * 10.0;
            let scale = (rng.next_f32() * 0.5 + 0.5) * 1.5;

            let node = builder.shape(
                parent,
                format!("tetra_{i}"),
                Transform {
                    position,
                    rotation: Quat::from_euler(EulerRot::XYZ, init.x, init.y, init.z),
                    scale: Vec3::splat(scale),
                },
                ShapeDesc {
                    geometry: GeometryDesc::TetrahedronWireframe,
                    material: Material::default(),
                },
            )?;
            shapes.push(SpinShape { node, init, rate });
        }
        tracing::debug!(count, seed, "shape field built");
        Ok(Self { shapes })
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Set every shape's rotation for time `t`.
    pub fn update(&self, t: f32, graph: &mut SceneGraph) {
        for shape in &self.shapes {
            let angles = shape.init + shape.rate * t;
            if let Some(local) = graph.local_mut(shape.node) {
                local.rotation = Quat::from_euler(EulerRot::XYZ, angles.x, angles.y, angles.z);
            }
        }
    }

    /// Restroke every shape from the active palette.
    pub fn recolor(&self, colors: &[[f32; 4]], graph: &mut SceneGraph) {
        let Some(color) = colors.get(FIELD_PALETTE_SLOT).or_else(|| colors.last()) else {
            return;
        };
        for shape in &self.shapes {
            if let Some(material) = graph.material_mut(shape.node) {
                material.base_color = *color;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_graph(count: usize, seed: u64) -> (ShapeField, SceneGraph) {
        let mut builder = SceneGraphBuilder::new();
        let root = builder
            .group(None, "field", Transform::default())
            .unwrap();
        let field = ShapeField::build(&mut builder, Some(root), count, seed).unwrap();
        (field, builder.build().unwrap())
    }

    #[test]
    fn field_scatters_requested_count() {
        let (field, graph) = field_graph(20, 42);
        assert_eq!(field.len(), 20);
        assert_eq!(graph.shape_count(), 20);
    }

    #[test]
    fn same_seed_same_placement() {
        let (_, graph_a) = field_graph(8, 7);
        let (_, graph_b) = field_graph(8, 7);
        for i in 0..graph_a.node_count() {
            let a = graph_a.local(mascot_scene::NodeId(i)).unwrap();
            let b = graph_b.local(mascot_scene::NodeId(i)).unwrap();
            assert_eq!(a.position, b.position);
            assert_eq!(a.rotation, b.rotation);
        }
    }

    #[test]
    fn rotation_is_absolute_in_time() {
        // Updating to t then to 0 restores the initial rotation: the
        // field is a function of time, not an accumulator.
        let (field, mut graph) = field_graph(4, 3);
        let node = graph.find("tetra_0").unwrap();
        let before = graph.local(node).unwrap().rotation;

        field.update(10.0, &mut graph);
        assert_ne!(graph.local(node).unwrap().rotation, before);

        field.update(0.0, &mut graph);
        let restored = graph.local(node).unwrap().rotation;
        assert!(before.angle_between(restored) < 1e-4);
    }

    #[test]
    fn recolor_paints_all_shapes() {
        let (field, mut graph) = field_graph(3, 1);
        let colors = [[0.0; 4], [0.1; 4], [0.9, 0.1, 0.2, 1.0], [0.3; 4], [0.4; 4]];
        field.recolor(&colors, &mut graph);
        let node = graph.find("tetra_1").unwrap();
        let material = graph.material_mut(node).unwrap();
        assert_eq!(material.base_color, [0.9, 0.1, 0.2, 1.0]);
    }
}
