use std::collections::BTreeMap;

use glam::Mat4;
use mascot_common::Transform;
use mascot_geometry::{GeometryDesc, Material};

/// Index of a node within its scene graph.
///
/// Plain dense index, assigned in construction order. Parents always have
/// a smaller index than their children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Errors from scene construction. A built graph cannot fail.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("parent node {0:?} does not exist")]
    ParentNotFound(NodeId),
    #[error("duplicate node name {0:?}")]
    DuplicateName(String),
}

/// Geometry plus material, carried by a node as a plain data record.
///
/// Shapes are described, never subclassed; a generic renderer consumes the
/// description.
#[derive(Debug, Clone)]
pub struct ShapeDesc {
    pub geometry: GeometryDesc,
    pub material: Material,
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: Transform,
    global: Mat4,
    shape: Option<ShapeDesc>,
}

/// Builder for a [`SceneGraph`]. The only way nodes come into existence.
#[derive(Debug, Default)]
pub struct SceneGraphBuilder {
    nodes: Vec<Node>,
}

impl SceneGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group node (transform only, nothing to draw).
    pub fn group(
        &mut self,
        parent: Option<NodeId>,
        name: impl Into<String>,
        local: Transform,
    ) -> Result<NodeId, SceneError> {
        self.push(parent, name.into(), local, None)
    }

    /// Add a node carrying a shape.
    pub fn shape(
        &mut self,
        parent: Option<NodeId>,
        name: impl Into<String>,
        local: Transform,
        shape: ShapeDesc,
    ) -> Result<NodeId, SceneError> {
        self.push(parent, name.into(), local, Some(shape))
    }

    fn push(
        &mut self,
        parent: Option<NodeId>,
        name: String,
        local: Transform,
        shape: Option<ShapeDesc>,
    ) -> Result<NodeId, SceneError> {
        if let Some(p) = parent {
            if p.0 >= self.nodes.len() {
                return Err(SceneError::ParentNotFound(p));
            }
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name,
            parent,
            children: Vec::new(),
            local,
            global: Mat4::IDENTITY,
            shape,
        });
        if let Some(p) = parent {
            self.nodes[p.0].children.push(id);
        }
        Ok(id)
    }

    /// Freeze the structure. Named nodes must be unique; empty names stay
    /// anonymous and unaddressable.
    pub fn build(self) -> Result<SceneGraph, SceneError> {
        let mut names = BTreeMap::new();
        for (idx, node) in self.nodes.iter().enumerate() {
            if node.name.is_empty() {
                continue;
            }
            if names.insert(node.name.clone(), NodeId(idx)).is_some() {
                return Err(SceneError::DuplicateName(node.name.clone()));
            }
        }
        tracing::debug!(nodes = self.nodes.len(), "scene graph built");
        let mut graph = SceneGraph {
            nodes: self.nodes,
            names,
        };
        graph.propagate();
        Ok(graph)
    }
}

/// A built scene graph. Structure is immutable; transforms and material
/// parameters are the only mutable state.
#[derive(Debug)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    names: BTreeMap<String, NodeId>,
}

impl SceneGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes that carry a shape.
    pub fn shape_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.shape.is_some()).count()
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id.0).map(|n| n.name.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn local(&self, id: NodeId) -> Option<&Transform> {
        self.nodes.get(id.0).map(|n| &n.local)
    }

    /// Overwrite a node's local transform. Silently ignores a stale id
    /// rather than panicking mid-frame.
    pub fn set_local(&mut self, id: NodeId, local: Transform) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.local = local;
        }
    }

    /// Mutable access to a node's local transform for in-place pose writes.
    pub fn local_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.nodes.get_mut(id.0).map(|n| &mut n.local)
    }

    pub fn shape(&self, id: NodeId) -> Option<&ShapeDesc> {
        self.nodes.get(id.0).and_then(|n| n.shape.as_ref())
    }

    /// Material parameters are per-node visual state and may mutate
    /// (blush opacity pulses, palette recolors).
    pub fn material_mut(&mut self, id: NodeId) -> Option<&mut Material> {
        self.nodes
            .get_mut(id.0)
            .and_then(|n| n.shape.as_mut())
            .map(|s| &mut s.material)
    }

    /// Global (world) transform computed by the last [`propagate`] call.
    ///
    /// [`propagate`]: SceneGraph::propagate
    pub fn global(&self, id: NodeId) -> Option<Mat4> {
        self.nodes.get(id.0).map(|n| n.global)
    }

    /// Recompute all global transforms, parent before child.
    pub fn propagate(&mut self) {
        for idx in 0..self.nodes.len() {
            let local = self.nodes[idx].local.matrix();
            let global = match self.nodes[idx].parent {
                Some(p) => self.nodes[p.0].global * local,
                None => local,
            };
            self.nodes[idx].global = global;
        }
    }

    /// Iterate shape-carrying nodes with their global transforms, in
    /// construction (and therefore paint) order.
    pub fn shapes(&self) -> impl Iterator<Item = (NodeId, &ShapeDesc, Mat4)> {
        self.nodes.iter().enumerate().filter_map(|(idx, n)| {
            n.shape
                .as_ref()
                .map(|shape| (NodeId(idx), shape, n.global))
        })
    }

    /// Depth of the tree (a lone root is depth 1).
    pub fn depth(&self) -> usize {
        let mut depths = vec![0usize; self.nodes.len()];
        let mut max = 0;
        for idx in 0..self.nodes.len() {
            depths[idx] = match self.nodes[idx].parent {
                Some(p) => depths[p.0] + 1,
                None => 1,
            };
            max = max.max(depths[idx]);
        }
        max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use mascot_geometry::GeometryDesc;

    fn sphere_shape() -> ShapeDesc {
        ShapeDesc {
            geometry: GeometryDesc::Sphere {
                radius: 0.5,
                segments: 16,
            },
            material: Material::default(),
        }
    }

    #[test]
    fn build_simple_tree() {
        let mut builder = SceneGraphBuilder::new();
        let root = builder.group(None, "root", Transform::default()).unwrap();
        let child = builder
            .shape(Some(root), "ball", Transform::default(), sphere_shape())
            .unwrap();
        let graph = builder.build().unwrap();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.shape_count(), 1);
        assert_eq!(graph.parent(child), Some(root));
        assert_eq!(graph.children(root), &[child]);
        assert_eq!(graph.find("ball"), Some(child));
    }

    #[test]
    fn unknown_parent_is_a_build_error() {
        let mut builder = SceneGraphBuilder::new();
        let err = builder
            .group(Some(NodeId(5)), "orphan", Transform::default())
            .unwrap_err();
        assert!(matches!(err, SceneError::ParentNotFound(NodeId(5))));
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut builder = SceneGraphBuilder::new();
        builder.group(None, "twin", Transform::default()).unwrap();
        builder.group(None, "twin", Transform::default()).unwrap();
        assert!(matches!(
            builder.build(),
            Err(SceneError::DuplicateName(_))
        ));
    }

    #[test]
    fn anonymous_nodes_allowed_in_any_number() {
        let mut builder = SceneGraphBuilder::new();
        let root = builder.group(None, "root", Transform::default()).unwrap();
        for _ in 0..5 {
            builder
                .shape(Some(root), "", Transform::default(), sphere_shape())
                .unwrap();
        }
        let graph = builder.build().unwrap();
        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph.find(""), None);
    }

    #[test]
    fn propagate_composes_parent_and_child() {
        let mut builder = SceneGraphBuilder::new();
        let root = builder
            .group(
                None,
                "root",
                Transform::from_position(Vec3::new(1.0, 0.0, 0.0)),
            )
            .unwrap();
        let child = builder
            .group(
                Some(root),
                "child",
                Transform::from_position(Vec3::new(0.0, 2.0, 0.0)),
            )
            .unwrap();
        let mut graph = builder.build().unwrap();
        graph.propagate();

        let global = graph.global(child).unwrap();
        let origin = global.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn propagate_sees_updated_locals() {
        let mut builder = SceneGraphBuilder::new();
        let root = builder.group(None, "root", Transform::default()).unwrap();
        let mut graph = builder.build().unwrap();

        graph.set_local(root, Transform::from_position(Vec3::new(0.0, 3.0, 0.0)));
        graph.propagate();
        let origin = graph.global(root).unwrap().transform_point3(Vec3::ZERO);
        assert!((origin.y - 3.0).abs() < 1e-6);
    }

    #[test]
    fn stale_id_writes_are_ignored() {
        let mut builder = SceneGraphBuilder::new();
        builder.group(None, "root", Transform::default()).unwrap();
        let mut graph = builder.build().unwrap();
        // Must not panic.
        graph.set_local(NodeId(99), Transform::default());
        assert!(graph.local_mut(NodeId(99)).is_none());
    }

    #[test]
    fn depth_counts_levels() {
        let mut builder = SceneGraphBuilder::new();
        let a = builder.group(None, "a", Transform::default()).unwrap();
        let b = builder.group(Some(a), "b", Transform::default()).unwrap();
        builder.group(Some(b), "c", Transform::default()).unwrap();
        let graph = builder.build().unwrap();
        assert_eq!(graph.depth(), 3);
    }

    #[test]
    fn shapes_iterate_in_construction_order() {
        let mut builder = SceneGraphBuilder::new();
        let root = builder.group(None, "root", Transform::default()).unwrap();
        let first = builder
            .shape(Some(root), "first", Transform::default(), sphere_shape())
            .unwrap();
        let second = builder
            .shape(Some(root), "second", Transform::default(), sphere_shape())
            .unwrap();
        let graph = builder.build().unwrap();

        let order: Vec<NodeId> = graph.shapes().map(|(id, _, _)| id).collect();
        assert_eq!(order, vec![first, second]);
    }
}
