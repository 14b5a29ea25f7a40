use glam::Vec3;

/// Line-drawn shape: vertices plus a fixed edge index list.
#[derive(Debug, Clone)]
pub struct Wireframe {
    pub vertices: Vec<Vec3>,
    /// Index pairs into `vertices`; each pair is one stroked segment.
    pub edges: Vec<[u16; 2]>,
}

impl Wireframe {
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Unit tetrahedron wireframe: four canonical vertices, six edges.
pub fn tetrahedron_wireframe() -> Wireframe {
    let vertices = vec![
        Vec3::new((8.0f32 / 9.0).sqrt(), 0.0, -1.0 / 3.0),
        Vec3::new(-(2.0f32 / 9.0).sqrt(), (2.0f32 / 3.0).sqrt(), -1.0 / 3.0),
        Vec3::new(-(2.0f32 / 9.0).sqrt(), -(2.0f32 / 3.0).sqrt(), -1.0 / 3.0),
        Vec3::new(0.0, 0.0, 1.0),
    ];
    let edges = vec![[0, 1], [0, 2], [0, 3], [1, 2], [2, 3], [3, 1]];
    Wireframe { vertices, edges }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tetrahedron_has_four_vertices_six_edges() {
        let wf = tetrahedron_wireframe();
        assert_eq!(wf.vertices.len(), 4);
        assert_eq!(wf.edge_count(), 6);
    }

    #[test]
    fn edges_index_valid_vertices() {
        let wf = tetrahedron_wireframe();
        for [a, b] in &wf.edges {
            assert!((*a as usize) < wf.vertices.len());
            assert!((*b as usize) < wf.vertices.len());
            assert_ne!(a, b);
        }
    }

    #[test]
    fn vertices_are_unit_distance_from_centroid() {
        let wf = tetrahedron_wireframe();
        let centroid: Vec3 = wf.vertices.iter().sum::<Vec3>() / 4.0;
        for v in &wf.vertices {
            assert!(((*v - centroid).length() - 1.0).abs() < 1e-3);
        }
    }
}
