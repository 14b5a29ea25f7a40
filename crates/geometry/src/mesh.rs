use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// Triangle mesh: positions + normals + indices.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl Mesh {
    fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let idx = self.positions.len() as u32;
        self.positions.push(position.to_array());
        self.normals.push(normal.normalize_or_zero().to_array());
        idx
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

fn min_segments(segments: u32) -> u32 {
    segments.max(3)
}

/// Lat/long sphere centered at the origin.
pub fn sphere(radius: f32, segments: u32) -> Mesh {
    dome(radius, segments, 1.0)
}

/// Partial sphere swept from the top pole down by `sweep` * pi.
///
/// `sweep` of 1.0 is a full sphere; the avatar hair dome uses 0.55.
pub fn dome(radius: f32, segments: u32, sweep: f32) -> Mesh {
    let segments = min_segments(segments);
    let sweep = sweep.clamp(0.0, 1.0);
    let rings = segments;
    let sectors = segments * 2;
    let mut mesh = Mesh::default();

    for ring in 0..=rings {
        let phi = sweep * PI * ring as f32 / rings as f32;
        for sector in 0..=sectors {
            let theta = TAU * sector as f32 / sectors as f32;
            let dir = Vec3::new(
                phi.sin() * theta.cos(),
                phi.cos(),
                phi.sin() * theta.sin(),
            );
            mesh.push_vertex(dir * radius, dir);
        }
    }

    let stride = sectors + 1;
    for ring in 0..rings {
        for sector in 0..sectors {
            let a = ring * stride + sector;
            let b = a + stride;
            mesh.indices.extend([a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    mesh
}

/// Capsule: a sphere split at the equator with the halves pushed apart
/// along Y by `half_height`.
pub fn capsule(radius: f32, half_height: f32, segments: u32) -> Mesh {
    let mut mesh = sphere(radius, segments);
    for position in &mut mesh.positions {
        if position[1] >= 0.0 {
            position[1] += half_height;
        } else {
            position[1] -= half_height;
        }
    }
    mesh
}

/// Cone with its base disc on y = 0 and apex at y = height.
pub fn cone(radius: f32, height: f32, segments: u32) -> Mesh {
    let segments = min_segments(segments);
    let mut mesh = Mesh::default();
    let apex = Vec3::new(0.0, height, 0.0);
    let slope = radius / height.max(1e-6);

    // Side: one apex vertex per sector keeps normals per-face-ish smooth.
    for sector in 0..segments {
        let t0 = TAU * sector as f32 / segments as f32;
        let t1 = TAU * (sector + 1) as f32 / segments as f32;
        let p0 = Vec3::new(radius * t0.cos(), 0.0, radius * t0.sin());
        let p1 = Vec3::new(radius * t1.cos(), 0.0, radius * t1.sin());
        let n0 = Vec3::new(t0.cos(), slope, t0.sin());
        let n1 = Vec3::new(t1.cos(), slope, t1.sin());
        let na = (n0 + n1) * 0.5;
        let a = mesh.push_vertex(apex, na);
        let b = mesh.push_vertex(p0, n0);
        let c = mesh.push_vertex(p1, n1);
        mesh.indices.extend([a, c, b]);
    }

    // Base disc.
    let center = mesh.push_vertex(Vec3::ZERO, Vec3::NEG_Y);
    let base_start = mesh.positions.len() as u32;
    for sector in 0..=segments {
        let t = TAU * sector as f32 / segments as f32;
        mesh.push_vertex(
            Vec3::new(radius * t.cos(), 0.0, radius * t.sin()),
            Vec3::NEG_Y,
        );
    }
    for sector in 0..segments {
        mesh.indices
            .extend([center, base_start + sector, base_start + sector + 1]);
    }
    mesh
}

/// Cylinder centered at the origin, axis along Y.
pub fn cylinder(radius: f32, height: f32, segments: u32) -> Mesh {
    let segments = min_segments(segments);
    let mut mesh = Mesh::default();
    let half = height * 0.5;

    // Side.
    for sector in 0..=segments {
        let t = TAU * sector as f32 / segments as f32;
        let dir = Vec3::new(t.cos(), 0.0, t.sin());
        mesh.push_vertex(dir * radius + Vec3::Y * half, dir);
        mesh.push_vertex(dir * radius - Vec3::Y * half, dir);
    }
    for sector in 0..segments {
        let a = sector * 2;
        mesh.indices.extend([a, a + 1, a + 2, a + 2, a + 1, a + 3]);
    }

    // Caps.
    for (y, normal) in [(half, Vec3::Y), (-half, Vec3::NEG_Y)] {
        let center = mesh.push_vertex(Vec3::Y * y, normal);
        let start = mesh.positions.len() as u32;
        for sector in 0..=segments {
            let t = TAU * sector as f32 / segments as f32;
            mesh.push_vertex(
                Vec3::new(radius * t.cos(), y, radius * t.sin()),
                normal,
            );
        }
        for sector in 0..segments {
            let (b, c) = if normal.y > 0.0 {
                (start + sector + 1, start + sector)
            } else {
                (start + sector, start + sector + 1)
            };
            mesh.indices.extend([center, b, c]);
        }
    }
    mesh
}

/// Torus in the XZ plane (the floating ring shape).
pub fn torus(radius: f32, tube_radius: f32, segments: u32, tube_segments: u32) -> Mesh {
    let segments = min_segments(segments);
    let tube_segments = min_segments(tube_segments);
    let mut mesh = Mesh::default();

    for seg in 0..=segments {
        let u = TAU * seg as f32 / segments as f32;
        let ring_center = Vec3::new(radius * u.cos(), 0.0, radius * u.sin());
        let ring_dir = Vec3::new(u.cos(), 0.0, u.sin());
        for tube in 0..=tube_segments {
            let v = TAU * tube as f32 / tube_segments as f32;
            let normal = ring_dir * v.cos() + Vec3::Y * v.sin();
            mesh.push_vertex(ring_center + normal * tube_radius, normal);
        }
    }

    let stride = tube_segments + 1;
    for seg in 0..segments {
        for tube in 0..tube_segments {
            let a = seg * stride + tube;
            let b = a + stride;
            mesh.indices.extend([a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    mesh
}

/// Axis-aligned box with per-face normals.
pub fn cuboid(half_extents: [f32; 3]) -> Mesh {
    let [hx, hy, hz] = half_extents;
    let mut mesh = Mesh::default();
    let faces: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];
    let extent = Vec3::new(hx, hy, hz);
    for (normal, tangent, bitangent) in faces {
        let origin = normal * extent;
        let t = tangent * extent;
        let b = bitangent * extent;
        let start = mesh.positions.len() as u32;
        mesh.push_vertex(origin - t - b, normal);
        mesh.push_vertex(origin + t - b, normal);
        mesh.push_vertex(origin + t + b, normal);
        mesh.push_vertex(origin - t + b, normal);
        mesh.indices
            .extend([start, start + 1, start + 2, start + 2, start + 3, start]);
    }
    mesh
}

/// Flat disc in the XY plane facing +Z (the glow aura behind the avatar).
pub fn disc(radius: f32, segments: u32) -> Mesh {
    let segments = min_segments(segments);
    let mut mesh = Mesh::default();
    let center = mesh.push_vertex(Vec3::ZERO, Vec3::Z);
    for sector in 0..=segments {
        let t = TAU * sector as f32 / segments as f32;
        mesh.push_vertex(
            Vec3::new(radius * t.cos(), radius * t.sin(), 0.0),
            Vec3::Z,
        );
    }
    for sector in 0..segments {
        mesh.indices.extend([center, sector + 1, sector + 2]);
    }
    mesh
}
