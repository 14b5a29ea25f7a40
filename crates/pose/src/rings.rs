use mascot_common::SeededRng;

/// Number of concentric rings in the overlay.
const RING_COUNT: usize = 25;

#[derive(Debug, Clone)]
struct Ring {
    /// Side length in canvas units (1 unit = 1% of the canvas).
    size: f32,
    half_size: f32,
    /// Phase seeds for the four corner radii.
    radii: [f32; 4],
    /// Angular rate, radians per second.
    rate: f32,
    /// Rotation at t = 0.
    phase: f32,
    color: [f32; 4],
}

/// One ring ready to stroke: a rotated rounded square in canvas units,
/// centered on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct RingStroke {
    pub rotation: f32,
    pub size: f32,
    pub half_size: f32,
    pub corner_radii: [f32; 4],
    pub color: [f32; 4],
    pub line_width: f32,
}

/// The breathing ring overlay drawn over the wireframe scene.
///
/// Pure data; per-frame output is a list of [`RingStroke`]s for the host
/// painter. Corner radii wobble with time so the squares read as organic.
#[derive(Debug)]
pub struct RingField {
    rings: Vec<Ring>,
}

impl RingField {
    /// Roll ring geometry from `seed` and stroke colors from `colors`.
    pub fn new(colors: &[[f32; 4]], seed: u64) -> Self {
        let mut rng = SeededRng::new(seed);
        let mut rings: Vec<Ring> = (0..RING_COUNT)
            .map(|idx| {
                let size = (90 - idx) as f32;
                Ring {
                    size,
                    half_size: size * 0.5,
                    radii: [
                        rng.next_f32(),
                        rng.next_f32(),
                        rng.next_f32(),
                        rng.next_f32(),
                    ],
                    rate: std::f32::consts::PI
                        * (0.1 + rng.next_f32() * 0.4)
                        * rng.next_sign()
                        * 0.5,
                    phase: std::f32::consts::TAU * rng.next_f32(),
                    color: [1.0; 4],
                }
            })
            .collect();
        recolor_rings(&mut rings, colors, &mut rng);
        Self { rings }
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Re-roll stroke colors from a new palette (palette-switch path).
    pub fn recolor(&mut self, colors: &[[f32; 4]], seed: u64) {
        let mut rng = SeededRng::new(seed);
        recolor_rings(&mut self.rings, colors, &mut rng);
    }

    /// Compute the stroke list for time `t`, outermost ring first.
    pub fn strokes(&self, t: f32) -> Vec<RingStroke> {
        self.rings
            .iter()
            .map(|ring| {
                let mut corner_radii = [0.0; 4];
                for (out, phase) in corner_radii.iter_mut().zip(&ring.radii) {
                    let pos_sine =
                        ((phase + t * 0.15) * std::f32::consts::TAU).sin() * 0.5 + 0.5;
                    *out = (1.0 - pos_sine * 0.1) * ring.half_size;
                }
                RingStroke {
                    rotation: ring.phase + ring.rate * t,
                    size: ring.size,
                    half_size: ring.half_size,
                    corner_radii,
                    color: ring.color,
                    line_width: 4.0,
                }
            })
            .collect()
    }
}

fn recolor_rings(rings: &mut [Ring], colors: &[[f32; 4]], rng: &mut SeededRng) {
    if colors.is_empty() {
        return;
    }
    let count = rings.len().max(2) as f32;
    for (idx, ring) in rings.iter_mut().enumerate() {
        let pick = (rng.next_u64() as usize) % colors.len();
        let alpha = (1.0 - idx as f32 / (count - 1.0)) * 0.875;
        let [r, g, b, _] = colors[pick];
        ring.color = [r, g, b, alpha];
    }
}
