use glam::Vec3;
use mascot_common::SeededRng;

/// Deterministic point scatter in a cube of the given half extent.
///
/// Same seed, same cloud; the ambient particle field must not reshuffle on
/// every remount.
pub fn particle_cloud(count: u32, half_extent: f32, seed: u64) -> Vec<Vec3> {
    let mut rng = SeededRng::new(seed);
    (0..count)
        .map(|_| {
            Vec3::new(
                rng.next_range(-half_extent, half_extent),
                rng.next_range(-half_extent, half_extent),
                rng.next_range(-half_extent, half_extent),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cloud_is_deterministic() {
        let a = particle_cloud(20, 5.0, 42);
        let b = particle_cloud(20, 5.0, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_scatter_differently() {
        let a = particle_cloud(20, 5.0, 1);
        let b = particle_cloud(20, 5.0, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn points_stay_inside_the_cube() {
        let cloud = particle_cloud(500, 3.0, 7);
        assert_eq!(cloud.len(), 500);
        for p in cloud {
            assert!(p.abs().max_element() <= 3.0);
        }
    }
}
