use std::f32::consts::TAU;

use glam::{Mat4, Vec3};
use rand::Rng;

pub const STAR_COUNT: usize = 700;

const MIN_RADIUS: f32 = 8.0;
const RADIUS_SPREAD: f32 = 30.0;
const YAW_SPEED: f32 = 0.036;
const PITCH_SPEED: f32 = 0.018;

/// Static point cloud surrounding the arrangement. Positions are sampled
/// once; only the whole-field rotation changes over time.
pub struct Starfield {
    pub positions: Vec<Vec3>,
    pub yaw: f32,
    pub pitch: f32,
    pub size: f32,
    pub opacity: f32,
}

impl Starfield {
    pub fn new(rng: &mut impl Rng) -> Self {
        let positions = (0..STAR_COUNT)
            .map(|_| {
                let radius = MIN_RADIUS + RADIUS_SPREAD * rng.gen::<f32>();
                let theta = rng.gen::<f32>() * TAU;
                // Uniform over the sphere: cos(phi) uniform in -1..1.
                let cos_phi = rng.gen_range(-1.0f32..1.0);
                let sin_phi = (1.0 - cos_phi * cos_phi).sqrt();
                Vec3::new(
                    radius * sin_phi * theta.cos(),
                    radius * cos_phi,
                    radius * sin_phi * theta.sin(),
                )
            })
            .collect();
        Self {
            positions,
            yaw: 0.0,
            pitch: 0.0,
            size: 0.3,
            opacity: 0.8,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.yaw += YAW_SPEED * dt;
        self.pitch += PITCH_SPEED * dt;
    }

    pub fn rotation_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.yaw) * Mat4::from_rotation_x(self.pitch)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    #[test]
    fn sample_count_is_exact() {
        let mut rng = Pcg64Mcg::seed_from_u64(11);
        let field = Starfield::new(&mut rng);
        assert_eq!(field.positions.len(), STAR_COUNT);
    }

    #[test]
    fn stars_stay_on_the_shell() {
        let mut rng = Pcg64Mcg::seed_from_u64(12);
        let field = Starfield::new(&mut rng);
        for position in &field.positions {
            let radius = position.length();
            assert!(radius >= MIN_RADIUS - 1e-3);
            assert!(radius <= MIN_RADIUS + RADIUS_SPREAD + 1e-3);
        }
    }

    #[test]
    fn sampling_is_reproducible() {
        let a = Starfield::new(&mut Pcg64Mcg::seed_from_u64(13));
        let b = Starfield::new(&mut Pcg64Mcg::seed_from_u64(13));
        assert_eq!(a.positions, b.positions);
    }

    #[test]
    fn rotation_advances_at_fixed_rates() {
        let mut rng = Pcg64Mcg::seed_from_u64(14);
        let mut field = Starfield::new(&mut rng);
        field.advance(2.0);
        assert!((field.yaw - YAW_SPEED * 2.0).abs() < 1e-6);
        assert!((field.pitch - PITCH_SPEED * 2.0).abs() < 1e-6);
    }
}
