use std::f32::consts::{PI, TAU};

use glam::Vec3;
use rand::Rng;

use crate::color::Palette;

use super::{Bob, Glow, Material, Ornament, Scene, Shape};

pub const MIN_ORNAMENTS: usize = 9;
pub const MAX_ORNAMENTS: usize = 14;

const SPREAD: Vec3 = Vec3::new(4.0, 2.5, 4.0);
const SPIN_RATE: f32 = 0.6;

impl Scene {
    /// Replace the current arrangement with a freshly generated one.
    ///
    /// The seed alone decides the palette; everything else (count, shapes,
    /// placement, motion) comes from the caller's generator, so tests can
    /// reproduce a layout by seeding one themselves. The previous batch is
    /// dropped wholesale.
    pub fn randomize(&mut self, rng: &mut impl Rng, seed: f32) {
        self.seed = seed;
        self.palette = Palette::from_seed(seed);
        let count = rng.gen_range(MIN_ORNAMENTS..=MAX_ORNAMENTS);
        self.ornaments = (0..count)
            .map(|_| random_ornament(rng, &self.palette))
            .collect();
        self.glow = Glow::new(&self.palette);
    }
}

fn random_ornament(rng: &mut impl Rng, palette: &Palette) -> Ornament {
    let base_position = Vec3::new(
        rng.gen_range(-SPREAD.x..SPREAD.x),
        rng.gen_range(-SPREAD.y..SPREAD.y),
        rng.gen_range(-SPREAD.z..SPREAD.z),
    );
    // One scalar rate drives both axes, so tumble and yaw stay coupled.
    let spin = rng.gen_range(-SPIN_RATE..SPIN_RATE);
    Ornament {
        shape: random_shape(rng),
        material: Material {
            color: palette.colors[rng.gen_range(0..palette.colors.len())],
            roughness: 0.35,
            metalness: 0.1,
            opacity: 0.95,
            unlit: false,
        },
        base_position,
        position: base_position,
        rotation: Vec3::new(
            rng.gen::<f32>() * PI,
            rng.gen::<f32>() * PI,
            rng.gen::<f32>() * PI,
        ),
        scale: rng.gen_range(0.6..1.3),
        spin: Vec3::new(spin * 1.5, -spin, 0.0),
        bob: random_bob(rng),
    }
}

fn random_shape(rng: &mut impl Rng) -> Shape {
    match rng.gen_range(0..5) {
        0 => Shape::Icosahedron {
            radius: rng.gen_range(1.2..2.5),
        },
        1 => Shape::TorusKnot {
            radius: rng.gen_range(0.8..1.8),
            tube: rng.gen_range(0.22..0.45),
            p: rng.gen_range(1..=4),
            q: rng.gen_range(2..=5),
        },
        2 => Shape::Capsule {
            radius: rng.gen_range(0.8..1.4),
            length: rng.gen_range(0.4..1.2),
        },
        3 => Shape::Dodecahedron {
            radius: rng.gen_range(1.1..2.2),
        },
        _ => Shape::Cone {
            radius: rng.gen_range(1.1..2.1),
            height: rng.gen_range(2.5..4.0),
        },
    }
}

fn random_bob(rng: &mut impl Rng) -> Bob {
    Bob {
        amplitude: rng.gen_range(0.08..0.3),
        speed: rng.gen_range(0.5..1.5),
        phase: rng.gen::<f32>() * TAU,
        axis: random_axis(rng),
    }
}

fn random_axis(rng: &mut impl Rng) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0f32..1.0),
            rng.gen_range(-1.0f32..1.0),
            rng.gen_range(-1.0f32..1.0),
        );
        if let Some(unit) = v.try_normalize() {
            return unit;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn randomized(rng_seed: u64, palette_seed: f32) -> Scene {
        let mut rng = Pcg64Mcg::seed_from_u64(rng_seed);
        let mut scene = Scene::new(&mut rng);
        scene.randomize(&mut rng, palette_seed);
        scene
    }

    #[test]
    fn ornament_count_stays_in_bounds() {
        for rng_seed in 0..32 {
            let scene = randomized(rng_seed, 0.5);
            assert!(scene.ornaments.len() >= MIN_ORNAMENTS);
            assert!(scene.ornaments.len() <= MAX_ORNAMENTS);
        }
    }

    #[test]
    fn parameters_stay_in_their_ranges() {
        let scene = randomized(21, 0.73);
        for ornament in &scene.ornaments {
            assert!(ornament.base_position.x.abs() <= SPREAD.x);
            assert!(ornament.base_position.y.abs() <= SPREAD.y);
            assert!(ornament.base_position.z.abs() <= SPREAD.z);
            assert!(ornament.position == ornament.base_position);
            assert!(ornament.scale >= 0.6 && ornament.scale < 1.3);
            assert!(ornament.spin.x.abs() <= SPIN_RATE * 1.5);
            assert!(ornament.spin.y.abs() <= SPIN_RATE);
            assert_eq!(ornament.spin.z, 0.0);
            assert!((ornament.bob.axis.length() - 1.0).abs() < 1e-4);
            assert!(ornament.bob.amplitude >= 0.08 && ornament.bob.amplitude < 0.3);
            assert!(ornament.bob.speed >= 0.5 && ornament.bob.speed < 1.5);
            assert!(ornament.bob.phase >= 0.0 && ornament.bob.phase < TAU);
            assert!((ornament.material.opacity - 0.95).abs() < 1e-6);
            assert!(!ornament.material.unlit);
        }
    }

    #[test]
    fn colors_come_from_the_seed_palette() {
        let scene = randomized(5, 0.21);
        let palette = Palette::from_seed(0.21);
        for ornament in &scene.ornaments {
            assert!(palette.colors.contains(&ornament.material.color));
        }
        assert_eq!(scene.glow.material.color, palette.colors[0] * 0.6);
        assert!(scene.glow.material.unlit);
    }

    #[test]
    fn same_generator_seed_reproduces_the_layout() {
        let a = randomized(99, 0.4);
        let b = randomized(99, 0.4);
        assert_eq!(a.ornaments.len(), b.ornaments.len());
        for (x, y) in a.ornaments.iter().zip(&b.ornaments) {
            assert_eq!(x.base_position, y.base_position);
            assert_eq!(x.shape, y.shape);
        }
    }

    #[test]
    fn rerandomizing_replaces_the_batch() {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        let mut scene = Scene::new(&mut rng);
        scene.randomize(&mut rng, 0.1);
        let before: Vec<_> = scene
            .ornaments
            .iter()
            .map(|o| o.base_position)
            .collect();
        scene.randomize(&mut rng, 0.9);
        assert!(scene.ornaments.len() >= MIN_ORNAMENTS);
        assert!(scene.ornaments.len() <= MAX_ORNAMENTS);
        let after: Vec<_> = scene
            .ornaments
            .iter()
            .map(|o| o.base_position)
            .collect();
        assert_ne!(before, after);
        assert_eq!(scene.palette, Palette::from_seed(0.9));
    }

    #[test]
    fn starfield_survives_rerandomization() {
        let mut rng = Pcg64Mcg::seed_from_u64(31);
        let mut scene = Scene::new(&mut rng);
        scene.randomize(&mut rng, 0.3);
        let stars = scene.starfield.positions.clone();
        scene.randomize(&mut rng, 0.6);
        assert_eq!(scene.starfield.positions, stars);
    }
}
