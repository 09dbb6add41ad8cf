mod builder;
mod starfield;
mod update;

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

use crate::color::{self, Palette};

pub use builder::{MAX_ORNAMENTS, MIN_ORNAMENTS};
pub use starfield::{Starfield, STAR_COUNT};
pub use update::{FrameInput, POINTER_SMOOTHING};

pub const CAMERA_MIN_DISTANCE: f32 = 4.0;
pub const CAMERA_MAX_DISTANCE: f32 = 18.0;

/// Full revolution in roughly fifty seconds.
pub const AUTO_ROTATE_SPEED: f32 = 0.125;

/// Radians of rig tilt at the edge of the window.
pub const TILT_RANGE: f32 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Icosahedron { radius: f32 },
    TorusKnot { radius: f32, tube: f32, p: u32, q: u32 },
    Capsule { radius: f32, length: f32 },
    Dodecahedron { radius: f32 },
    Cone { radius: f32, height: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: Vec3,
    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
    pub unlit: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct Bob {
    pub amplitude: f32,
    pub speed: f32,
    pub phase: f32,
    /// Unit vector the oscillation displaces along.
    pub axis: Vec3,
}

#[derive(Clone, Debug)]
pub struct Ornament {
    pub shape: Shape,
    pub material: Material,
    pub base_position: Vec3,
    pub position: Vec3,
    /// Euler angles in radians, applied XYZ.
    pub rotation: Vec3,
    pub scale: f32,
    /// Angular velocity in radians per second, per axis.
    pub spin: Vec3,
    pub bob: Bob,
}

impl Ornament {
    pub fn model_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), rotation, self.position)
    }
}

/// Inward-facing translucent shell that backs the whole arrangement.
#[derive(Clone, Debug)]
pub struct Glow {
    pub radius: f32,
    pub material: Material,
}

impl Glow {
    pub fn new(palette: &Palette) -> Self {
        Self {
            radius: 5.0,
            material: Material {
                color: palette.colors[0] * 0.6,
                roughness: 1.0,
                metalness: 0.0,
                opacity: 0.08,
                unlit: true,
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

#[derive(Clone, Debug)]
pub struct DirectionalLight {
    pub color: Vec3,
    pub intensity: f32,
    /// Unit vector pointing toward the light.
    pub direction: Vec3,
}

#[derive(Clone, Debug)]
pub struct PointLight {
    pub color: Vec3,
    pub position: Vec3,
    pub intensity: f32,
    pub base_intensity: f32,
    pub range: f32,
    pub pulse_speed: f32,
    pub pulse_amplitude: f32,
}

#[derive(Clone, Debug)]
pub struct Lighting {
    pub ambient: AmbientLight,
    pub key: DirectionalLight,
    pub rim: PointLight,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: AmbientLight {
                color: Vec3::ONE,
                intensity: 0.55,
            },
            key: DirectionalLight {
                color: color::hex(0x7b5cfa),
                intensity: 1.5,
                direction: Vec3::new(-4.0, 6.0, 7.0).normalize(),
            },
            rim: PointLight {
                color: color::hex(0x0ff4c6),
                position: Vec3::new(6.0, 4.0, -6.0),
                intensity: 1.2,
                base_intensity: 1.2,
                range: 40.0,
                pulse_speed: 2.1,
                pulse_amplitude: 0.3,
            },
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Fog {
    pub color: Vec3,
    pub density: f32,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            color: color::hex(0x050817),
            density: 0.08,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    pub exposure: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 2.2, 10.0),
            target: Vec3::ZERO,
            fov_y: 55.0,
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 120.0,
            exposure: 1.1,
        }
    }
}

impl Camera {
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), self.aspect_ratio, self.near, self.far)
    }

    /// Move along the view direction, keeping the orbit distance in bounds.
    pub fn dolly(&mut self, amount: f32) {
        let offset = self.position - self.target;
        let distance =
            (offset.length() + amount).clamp(CAMERA_MIN_DISTANCE, CAMERA_MAX_DISTANCE);
        self.position = self.target + offset.normalize() * distance;
    }
}

/// Transform node every ornament hangs off: slow auto-rotation plus a
/// pointer-following tilt.
#[derive(Clone, Copy, Debug)]
pub struct Rig {
    pub yaw: f32,
    /// x tilts around the X axis, y offsets the yaw.
    pub tilt: Vec2,
    pub auto_rotate: f32,
}

impl Default for Rig {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            tilt: Vec2::ZERO,
            auto_rotate: AUTO_ROTATE_SPEED,
        }
    }
}

impl Rig {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::YXZ, self.yaw + self.tilt.y, self.tilt.x, 0.0)
    }

    /// Tilt the rig settles on for a pointer in `[-1, 1]` coordinates.
    pub fn tilt_target(pointer: Vec2) -> Vec2 {
        Vec2::new(-pointer.y, pointer.x) * TILT_RANGE
    }
}

pub struct Scene {
    pub camera: Camera,
    pub rig: Rig,
    pub lighting: Lighting,
    pub fog: Fog,
    pub starfield: Starfield,
    pub ornaments: Vec<Ornament>,
    pub glow: Glow,
    pub palette: Palette,
    pub seed: f32,
}

impl Scene {
    /// An empty stage: lights, fog, camera and the starfield, but no
    /// ornaments yet. Call [`Scene::randomize`] to populate it.
    pub fn new(rng: &mut impl rand::Rng) -> Self {
        let palette = Palette::from_seed(0.0);
        Self {
            camera: Camera::default(),
            rig: Rig::default(),
            lighting: Lighting::default(),
            fog: Fog::default(),
            starfield: Starfield::new(rng),
            ornaments: Vec::new(),
            glow: Glow::new(&palette),
            palette,
            seed: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_matches_window_exactly() {
        let mut camera = Camera::default();
        camera.set_aspect(1920, 1080);
        assert_eq!(camera.aspect_ratio, 1920.0 / 1080.0);
        // A zero-height window keeps the previous ratio.
        camera.set_aspect(640, 0);
        assert_eq!(camera.aspect_ratio, 1920.0 / 1080.0);
    }

    #[test]
    fn dolly_clamps_to_orbit_bounds() {
        let mut camera = Camera::default();
        camera.dolly(100.0);
        assert!((camera.position.length() - CAMERA_MAX_DISTANCE).abs() < 1e-4);
        camera.dolly(-100.0);
        assert!((camera.position.length() - CAMERA_MIN_DISTANCE).abs() < 1e-4);
    }

    #[test]
    fn dolly_preserves_view_direction() {
        let mut camera = Camera::default();
        let before = (camera.position - camera.target).normalize();
        camera.dolly(2.0);
        let after = (camera.position - camera.target).normalize();
        assert!((before - after).length() < 1e-5);
    }

    #[test]
    fn tilt_target_follows_pointer_axes() {
        assert_eq!(
            Rig::tilt_target(Vec2::new(1.0, 0.0)),
            Vec2::new(0.0, TILT_RANGE)
        );
        assert_eq!(
            Rig::tilt_target(Vec2::new(0.0, 1.0)),
            Vec2::new(-TILT_RANGE, 0.0)
        );
    }

    #[test]
    fn model_matrix_carries_the_position() {
        let ornament = Ornament {
            shape: Shape::Icosahedron { radius: 1.5 },
            material: Material {
                color: Vec3::ONE,
                roughness: 0.35,
                metalness: 0.1,
                opacity: 0.95,
                unlit: false,
            },
            base_position: Vec3::new(1.0, 2.0, 3.0),
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::ZERO,
            scale: 2.0,
            spin: Vec3::ZERO,
            bob: Bob {
                amplitude: 0.1,
                speed: 1.0,
                phase: 0.0,
                axis: Vec3::Y,
            },
        };
        let matrix = ornament.model_matrix();
        assert!((matrix.w_axis.truncate() - ornament.position).length() < 1e-6);
        let unit = matrix.transform_vector3(Vec3::X);
        assert!((unit.length() - 2.0).abs() < 1e-5);
    }
}
