use glam::Vec2;

use super::{Rig, Scene};

/// Fraction of the remaining distance the tilt covers each frame.
pub const POINTER_SMOOTHING: f32 = 0.05;

#[derive(Clone, Copy, Debug)]
pub struct FrameInput {
    pub elapsed: f32,
    pub dt: f32,
    /// Latest pointer position in `[-1, 1]` window coordinates, y up.
    pub pointer: Option<Vec2>,
}

impl Scene {
    /// Advance every animated quantity by one frame.
    pub fn advance(&mut self, input: FrameInput) {
        for ornament in &mut self.ornaments {
            ornament.rotation += ornament.spin * input.dt;
            let sway = (input.elapsed * ornament.bob.speed + ornament.bob.phase).sin()
                * ornament.bob.amplitude;
            ornament.position = ornament.base_position + ornament.bob.axis * sway;
        }

        self.starfield.advance(input.dt);

        let rim = &mut self.lighting.rim;
        rim.intensity =
            rim.base_intensity + (input.elapsed * rim.pulse_speed).sin() * rim.pulse_amplitude;

        self.rig.yaw += self.rig.auto_rotate * input.dt;
        if let Some(pointer) = input.pointer {
            let target = Rig::tilt_target(pointer);
            self.rig.tilt += (target - self.rig.tilt) * POINTER_SMOOTHING;
        }
    }
}
