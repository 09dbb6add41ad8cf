use std::sync::Arc;
use std::time::SystemTime;

use anyhow::Result;
use glam::Vec2;
use log::info;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use winit::{dpi::PhysicalPosition, event::MouseScrollDelta, keyboard::KeyCode, window::Window};

use crate::renderer::Renderer;
use crate::scene::{FrameInput, Scene};
use crate::time::Clock;

pub struct App {
    window: Arc<Window>,
    scene: Scene,
    renderer: Renderer,
    clock: Clock,
    rng: Pcg64Mcg,
    pointer: Option<Vec2>,
}

impl App {
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let unix_milli = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap()
            .as_millis() as _;
        info!("Seeded RNG with {}", unix_milli);
        let mut rng = Pcg64Mcg::seed_from_u64(unix_milli);

        let mut scene = Scene::new(&mut rng);
        let seed = rng.gen::<f32>();
        scene.randomize(&mut rng, seed);
        info!(
            "Scene ready: seed {:.3}, {} ornaments",
            seed,
            scene.ornaments.len()
        );

        let size = window.inner_size();
        scene.camera.set_aspect(size.width, size.height);

        let renderer = Renderer::new(window.clone(), &scene).await?;

        Ok(Self {
            window,
            scene,
            renderer,
            clock: Clock::new(),
            rng,
            pointer: None,
        })
    }

    /// Throws out the current arrangement and grows a fresh one.
    pub fn shuffle(&mut self) {
        let seed = self.rng.gen::<f32>();
        self.scene.randomize(&mut self.rng, seed);
        self.renderer.rebuild(&self.scene);
        info!(
            "Shuffled scene: seed {:.3}, {} ornaments",
            seed,
            self.scene.ornaments.len()
        );
    }

    pub fn on_resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.scene.camera.set_aspect(size.width, size.height);
        self.renderer.resize(size.width, size.height);
    }

    /// Maps the cursor to `[-1, 1]` with y up, the coordinates the rig tilts by.
    pub fn on_pointer_move(&mut self, position: PhysicalPosition<f64>) {
        let size = self.window.inner_size();
        if size.width == 0 || size.height == 0 {
            return;
        }
        let x = (position.x / size.width as f64) * 2.0 - 1.0;
        let y = 1.0 - (position.y / size.height as f64) * 2.0;
        self.pointer = Some(Vec2::new(x as f32, y as f32));
    }

    pub fn on_mouse_scroll(&mut self, delta: MouseScrollDelta) {
        let amount = match delta {
            MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => y as f32 * -0.01,
            MouseScrollDelta::LineDelta(_, y) => y * -0.5,
        };
        self.scene.camera.dolly(amount);
    }

    pub fn on_key_up(&mut self, code: KeyCode) {
        match code {
            KeyCode::Space => self.shuffle(),
            KeyCode::KeyK => {
                self.scene.camera.exposure = (self.scene.camera.exposure + 0.1).min(4.0);
                info!("Camera exposure increased: {}", self.scene.camera.exposure);
            }
            KeyCode::KeyJ => {
                self.scene.camera.exposure = (self.scene.camera.exposure - 0.1).max(0.1);
                info!("Camera exposure decreased: {}", self.scene.camera.exposure);
            }
            _ => (),
        }
    }

    pub fn frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let timing = self.clock.tick();
        self.scene.advance(FrameInput {
            elapsed: timing.elapsed,
            dt: timing.dt,
            pointer: self.pointer,
        });
        self.renderer.render(&self.scene)
    }

    /// Reconfigures the swapchain after the surface was lost or went stale.
    pub fn reconfigure(&mut self) {
        let size = self.window.inner_size();
        self.renderer.resize(size.width, size.height);
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}
