use std::sync::Arc;

use anyhow::Result;
use log::error;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use stardrift::app::App;

#[derive(Default)]
struct Handler {
    app: Option<App>,
}

impl ApplicationHandler for Handler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("stardrift")
            .with_inner_size(LogicalSize::<u32> {
                width: 1280,
                height: 720,
            });
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(App::new(window)) {
            Ok(app) => self.app = Some(app),
            Err(e) => {
                error!("Failed to start: {:?}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(app) = self.app.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => app.on_resize(size),
            WindowEvent::CursorMoved { position, .. } => app.on_pointer_move(position),
            WindowEvent::MouseWheel { delta, .. } => app.on_mouse_scroll(delta),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Released,
                        physical_key: PhysicalKey::Code(code),
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape => event_loop.exit(),
                code => app.on_key_up(code),
            },
            WindowEvent::RedrawRequested => match app.frame() {
                Ok(()) => (),
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => app.reconfigure(),
                Err(wgpu::SurfaceError::Timeout) => (),
                Err(e) => {
                    error!("Render failed: {}", e);
                    event_loop.exit();
                }
            },
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(app) = &self.app {
            app.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let event_loop = EventLoop::new()?;
    let mut handler = Handler::default();
    event_loop.run_app(&mut handler)?;

    Ok(())
}
