use std::{sync::Arc, time::Instant};

use anyhow::Context;
use imgui::{FontConfig, FontSource};
use imgui_winit_support::WinitPlatform;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, Event, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{config::ViewerConfig, rendering::renderer::Renderer, ui, viewer::Viewer};

struct ImguiState {
    context: imgui::Context,
    platform: WinitPlatform,
}

struct App {
    renderer: Option<Renderer>,
    viewer: Viewer,
    imgui: Option<ImguiState>,
    last_frame: Instant,
}

impl App {
    fn new(viewer: Viewer) -> Self {
        Self {
            renderer: None,
            viewer,
            imgui: None,
            last_frame: Instant::now(),
        }
    }

    fn setup_imgui(&mut self, window: &Window) {
        let mut context = imgui::Context::create();
        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(
            context.io_mut(),
            window,
            imgui_winit_support::HiDpiMode::Default,
        );

        let font_size = 14.0;
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: font_size,
                ..Default::default()
            }),
        }]);

        // Disable INI support because it's broken in the published version of imgui
        context.set_ini_filename(None);

        self.imgui = Some(ImguiState { context, platform });
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        let window_attributes =
            Window::default_attributes().with_title(&self.viewer.config.window_title);
        let window = event_loop
            .create_window(window_attributes)
            .expect("Failed to create window");
        let window = Arc::new(window);

        self.setup_imgui(&window);

        let renderer = pollster::block_on(Renderer::new(
            window,
            &self.viewer,
            &mut self.imgui.as_mut().unwrap().context,
        ))
        .expect("Failed to create renderer");

        self.viewer.camera.set_aspect(renderer.size);
        self.renderer = Some(renderer);
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let imgui = self.imgui.as_mut().unwrap();

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.viewer.camera.set_aspect(new_size);
                self.renderer.as_mut().unwrap().resize(new_size);
            }
            WindowEvent::KeyboardInput { event: ref key, .. } => {
                // Space mirrors the panel's rotate button.
                if key.physical_key == PhysicalKey::Code(KeyCode::Space)
                    && key.state == ElementState::Pressed
                    && !key.repeat
                    && !imgui.context.io().want_capture_keyboard
                {
                    self.viewer.toggle_rotation();
                }
            }
            WindowEvent::RedrawRequested => {
                let delta_time = self.last_frame.elapsed();
                imgui.context.io_mut().update_delta_time(delta_time);
                self.last_frame = Instant::now();

                let renderer = self.renderer.as_mut().unwrap();
                renderer.window.request_redraw();

                imgui
                    .platform
                    .prepare_frame(imgui.context.io_mut(), &renderer.window)
                    .expect("Failed to prepare UI frame");

                let ui = imgui.context.new_frame();

                self.viewer.update(renderer);
                ui::draw(ui, &mut self.viewer);

                imgui.platform.prepare_render(ui, &renderer.window);

                match renderer.render(&self.viewer, &mut imgui.context) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        renderer.resize(renderer.size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory");
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        log::warn!("Timeout");
                    }
                    Err(other) => {
                        log::error!("Unexpected error: {:?}", other);
                    }
                }
            }
            _ => (),
        }

        {
            let window = self.renderer.as_mut().unwrap().window.as_ref();
            imgui.platform.handle_event::<()>(
                imgui.context.io_mut(),
                window,
                &Event::WindowEvent { window_id, event },
            );
        }
    }
}

pub async fn run() -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let viewer = Viewer::new(ViewerConfig::default());
    let mut app = App::new(viewer);
    event_loop.run_app(&mut app)?;

    Ok(())
}
