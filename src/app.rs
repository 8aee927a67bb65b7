//! Preview window: loads the textures, builds the scene and forwards window
//! events to the running session.

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use crate::config::PreviewConfig;
use crate::core::{Viewport, WinitInput};
use crate::gpu::WgpuRenderer;
use crate::loaders::{AssetLoader, FileFetcher};
use crate::scene::{PreviewSession, RenderLoop, SceneBuilder};
use crate::texture::TextureDescriptor;

pub struct PreviewApp {
    config: PreviewConfig,
    /// Sequence waiting for the window; taken on the first `resumed`
    pending: Option<Vec<TextureDescriptor>>,
    window: Option<Arc<Window>>,
    session: Option<PreviewSession<WgpuRenderer>>,
    render_loop: RenderLoop,
    input: WinitInput,
    failure: Option<anyhow::Error>,
}

impl PreviewApp {
    pub fn new(config: PreviewConfig, descriptors: Vec<TextureDescriptor>) -> Self {
        Self {
            config,
            pending: Some(descriptors),
            window: None,
            session: None,
            render_loop: RenderLoop::new(),
            input: WinitInput::new(),
            failure: None,
        }
    }

    /// Ok unless startup failed; call after the event loop returned
    pub fn finish(self) -> anyhow::Result<()> {
        match self.failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn window_size(&self) -> PhysicalSize<u32> {
        let canvas = self.config.scene.canvas;
        let margin = self.config.body_margin.saturating_mul(2);
        PhysicalSize::new(canvas.width.saturating_add(margin), canvas.height.saturating_add(margin))
    }

    fn start(&mut self, window: Arc<Window>, mut descriptors: Vec<TextureDescriptor>) -> anyhow::Result<()> {
        let size = window.inner_size();
        let viewport = Viewport::from_window(size.width, size.height, self.config.body_margin);

        let loader = AssetLoader::new(FileFetcher);
        let config = &self.config;
        let built = pollster::block_on(loader.load_then(&mut descriptors, |ready, loaded| {
            SceneBuilder::new(config).build(ready, loaded, 0, viewport)
        }))??;

        let renderer = pollster::block_on(WgpuRenderer::new(window.clone(), &built.graph, viewport))?;
        let mut session = PreviewSession::new(self.config.clone(), descriptors, built, renderer);
        session.resize(size.width, size.height);

        self.session = Some(session);
        self.render_loop.resume();
        window.request_redraw();
        Ok(())
    }
}

impl ApplicationHandler for PreviewApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            self.render_loop.resume();
            window.request_redraw();
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("Cylinder Display Preview")
            .with_inner_size(self.window_size());
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                self.failure = Some(e.into());
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        let Some(descriptors) = self.pending.take() else {
            return;
        };
        if let Err(e) = self.start(window, descriptors) {
            log::error!("Preview could not start: {e:#}");
            self.failure = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(session) = self.session.as_mut() else {
            if matches!(event, WindowEvent::CloseRequested) {
                event_loop.exit();
            }
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                session.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render_loop.frame(session) {
                    log::error!("Render error: {e:#}");
                }
            }
            other => {
                if let Some(action) = self.input.process_event(&other) {
                    if !session.handle_action(action) {
                        log::info!("Escape pressed, exiting");
                        event_loop.exit();
                    }
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
