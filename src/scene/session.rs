//! Live preview state: which texture is shown and the camera looking at it.

use crate::camera::PerspectiveCamera;
use crate::config::PreviewConfig;
use crate::controls::OrbitControls;
use crate::core::{InputAction, KeyInput, NavigationKey, Viewport};
use crate::texture::TextureDescriptor;
use crate::traits::SceneRenderer;

use super::builder::BuiltScene;
use super::graph::SceneGraph;

/// Position in the texture sequence, always below `count`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayIndex {
    current: usize,
    count: usize,
}

impl DisplayIndex {
    /// Start at 0; `count` is clamped to at least 1
    pub fn new(count: usize) -> Self {
        Self {
            current: 0,
            count: count.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Advance with wraparound; returns false when there is nothing to cycle
    pub fn next(&mut self) -> bool {
        if self.count < 2 {
            return false;
        }
        self.current = (self.current + 1) % self.count;
        true
    }

    /// Retreat with wraparound; returns false when there is nothing to cycle
    pub fn previous(&mut self) -> bool {
        if self.count < 2 {
            return false;
        }
        self.current = (self.current + self.count - 1) % self.count;
        true
    }
}

/// One running preview: loaded textures, scene, camera, controls and the
/// renderer drawing them
pub struct PreviewSession<R: SceneRenderer> {
    config: PreviewConfig,
    descriptors: Vec<TextureDescriptor>,
    index: DisplayIndex,
    graph: SceneGraph,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    viewport: Viewport,
    renderer: R,
    bound_texture: Option<usize>,
}

impl<R: SceneRenderer> PreviewSession<R> {
    /// Take over a built scene and bind the texture at index 0
    pub fn new(
        config: PreviewConfig,
        descriptors: Vec<TextureDescriptor>,
        scene: BuiltScene,
        renderer: R,
    ) -> Self {
        let BuiltScene {
            graph,
            camera,
            controls,
            viewport,
        } = scene;

        let mut session = Self {
            config,
            index: DisplayIndex::new(descriptors.len()),
            descriptors,
            graph,
            camera,
            controls,
            viewport,
            renderer,
            bound_texture: None,
        };
        session.update_texture();
        session
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    pub fn descriptors(&self) -> &[TextureDescriptor] {
        &self.descriptors
    }

    pub fn display_index(&self) -> usize {
        self.index.current()
    }

    /// Descriptor index whose image the display material currently shows
    pub fn bound_texture(&self) -> Option<usize> {
        self.bound_texture
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Cycle the shown texture. Synthetic key events are ignored.
    /// Returns true if the display index changed.
    pub fn handle_key(&mut self, input: KeyInput) -> bool {
        if !input.trusted {
            log::debug!("Ignoring synthetic {:?} key", input.key);
            return false;
        }

        let moved = match input.key {
            NavigationKey::Next => self.index.next(),
            NavigationKey::Previous => self.index.previous(),
        };
        if moved {
            log::info!(
                "Showing texture {}/{}",
                self.index.current() + 1,
                self.index.count()
            );
            self.update_texture();
        }
        moved
    }

    /// Route a window action; returns false when the preview should close
    pub fn handle_action(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::Navigate(key) => {
                self.handle_key(key);
            }
            InputAction::Rotate { dx, dy } => {
                self.controls.rotate(dx, dy, self.viewport.height as f32);
            }
            InputAction::Zoom(notches) => self.controls.zoom(notches),
            InputAction::Quit => return false,
        }
        true
    }

    /// Bind the image of the descriptor at the display index to the display
    /// material; returns false and keeps the current texture when that
    /// descriptor has no image or the renderer refuses it
    pub fn update_texture(&mut self) -> bool {
        let index = self.index.current();
        let Some(image) = self.descriptors.get(index).and_then(TextureDescriptor::image) else {
            log::warn!("Texture {index} has no image yet, keeping the current one");
            return false;
        };

        if let Err(e) = self.renderer.bind_display_texture(index, image) {
            log::error!("Cannot show texture {index}, keeping {:?}: {e:#}", self.bound_texture);
            return false;
        }
        self.graph.bind_display_texture(index);
        self.bound_texture = Some(index);
        true
    }

    /// Follow a window resize: the drawing area shrinks by the body margin
    /// on every side, camera aspect and renderer follow it
    pub fn resize(&mut self, window_width: u32, window_height: u32) {
        let viewport = self.config.apply_window_size(window_width, window_height);
        self.viewport = viewport;

        match viewport.aspect() {
            Some(aspect) => self.camera.set_aspect(aspect),
            None => log::debug!("Viewport is empty, keeping camera aspect {}", self.camera.aspect),
        }
        self.renderer.resize(window_width, window_height, viewport);
    }

    /// One frame: move the camera by the queued input, then draw
    pub fn advance(&mut self, delta: f32) -> anyhow::Result<()> {
        self.controls.update(&mut self.camera, delta);
        if self.viewport.is_empty() {
            return Ok(());
        }
        self.renderer.render(&self.camera)
    }
}
