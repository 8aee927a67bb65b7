use std::sync::Arc;

use crate::camera::PerspectiveCamera;
use crate::core::Viewport;
use crate::texture::TextureImage;

/// Scene renderer - draws the built scene and owns its GPU resources
pub trait SceneRenderer {
    /// Bind `image` (texture descriptor `index`) to the display material.
    /// On error the previously bound texture stays active.
    fn bind_display_texture(&mut self, index: usize, image: &Arc<TextureImage>) -> anyhow::Result<()>;

    /// Window resized: the surface covers the window, drawing is limited
    /// to `viewport`
    fn resize(&mut self, window_width: u32, window_height: u32, viewport: Viewport);

    /// Draw one frame through `camera`
    fn render(&mut self, camera: &PerspectiveCamera) -> anyhow::Result<()>;
}
