use std::cell::Cell;
use std::io::Cursor;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cylinder_preview::camera::PerspectiveCamera;
use cylinder_preview::config::{ControlsConfig, PreviewConfig};
use cylinder_preview::core::{InputAction, KeyInput, NavigationKey, Viewport};
use cylinder_preview::error::LoadError;
use cylinder_preview::loaders::{AssetLoader, FileFetcher};
use cylinder_preview::scene::{BuiltScene, PreviewSession, RenderLoop, SceneBuilder};
use cylinder_preview::texture::{TextureDescriptor, TextureImage, TextureSource};
use cylinder_preview::traits::SceneRenderer;

/// Renderer that records what the session asked of it
#[derive(Default)]
struct RecordingRenderer {
    /// Images wider than this are refused, like an over-limit GPU texture
    max_width: Option<u32>,
    active: Option<usize>,
    bound: Vec<(usize, [u8; 4])>,
    resizes: Vec<(u32, u32, Viewport)>,
    frames: usize,
}

impl SceneRenderer for RecordingRenderer {
    fn bind_display_texture(&mut self, index: usize, image: &Arc<TextureImage>) -> anyhow::Result<()> {
        if self.max_width.is_some_and(|max| image.width > max) {
            anyhow::bail!("texture {index} is {} pixels wide", image.width);
        }
        let mut first = [0u8; 4];
        first.copy_from_slice(&image.pixels[..4]);
        self.bound.push((index, first));
        self.active = Some(index);
        Ok(())
    }

    fn resize(&mut self, window_width: u32, window_height: u32, viewport: Viewport) {
        self.resizes.push((window_width, window_height, viewport));
    }

    fn render(&mut self, _camera: &PerspectiveCamera) -> anyhow::Result<()> {
        self.frames += 1;
        Ok(())
    }
}

fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(color));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn memory(label: &str, bytes: Vec<u8>) -> TextureDescriptor {
    TextureDescriptor::new(TextureSource::memory(label, bytes))
}

/// Load `descriptors`, build the scene once and start a session on it
fn start(
    config: &PreviewConfig,
    descriptors: Vec<TextureDescriptor>,
) -> (PreviewSession<RecordingRenderer>, usize) {
    start_with(config, descriptors, RecordingRenderer::default())
}

fn start_with(
    config: &PreviewConfig,
    mut descriptors: Vec<TextureDescriptor>,
    renderer: RecordingRenderer,
) -> (PreviewSession<RecordingRenderer>, usize) {
    let builds = Cell::new(0);
    let viewport = Viewport::from_window(1280, 720, config.body_margin);
    let built: BuiltScene = pollster::block_on(AssetLoader::new(FileFetcher).load_then(
        &mut descriptors,
        |ready, loaded| {
            builds.set(builds.get() + 1);
            SceneBuilder::new(config).build(ready, loaded, 0, viewport)
        },
    ))
    .unwrap()
    .unwrap();

    let session = PreviewSession::new(config.clone(), descriptors, built, renderer);
    (session, builds.get())
}

fn key(key: NavigationKey, trusted: bool) -> KeyInput {
    KeyInput { key, trusted }
}

#[cfg(test)]
mod preview_flow_tests {
    use super::*;

    #[test]
    fn test_two_textures_then_arrow_right() {
        let config = PreviewConfig::default();
        let descriptors = vec![memory("first", png(4, 2, RED)), memory("second", png(8, 2, BLUE))];
        let (mut session, builds) = start(&config, descriptors);

        assert_eq!(builds, 1, "Scene should be built exactly once");
        assert!(session.descriptors().iter().all(TextureDescriptor::is_loaded));
        assert_eq!(session.display_index(), 0);
        assert_eq!(session.bound_texture(), Some(0));
        assert_eq!(session.renderer().bound, vec![(0, RED)]);

        assert!(session.handle_key(key(NavigationKey::Next, true)));
        assert_eq!(session.display_index(), 1);
        assert_eq!(session.bound_texture(), Some(1));
        assert_eq!(session.renderer().bound.last(), Some(&(1, BLUE)));
        assert_eq!(session.graph().display.material.texture(), Some(1));

        // wraps back to the first texture
        assert!(session.handle_key(key(NavigationKey::Next, true)));
        assert_eq!(session.display_index(), 0);
        assert!(session.handle_key(key(NavigationKey::Previous, true)));
        assert_eq!(session.display_index(), 1);
    }

    #[test]
    fn test_refused_texture_keeps_previous_binding() {
        let config = PreviewConfig::default();
        let descriptors = vec![memory("small", png(4, 2, RED)), memory("wide", png(64, 2, BLUE))];
        let renderer = RecordingRenderer {
            max_width: Some(16),
            ..Default::default()
        };
        let (mut session, _) = start_with(&config, descriptors, renderer);
        assert_eq!(session.bound_texture(), Some(0));

        assert!(session.handle_key(key(NavigationKey::Next, true)));
        assert_eq!(session.display_index(), 1);
        assert_eq!(session.renderer().active, Some(0));
        assert_eq!(session.bound_texture(), session.renderer().active);
        assert_eq!(session.graph().display.material.texture(), Some(0));
        assert!(!session.update_texture());

        // back to a texture the renderer accepts
        assert!(session.handle_key(key(NavigationKey::Previous, true)));
        assert!(session.update_texture());
        assert_eq!(session.bound_texture(), Some(0));
    }

    #[test]
    fn test_synthetic_keys_are_ignored() {
        let config = PreviewConfig::default();
        let descriptors = vec![memory("first", png(2, 2, RED)), memory("second", png(2, 2, BLUE))];
        let (mut session, _) = start(&config, descriptors);

        assert!(!session.handle_key(key(NavigationKey::Next, false)));
        assert!(session.handle_action(InputAction::Navigate(key(NavigationKey::Previous, false))));
        assert_eq!(session.display_index(), 0);
        assert_eq!(session.renderer().bound.len(), 1, "No rebinding for synthetic keys");
    }

    #[test]
    fn test_single_texture_never_rebinds() {
        let config = PreviewConfig::default();
        let (mut session, _) = start(&config, vec![memory("only", png(2, 2, RED))]);

        assert!(!session.handle_key(key(NavigationKey::Next, true)));
        assert!(!session.handle_key(key(NavigationKey::Previous, true)));
        assert_eq!(session.display_index(), 0);
        assert_eq!(session.renderer().bound, vec![(0, RED)]);
    }

    #[test]
    fn test_resize_subtracts_margin_and_updates_aspect() {
        let config = PreviewConfig {
            body_margin: 8,
            ..Default::default()
        };
        let (mut session, _) = start(&config, vec![memory("only", png(2, 2, RED))]);

        session.resize(1000, 600);
        let viewport = session.viewport();
        assert_eq!((viewport.width, viewport.height), (984, 584));
        assert!((session.camera().aspect - 984.0 / 584.0).abs() < 1e-6);
        assert_eq!(session.config().scene.canvas.width, 984);
        assert_eq!(session.renderer().resizes, vec![(1000, 600, viewport)]);
    }

    #[test]
    fn test_empty_viewport_skips_drawing() {
        let config = PreviewConfig {
            body_margin: 8,
            ..Default::default()
        };
        let (mut session, _) = start(&config, vec![memory("only", png(2, 2, RED))]);
        let aspect = session.camera().aspect;

        session.advance(0.016).unwrap();
        assert_eq!(session.renderer().frames, 1);

        session.resize(12, 400);
        assert!(session.viewport().is_empty());
        assert_eq!(session.camera().aspect, aspect, "Aspect kept while nothing is visible");
        session.advance(0.016).unwrap();
        assert_eq!(session.renderer().frames, 1);
    }

    #[test]
    fn test_drag_moves_camera_and_escape_quits() {
        let config = PreviewConfig::default();
        let (mut session, _) = start(&config, vec![memory("only", png(2, 2, RED))]);
        let before = session.camera().position;

        assert!(session.handle_action(InputAction::Rotate { dx: 90.0, dy: 0.0 }));
        session.advance(0.016).unwrap();
        assert!(session.camera().position.distance(before) > 1e-3);
        assert_eq!(session.camera().target, session.controls().target);

        assert!(!session.handle_action(InputAction::Quit));
    }

    #[test]
    fn test_failed_load_never_builds_scene() {
        let config = PreviewConfig::default();
        let mut descriptors = vec![
            memory("first", png(2, 2, RED)),
            memory("broken", b"not an image".to_vec()),
            memory("third", png(2, 2, BLUE)),
        ];
        let builds = Cell::new(0);

        let result = pollster::block_on(AssetLoader::new(FileFetcher).load_then(
            &mut descriptors,
            |ready, loaded| {
                builds.set(builds.get() + 1);
                SceneBuilder::new(&config).build(ready, loaded, 0, Viewport::new(1280, 720))
            },
        ));

        let error = result.err().expect("load should fail");
        assert!(matches!(error, LoadError::Decode { index: 1, .. }));
        assert_eq!(builds.get(), 0);
        assert!(descriptors[0].is_loaded());
        assert!(!descriptors[2].is_loaded(), "Loading stops at the first failure");
    }
}

#[cfg(test)]
mod render_loop_tests {
    use super::*;

    #[test]
    fn test_each_frame_draws_once() {
        let config = PreviewConfig::default();
        let (mut session, _) = start(&config, vec![memory("only", png(2, 2, RED))]);
        let mut render_loop = RenderLoop::new();

        let first = render_loop.frame(&mut session).unwrap();
        let second = render_loop.frame(&mut session).unwrap();
        assert_eq!((first.number, second.number), (0, 1));
        assert!(first.delta >= 0.0 && second.delta >= 0.0);
        assert!(second.time >= first.time);
        assert_eq!(render_loop.frames(), 2);
        assert_eq!(session.renderer().frames, 2);
    }

    #[test]
    fn test_frames_feed_elapsed_time_to_damped_controls() {
        let config = PreviewConfig {
            controls: ControlsConfig {
                enable_damping: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let (mut session, _) = start(&config, vec![memory("only", png(2, 2, RED))]);
        let mut render_loop = RenderLoop::new();
        let start = session.camera().position;

        session.handle_action(InputAction::Rotate { dx: 120.0, dy: 0.0 });
        thread::sleep(Duration::from_millis(5));
        render_loop.frame(&mut session).unwrap();
        let after_one = session.camera().position;
        assert!(after_one.distance(start) > 1e-5, "First frame applies part of the drag");
        assert!(session.controls().has_pending_motion(), "Damping leaves the rest queued");

        thread::sleep(Duration::from_millis(5));
        render_loop.frame(&mut session).unwrap();
        assert!(session.camera().position.distance(after_one) > 1e-5, "Second frame keeps moving");
    }

    #[test]
    fn test_resume_restarts_timing() {
        let config = PreviewConfig::default();
        let (mut session, _) = start(&config, vec![memory("only", png(2, 2, RED))]);
        let mut render_loop = RenderLoop::new();
        render_loop.frame(&mut session).unwrap();

        thread::sleep(Duration::from_millis(50));
        render_loop.resume();
        let info = render_loop.frame(&mut session).unwrap();
        assert!(info.delta < 0.05, "Time spent before resume is not counted");
        assert_eq!(render_loop.frames(), 2);
    }
}
