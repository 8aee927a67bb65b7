//! One-time assembly of the preview scene.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};

use crate::camera::PerspectiveCamera;
use crate::config::PreviewConfig;
use crate::controls::OrbitControls;
use crate::core::Viewport;
use crate::error::GeometryError;
use crate::geometry::{cylinder_mesh, extrude_shape, ring_shape};
use crate::loaders::AssetsReady;
use crate::texture::{TextureDescriptor, TextureSettings};

use super::graph::{AmbientLight, Lights, Material, MeshNode, PointLight, SceneGraph, Side};

/// Point light hanging above the display center
const POINT_LIGHT: PointLight = PointLight {
    position: Vec3::new(0.0, 6.0, 0.0),
    color: 0xffffff,
    intensity: 4.0,
    distance: 40.0,
    decay: 0.0,
};

const AMBIENT_LIGHT: AmbientLight = AmbientLight {
    color: 0xffffff,
    intensity: 1.0,
};

/// Scene plus the camera and controls that look at it
#[derive(Debug)]
pub struct BuiltScene {
    pub graph: SceneGraph,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub viewport: Viewport,
}

pub struct SceneBuilder<'a> {
    config: &'a PreviewConfig,
}

impl<'a> SceneBuilder<'a> {
    pub fn new(config: &'a PreviewConfig) -> Self {
        Self { config }
    }

    /// Build the scene showing descriptor `index`. Requires the token from a
    /// completed load, so it cannot run before every texture is decoded.
    pub fn build(
        &self,
        ready: AssetsReady,
        descriptors: &[TextureDescriptor],
        index: usize,
        viewport: Viewport,
    ) -> Result<BuiltScene, GeometryError> {
        log::info!(
            "Building scene for {} loaded texture(s), showing texture {}",
            ready.count(),
            index
        );

        let lights = Lights {
            ambient: AMBIENT_LIGHT,
            point: POINT_LIGHT,
        };
        let display = self.display_node(descriptors, index);
        let frame = self.frame_node()?;

        let scene = &self.config.scene;
        let aspect = viewport
            .aspect()
            .unwrap_or(scene.canvas.width as f32 / scene.canvas.height.max(1) as f32);
        let camera = PerspectiveCamera::new(&scene.camera, aspect);
        let controls = OrbitControls::new(camera.target, self.config.controls);

        log::debug!(
            "Display mesh: {} triangles, frame mesh: {} triangles",
            display.mesh.triangle_count(),
            frame.mesh.triangle_count()
        );

        Ok(BuiltScene {
            graph: SceneGraph {
                background: scene.background,
                lights,
                display,
                frame,
            },
            camera,
            controls,
            viewport,
        })
    }

    fn display_node(&self, descriptors: &[TextureDescriptor], index: usize) -> MeshNode {
        let display = &self.config.display;
        let mesh = cylinder_mesh(display.radius, display.height, &display.geometry);
        let texture = descriptors.get(index).filter(|d| d.is_loaded()).map(|_| index);
        let repeat_u = descriptors
            .get(index)
            .and_then(TextureDescriptor::image)
            .map_or(TextureSettings::for_cylinder().repeat_u, |image| image.settings.repeat_u);

        MeshNode {
            name: "display",
            mesh,
            transform: Mat4::from_translation(Vec3::new(
                0.0,
                display.height / 2.0 + display.above_ground,
                0.0,
            )),
            material: Material::Basic {
                color: 0xffffff,
                texture,
                repeat_u,
                side: Side::Back,
            },
        }
    }

    fn frame_node(&self) -> Result<MeshNode, GeometryError> {
        let display = &self.config.display;
        let model = &display.model;
        let shape = ring_shape(
            model.inner_radius(display.radius),
            model.outer_radius(display.radius),
            model.radial_segments,
        );
        let mesh = extrude_shape(&shape, display.height)?;

        // Extrusion runs along +Z; turning it about X stands the ring up,
        // hanging down from the top of the display
        let transform = Mat4::from_translation(Vec3::new(
            0.0,
            display.height + display.above_ground,
            0.0,
        )) * Mat4::from_rotation_x(FRAC_PI_2);

        Ok(MeshNode {
            name: "frame",
            mesh,
            transform,
            material: Material::Standard {
                color: model.color,
                roughness: 1.0,
                metalness: 0.0,
                side: Side::Front,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::{TextureImage, TextureSource};

    fn loaded(count: usize) -> Vec<TextureDescriptor> {
        (0..count)
            .map(|i| {
                let mut d = TextureDescriptor::new(TextureSource::memory(format!("t{i}"), vec![]));
                d.attach(TextureImage::new(2, 1, vec![0; 8]).with_settings(TextureSettings::for_cylinder()));
                d
            })
            .collect()
    }

    fn build(config: &PreviewConfig) -> BuiltScene {
        SceneBuilder::new(config)
            .build(AssetsReady::for_tests(2), &loaded(2), 0, Viewport::new(1280, 720))
            .unwrap()
    }

    #[test]
    fn test_lights_match_preset() {
        let scene = build(&PreviewConfig::default());
        let lights = scene.graph.lights;
        assert_eq!(lights.point.position, Vec3::new(0.0, 6.0, 0.0));
        assert_eq!(lights.point.intensity, 4.0);
        assert_eq!(lights.point.distance, 40.0);
        assert_eq!(lights.point.decay, 0.0);
        assert_eq!(lights.ambient.intensity, 1.0);
    }

    #[test]
    fn test_display_is_back_sided_and_textured() {
        let scene = build(&PreviewConfig::default());
        let display = &scene.graph.display;
        assert_eq!(display.material.side(), Side::Back);
        assert_eq!(display.material.texture(), Some(0));

        let center = display.transform.transform_point3(Vec3::ZERO);
        assert!((center.y - (1.851 / 2.0 + 1.0)).abs() < 1e-5);
        assert_eq!(display.to_uniform().uv_transform, [-1.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_frame_spans_display_height() {
        let config = PreviewConfig::default();
        let scene = build(&config);
        let frame = &scene.graph.frame;
        assert_eq!(frame.material.side(), Side::Front);

        let (min, max) = frame.mesh.bounds();
        let low = frame.transform.transform_point3(min);
        let high = frame.transform.transform_point3(max);
        let (bottom, top) = (low.y.min(high.y), low.y.max(high.y));
        assert!((bottom - 1.0).abs() < 1e-4);
        assert!((top - (1.851 + 1.0)).abs() < 1e-4);
    }

    #[test]
    fn test_camera_and_controls_follow_config() {
        let scene = build(&PreviewConfig::default());
        assert!((scene.camera.aspect - 1280.0 / 720.0).abs() < 1e-6);
        assert_eq!(scene.camera.fov_degrees, 45.0);
        assert_eq!(scene.controls.target, Vec3::new(0.0, 1.9, 0.0));
        assert_eq!(scene.controls.config().max_distance, 20.0);
    }

    #[test]
    fn test_empty_viewport_falls_back_to_canvas_aspect() {
        let config = PreviewConfig::default();
        let scene = SceneBuilder::new(&config)
            .build(AssetsReady::for_tests(1), &loaded(1), 0, Viewport::new(0, 0))
            .unwrap();
        assert!((scene.camera.aspect - 1280.0 / 720.0).abs() < 1e-6);
    }
}
