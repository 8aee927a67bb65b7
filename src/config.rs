//! Preview configuration: scene, cylindrical display, controls and chart options.
//!
//! Every field has a default, so a JSON file only needs the keys it overrides.
//! Lengths are in meters (1 unit == 1 meter), angles in radians unless the
//! field name says degrees.

use std::f32::consts::PI;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub look_at: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.2,
            far: 100.0,
            position: [0.0, 1.9, 2.0],
            look_at: [0.0, 1.9, 0.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub canvas: CanvasConfig,
    pub camera: CameraConfig,
    /// Background color as 0xRRGGBB
    pub background: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            camera: CameraConfig::default(),
            background: 0xdeebf7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CylinderGeometryConfig {
    pub radial_segments: u32,
    pub height_segments: u32,
    pub open_ended: bool,
    pub theta_start: f32,
    pub theta_length: f32,
}

impl Default for CylinderGeometryConfig {
    fn default() -> Self {
        Self {
            radial_segments: 256,
            height_segments: 32,
            open_ended: true,
            theta_start: 0.0,
            theta_length: PI * 2.0,
        }
    }
}

/// The physical ring frame around the projection surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Gap between the projection surface and the inner side of the frame
    pub offset: f32,
    pub width: f32,
    pub radial_segments: u32,
    pub color: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            offset: 0.02,
            width: 0.25,
            radial_segments: 64,
            color: 0xf0f0f0,
        }
    }
}

impl ModelConfig {
    pub fn inner_radius(&self, display_radius: f32) -> f32 {
        display_radius + self.offset
    }

    pub fn outer_radius(&self, display_radius: f32) -> f32 {
        display_radius + self.width - self.offset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub radius: f32,
    pub height: f32,
    /// Clearance between the ground and the lower edge of the display
    pub above_ground: f32,
    pub geometry: CylinderGeometryConfig,
    pub model: ModelConfig,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            radius: 3.0,
            height: 1.851,
            above_ground: 1.0,
            geometry: CylinderGeometryConfig::default(),
            model: ModelConfig::default(),
        }
    }
}

impl DisplayConfig {
    /// Aspect ratio (circumference : height) a texture should have to cover
    /// the full display without stretching.
    pub fn ideal_texture_aspect(&self) -> f32 {
        2.0 * PI * self.radius / self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            min_distance: 0.1,
            max_distance: 20.0,
            min_polar_angle: 0.0,
            max_polar_angle: 0.6 * PI,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
        }
    }
}

/// How to pick the root event when several events have no incoming edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RootPolicy {
    /// First candidate in table order
    #[default]
    FirstInTableOrder,
    /// Exactly one candidate must exist
    Unique,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: f32,
    /// Vertical spacing between neighbouring leaves
    pub node_spacing: f32,
    pub node_radius: f32,
    pub label_length: usize,
    pub max_texture_dimension: u32,
    pub root_policy: RootPolicy,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            node_spacing: 10.0,
            node_radius: 2.5,
            label_length: 30,
            max_texture_dimension: 8192,
            root_policy: RootPolicy::FirstInTableOrder,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub scene: SceneConfig,
    pub display: DisplayConfig,
    pub controls: ControlsConfig,
    pub chart: ChartConfig,
    /// Margin around the drawing area in physical pixels
    pub body_margin: u32,
    /// Image files shown after the generated chart, in order
    pub textures: Vec<PathBuf>,
}

impl PreviewConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let display = &self.display;
        if display.radius <= 0.0 || display.height <= 0.0 {
            return Err(ConfigError::Invalid(
                "display radius and height must be positive".to_string(),
            ));
        }
        if display.geometry.radial_segments < 3 || display.model.radial_segments < 3 {
            return Err(ConfigError::Invalid(
                "radial segment counts must be at least 3".to_string(),
            ));
        }
        if display.geometry.height_segments == 0 {
            return Err(ConfigError::Invalid(
                "height_segments must be at least 1".to_string(),
            ));
        }
        if display.model.inner_radius(display.radius) >= display.model.outer_radius(display.radius) {
            return Err(ConfigError::Invalid(
                "model width must exceed twice the model offset".to_string(),
            ));
        }
        let controls = &self.controls;
        if controls.min_distance > controls.max_distance {
            return Err(ConfigError::Invalid(
                "controls.min_distance exceeds max_distance".to_string(),
            ));
        }
        if controls.min_polar_angle > controls.max_polar_angle {
            return Err(ConfigError::Invalid(
                "controls.min_polar_angle exceeds max_polar_angle".to_string(),
            ));
        }
        Ok(())
    }

    /// Recompute the canvas size from the window size, the way the page
    /// subtracted its body margin on both sides.
    pub fn apply_window_size(&mut self, window_width: u32, window_height: u32) -> Viewport {
        let viewport = Viewport::from_window(window_width, window_height, self.body_margin);
        self.scene.canvas.width = viewport.width;
        self.scene.canvas.height = viewport.height;
        viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_display_dimensions() {
        let config = PreviewConfig::default();
        assert_eq!(config.display.radius, 3.0);
        assert_eq!(config.display.height, 1.851);
        assert_eq!(config.scene.background, 0xdeebf7);
        assert_eq!(config.scene.camera.position, [0.0, 1.9, 2.0]);
        assert!((config.controls.max_polar_angle - 0.6 * PI).abs() < 1e-6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "display": { "radius": 2.5 }, "body_margin": 8 }"#;
        let config: PreviewConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.display.radius, 2.5);
        assert_eq!(config.display.height, 1.851);
        assert_eq!(config.body_margin, 8);
        assert_eq!(config.chart.root_policy, RootPolicy::FirstInTableOrder);
    }

    #[test]
    fn unknown_control_keys_are_ignored() {
        let json = r#"{ "controls": { "enable_pan": true, "max_distance": 12.0 } }"#;
        let config: PreviewConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.controls.max_distance, 12.0);
        assert_eq!(config.controls, ControlsConfig { max_distance: 12.0, ..Default::default() });
    }

    #[test]
    fn root_policy_uses_kebab_case() {
        let json = r#"{ "chart": { "root_policy": "unique" } }"#;
        let config: PreviewConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.chart.root_policy, RootPolicy::Unique);
    }

    #[test]
    fn rejects_frame_thinner_than_offsets() {
        let mut config = PreviewConfig::default();
        config.display.model.width = 0.03;
        assert!(config.validate().is_err());
    }

    #[test]
    fn window_size_updates_canvas() {
        let mut config = PreviewConfig {
            body_margin: 8,
            ..Default::default()
        };
        let viewport = config.apply_window_size(1000, 600);
        assert_eq!((viewport.width, viewport.height), (984, 584));
        assert_eq!(config.scene.canvas.width, 984);
        assert_eq!(config.scene.canvas.height, 584);
    }

    #[test]
    fn ideal_aspect_is_circumference_over_height() {
        let display = DisplayConfig::default();
        let expected = 2.0 * PI * 3.0 / 1.851;
        assert!((display.ideal_texture_aspect() - expected).abs() < 1e-4);
    }
}
