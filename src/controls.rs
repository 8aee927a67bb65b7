//! Orbit camera controls.
//!
//! The camera circles a target point on a sphere. Pointer drags queue
//! rotation, wheel notches queue zoom, and `update` applies the queued motion
//! within the configured distance and polar-angle limits. The target never
//! moves.

use std::f32::consts::PI;

use glam::Vec3;

use crate::camera::PerspectiveCamera;
use crate::config::ControlsConfig;

/// Zoom factor per wheel notch at zoom speed 1
const ZOOM_BASE: f32 = 0.95;
/// Keeps the polar angle away from the poles, where the view matrix degenerates
const POLE_EPSILON: f32 = 1e-6;
/// Damping factors are tuned per frame at this rate
const REFERENCE_FPS: f32 = 60.0;

/// Position relative to the target in spherical coordinates, Y up.
///
/// `theta` is measured around Y from +Z towards +X, `phi` down from +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self {
                radius,
                theta: 0.0,
                phi: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        Vec3::new(
            self.radius * sin_phi * sin_theta,
            self.radius * cos_phi,
            self.radius * sin_phi * cos_theta,
        )
    }
}

#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    config: ControlsConfig,
    /// Pending rotation (theta, phi) not yet applied
    pending_theta: f32,
    pending_phi: f32,
    /// Pending radius multiplier
    pending_scale: f32,
}

impl OrbitControls {
    pub fn new(target: Vec3, config: ControlsConfig) -> Self {
        Self {
            target,
            config,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_scale: 1.0,
        }
    }

    pub fn config(&self) -> &ControlsConfig {
        &self.config
    }

    /// Queue a drag of `dx`, `dy` pixels in a viewport `viewport_height`
    /// pixels tall; a drag across the full height turns a full circle
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        let per_pixel = 2.0 * PI / viewport_height * self.config.rotate_speed;
        self.pending_theta -= dx * per_pixel;
        self.pending_phi -= dy * per_pixel;
    }

    /// Queue `notches` wheel steps, positive moves towards the target
    pub fn zoom(&mut self, notches: f32) {
        self.pending_scale *= ZOOM_BASE.powf(self.config.zoom_speed * notches);
    }

    /// Whether rotation or zoom is still waiting to be applied
    pub fn has_pending_motion(&self) -> bool {
        self.pending_theta.abs() > f32::EPSILON
            || self.pending_phi.abs() > f32::EPSILON
            || (self.pending_scale - 1.0).abs() > f32::EPSILON
    }

    /// Apply queued motion to `camera`; returns true if the camera moved.
    ///
    /// Without damping all queued motion is applied at once. With damping a
    /// `damping_factor` share is applied per 60 Hz frame, scaled by `delta`
    /// seconds, and the rest carries over.
    pub fn update(&mut self, camera: &mut PerspectiveCamera, delta: f32) -> bool {
        let previous = camera.position;
        let mut spherical = Spherical::from_offset(camera.position - self.target);

        let share = if self.config.enable_damping {
            let frames = (delta * REFERENCE_FPS).max(0.0);
            1.0 - (1.0 - self.config.damping_factor.clamp(0.0, 1.0)).powf(frames)
        } else {
            1.0
        };

        spherical.theta += self.pending_theta * share;
        spherical.phi += self.pending_phi * share;

        let min_phi = self.config.min_polar_angle.max(POLE_EPSILON);
        let max_phi = self.config.max_polar_angle.min(PI - POLE_EPSILON);
        spherical.phi = spherical.phi.clamp(min_phi.min(max_phi), max_phi);

        // Zoom is never damped
        spherical.radius = (spherical.radius * self.pending_scale)
            .clamp(self.config.min_distance, self.config.max_distance);

        camera.position = self.target + spherical.to_offset();
        camera.look_at(self.target);

        if self.config.enable_damping {
            self.pending_theta *= 1.0 - share;
            self.pending_phi *= 1.0 - share;
        } else {
            self.pending_theta = 0.0;
            self.pending_phi = 0.0;
        }
        self.pending_scale = 1.0;

        camera.position.distance_squared(previous) > 1e-12
    }
}
