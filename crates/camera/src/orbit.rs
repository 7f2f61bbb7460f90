//! Damped orbit controls around the camera target.
//!
//! Every update re-reads the camera position, so tweens that move the camera
//! directly stay in sync with the controls:
//! - input accumulates spherical deltas,
//! - `update` applies a damped share of them and decays the rest,
//! - distance is clamped only while the controls are enabled.

use std::f64::consts::{PI, TAU};

use foundation::math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::perspective::PerspectiveCamera;

/// Keeps the polar angle away from the poles so `look_at` stays defined.
const POLAR_EPSILON: f64 = 1e-6;

/// Zoom step per wheel notch before `zoom_speed` is applied.
const WHEEL_ZOOM_STEP: f64 = 0.95;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub damping_factor: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    /// Turns per minute (`2π/60 × speed` radians per second).
    pub auto_rotate_speed: f64,
    pub rotate_speed: f64,
    pub zoom_speed: f64,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.05,
            min_distance: 20.0,
            max_distance: 100.0,
            auto_rotate_speed: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Spherical {
    radius: f64,
    /// Polar angle from +Y.
    phi: f64,
    /// Azimuth around +Y, measured from +Z towards +X.
    theta: f64,
}

impl Spherical {
    fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self {
                radius,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
            theta: v.x.atan2(v.z),
        }
    }

    fn to_offset(self) -> Vec3 {
        let ring = self.phi.sin() * self.radius;
        Vec3::new(
            ring * self.theta.sin(),
            self.phi.cos() * self.radius,
            ring * self.theta.cos(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct OrbitControls {
    config: OrbitConfig,
    enabled: bool,
    auto_rotate: bool,
    dragging: bool,
    last_pointer_px: Vec2,
    viewport_height: f64,
    delta_theta: f64,
    delta_phi: f64,
    scale: f64,
}

impl OrbitControls {
    /// Controls start disabled; the host enables them once the camera is
    /// in place.
    pub fn new(config: OrbitConfig) -> Self {
        Self {
            config,
            enabled: false,
            auto_rotate: false,
            dragging: false,
            last_pointer_px: Vec2::default(),
            viewport_height: 720.0,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
        }
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.dragging = false;
        }
    }

    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    pub fn set_auto_rotate(&mut self, auto_rotate: bool) {
        self.auto_rotate = auto_rotate;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = if height.is_finite() { height.max(1.0) } else { 1.0 };
    }

    /// Starts a rotate drag. Returns `true` if the drag was accepted, which
    /// the host reports as a drag-start intent.
    pub fn on_pointer_down(&mut self, pos_px: Vec2) -> bool {
        if !self.enabled || !pos_px.is_finite() {
            return false;
        }
        self.dragging = true;
        self.last_pointer_px = pos_px;
        true
    }

    pub fn on_pointer_move(&mut self, pos_px: Vec2) {
        if !self.enabled || !self.dragging || !pos_px.is_finite() {
            return;
        }
        let delta = pos_px - self.last_pointer_px;
        self.last_pointer_px = pos_px;

        let per_px = TAU * self.config.rotate_speed / self.viewport_height;
        self.delta_theta -= delta.x * per_px;
        self.delta_phi -= delta.y * per_px;
    }

    pub fn on_pointer_up(&mut self) {
        self.dragging = false;
    }

    /// Positive deltas zoom out, negative zoom in.
    pub fn on_wheel(&mut self, delta: f64) {
        if !self.enabled || !delta.is_finite() || delta == 0.0 {
            return;
        }
        let step = WHEEL_ZOOM_STEP.powf(self.config.zoom_speed);
        if delta < 0.0 {
            self.scale *= step;
        } else {
            self.scale /= step;
        }
    }

    fn auto_rotate_angle(&self, dt_s: f64) -> f64 {
        TAU / 60.0 * self.config.auto_rotate_speed * dt_s
    }

    /// Applies pending motion to `camera`. Returns `true` if it moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera, dt_s: f64) -> bool {
        let offset = camera.position - camera.target;
        let mut s = Spherical::from_offset(offset);

        if self.enabled && self.auto_rotate && !self.dragging && dt_s > 0.0 {
            self.delta_theta -= self.auto_rotate_angle(dt_s);
        }

        let damping = self.config.damping_factor.clamp(0.0, 1.0);
        s.theta += self.delta_theta * damping;
        s.phi = (s.phi + self.delta_phi * damping).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        if self.enabled {
            let (min, max) = (self.config.min_distance, self.config.max_distance);
            s.radius = (s.radius * self.scale).clamp(min, max);
        }

        self.delta_theta *= 1.0 - damping;
        self.delta_phi *= 1.0 - damping;
        self.scale = 1.0;

        if s.radius == 0.0 {
            return false;
        }
        let next = camera.target + s.to_offset();
        if !next.is_finite() {
            return false;
        }
        let moved = next.distance(camera.position) > 1e-12;
        camera.position = next;
        moved
    }
}
