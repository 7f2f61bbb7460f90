use foundation::math::{
    Mat4, Vec3, mat4_look_at_rh, mat4_mul, mat4_mul_vec4, mat4_perspective_rh_gl,
};
use serde::{Deserialize, Serialize};

/// Drawable surface size in pixels. Never smaller than 1x1.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: sanitize_extent(width),
            height: sanitize_extent(height),
        }
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

fn sanitize_extent(v: f64) -> f64 {
    if v.is_finite() { v.max(1.0) } else { 1.0 }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LensConfig {
    pub fov_y_deg: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 45.0,
            near: 0.1,
            far: 3000.0,
        }
    }
}

/// Perspective camera orbiting `target`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub lens: LensConfig,
    aspect: f64,
}

impl PerspectiveCamera {
    pub fn new(position: Vec3, lens: LensConfig, viewport: Viewport) -> Self {
        Self {
            position,
            target: Vec3::ZERO,
            up: Vec3::new(0.0, 1.0, 0.0),
            lens,
            aspect: viewport.aspect(),
        }
    }

    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.aspect = viewport.aspect();
    }

    pub fn distance_to_target(&self) -> f64 {
        self.position.distance(self.target)
    }

    pub fn view(&self) -> Mat4 {
        mat4_look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        mat4_perspective_rh_gl(
            self.lens.fov_y_deg.to_radians(),
            self.aspect,
            self.lens.near,
            self.lens.far,
        )
    }

    pub fn view_proj(&self) -> Mat4 {
        mat4_mul(self.projection(), self.view())
    }

    /// Projects a world point to normalized device coordinates.
    ///
    /// Returns `None` for points at or behind the eye plane and for any
    /// non-finite result.
    pub fn project(&self, world: Vec3) -> Option<Vec3> {
        let clip = mat4_mul_vec4(self.view_proj(), [world.x, world.y, world.z, 1.0]);
        let w = clip[3];
        if !(w.is_finite() && w > 1e-12) {
            return None;
        }
        let ndc = Vec3::new(clip[0] / w, clip[1] / w, clip[2] / w);
        ndc.is_finite().then_some(ndc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(
            Vec3::new(0.0, 0.0, 50.0),
            LensConfig::default(),
            Viewport::new(800.0, 600.0),
        )
    }

    #[test]
    fn viewport_rejects_degenerate_sizes() {
        let v = Viewport::new(0.0, f64::NAN);
        assert_eq!(v, Viewport::new(1.0, 1.0));
        assert_eq!(v.aspect(), 1.0);
    }

    #[test]
    fn target_projects_to_center() {
        let ndc = camera().project(Vec3::ZERO).expect("in front");
        assert!(ndc.x.abs() < 1e-12 && ndc.y.abs() < 1e-12);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }

    #[test]
    fn right_and_up_keep_their_signs() {
        let cam = camera();
        let right = cam.project(Vec3::new(5.0, 0.0, 0.0)).expect("visible");
        let up = cam.project(Vec3::new(0.0, 5.0, 0.0)).expect("visible");
        assert!(right.x > 0.0);
        assert!(up.y > 0.0);
    }

    #[test]
    fn behind_the_eye_is_unprojectable() {
        assert!(camera().project(Vec3::new(0.0, 0.0, 80.0)).is_none());
    }

    #[test]
    fn resize_updates_aspect() {
        let mut cam = camera();
        cam.resize(Viewport::new(1000.0, 500.0));
        assert_eq!(cam.aspect(), 2.0);
    }
}
