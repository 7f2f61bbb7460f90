use foundation::math::{Quat, Vec3};

/// Yaw added per reference frame (1/60 s) while the globe idles.
pub const DEFAULT_SPIN_PER_FRAME: f64 = 0.0002;

/// Rotation of the node group about the vertical axis.
///
/// Written by the animation stage only; every other stage reads the rotation
/// as of the start of its own work.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlobeTransform {
    yaw: f64,
    spin_per_frame: f64,
}

impl Default for GlobeTransform {
    fn default() -> Self {
        Self::new(DEFAULT_SPIN_PER_FRAME)
    }
}

impl GlobeTransform {
    pub fn new(spin_per_frame: f64) -> Self {
        Self {
            yaw: 0.0,
            spin_per_frame,
        }
    }

    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub fn set_yaw(&mut self, yaw: f64) {
        self.yaw = yaw;
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// Advances the idle spin by `frames` reference frames.
    pub fn spin(&mut self, frames: f64) {
        self.yaw = (self.yaw + self.spin_per_frame * frames) % std::f64::consts::TAU;
    }

    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.rotation().rotate(local)
    }
}
