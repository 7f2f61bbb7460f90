pub mod easing;
pub mod focus;
pub mod orbit;
pub mod perspective;
pub mod rig;
pub mod tween;

pub use easing::Easing;
pub use focus::*;
pub use orbit::{OrbitConfig, OrbitControls};
pub use perspective::*;
pub use rig::{CameraConfig, CameraRig};
pub use tween::*;
