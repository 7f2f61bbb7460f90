pub mod mat4;
pub mod quat;
pub mod spherical;
pub mod vec;

pub use mat4::*;
pub use quat::*;
pub use spherical::*;
pub use vec::*;
