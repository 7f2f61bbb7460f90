pub mod hierarchy;
pub mod package;

pub use hierarchy::*;
pub use package::*;
