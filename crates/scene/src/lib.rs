pub mod command;
pub mod connector;
pub mod error;
pub mod globe;
pub mod hierarchy;
pub mod intent;
pub mod interaction;
pub mod node;

pub use command::*;
pub use connector::Connector;
pub use error::SceneError;
pub use globe::GlobeTransform;
pub use hierarchy::NodeHierarchy;
pub use intent::Intent;
pub use interaction::*;
pub use node::*;
