pub mod notes;
pub mod spark;

pub use notes::*;
pub use spark::*;
