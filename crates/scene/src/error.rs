use thiserror::Error;

use crate::node::NodeKind;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("unknown node id `{0}`")]
    InvalidNodeId(String),

    #[error("node `{id}` is {actual:?}, expected {expected:?}")]
    UnexpectedKind {
        id: String,
        expected: NodeKind,
        actual: NodeKind,
    },

    #[error("card {index} out of range for `{id}` ({len} cards)")]
    CardOutOfRange { id: String, index: usize, len: usize },

    #[error("no overlay is open for `{0}`")]
    OverlayNotOpen(String),

    #[error("duplicate node id `{0}`")]
    DuplicateNodeId(String),

    #[error("invalid hierarchy at `{id}`: {reason}")]
    InvalidHierarchy { id: String, reason: &'static str },

    #[error("globe radius must be positive and finite, got {0}")]
    InvalidRadius(f64),
}
