use thiserror::Error;

/// Failure of a single frame stage.
///
/// Stage errors never stop the frame loop: the scheduler skips the rest of the
/// frame and reports the fault.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("non-finite value in {what}")]
    NonFinite { what: &'static str },

    #[error("{0}")]
    Stage(String),
}

impl FrameError {
    pub fn stage(message: impl Into<String>) -> Self {
        Self::Stage(message.into())
    }
}

/// A frame stage failure tagged with the stage that raised it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("frame {frame_index} stage `{stage}` failed: {error}")]
pub struct FrameFault {
    pub frame_index: u64,
    pub stage: &'static str,
    pub error: FrameError,
}
