use crate::error::FrameError;
use crate::frame::Frame;

pub type StageFn<C> = fn(ctx: &mut C, frame: Frame) -> Result<(), FrameError>;

/// One ordered stage of the per-frame pipeline, run by the [`Scheduler`].
///
/// Stages run in a stable order based on `(priority, insertion order)`.
///
/// [`Scheduler`]: crate::scheduler::Scheduler
pub struct Job<C> {
    pub id: &'static str,
    /// Smaller values run earlier.
    pub priority: i32,
    pub run: StageFn<C>,
}

impl<C> Job<C> {
    pub fn new(id: &'static str, run: StageFn<C>) -> Self {
        Self {
            id,
            priority: 0,
            run,
        }
    }

    pub fn with_priority(id: &'static str, priority: i32, run: StageFn<C>) -> Self {
        Self { id, priority, run }
    }
}
