use tracing::warn;

use crate::error::FrameFault;
use crate::frame::Frame;
use crate::job::Job;

#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    Completed { ran_stages: usize },
    /// A stage failed; the remaining stages of this frame were not run.
    Skipped(FrameFault),
}

impl FrameOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, FrameOutcome::Completed { .. })
    }
}

/// Ordered frame pipeline over a context `C`.
///
/// Later stages observe everything earlier stages wrote in the same frame.
/// A failing stage aborts only the current frame; the scheduler itself never
/// panics or stops.
pub struct Scheduler<C> {
    next_order: u64,
    jobs: Vec<(u64, Job<C>)>,
    sorted: bool,
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self {
            next_order: 0,
            jobs: Vec::new(),
            sorted: true,
        }
    }
}

impl<C> Scheduler<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_job(&mut self, job: Job<C>) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);
        self.jobs.push((order, job));
        self.sorted = false;
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Stage ids in execution order.
    pub fn stage_order(&mut self) -> Vec<&'static str> {
        self.sort();
        self.jobs.iter().map(|(_, job)| job.id).collect()
    }

    /// Run all stages for the given frame.
    pub fn run_frame(&mut self, ctx: &mut C, frame: Frame) -> FrameOutcome {
        self.sort();

        let mut ran = 0usize;
        for (_order, job) in &self.jobs {
            if let Err(error) = (job.run)(ctx, frame) {
                let fault = FrameFault {
                    frame_index: frame.index,
                    stage: job.id,
                    error,
                };
                warn!(%fault, "skipping rest of frame");
                return FrameOutcome::Skipped(fault);
            }
            ran += 1;
        }

        FrameOutcome::Completed { ran_stages: ran }
    }

    fn sort(&mut self) {
        if self.sorted {
            return;
        }
        // Total ordering: (priority, insertion_order).
        self.jobs
            .sort_by(|(oa, a), (ob, b)| a.priority.cmp(&b.priority).then_with(|| oa.cmp(ob)));
        self.sorted = true;
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameOutcome, Scheduler};
    use crate::error::FrameError;
    use crate::frame::Frame;
    use crate::job::Job;

    #[derive(Default)]
    struct Trace {
        calls: Vec<&'static str>,
    }

    fn stage_a(ctx: &mut Trace, _frame: Frame) -> Result<(), FrameError> {
        ctx.calls.push("a");
        Ok(())
    }

    fn stage_b(ctx: &mut Trace, _frame: Frame) -> Result<(), FrameError> {
        ctx.calls.push("b");
        Ok(())
    }

    fn stage_fail(ctx: &mut Trace, _frame: Frame) -> Result<(), FrameError> {
        ctx.calls.push("fail");
        Err(FrameError::stage("boom"))
    }

    #[test]
    fn runs_stages_in_priority_order() {
        let mut sched = Scheduler::new();
        sched.add_job(Job::with_priority("b", 10, stage_b));
        sched.add_job(Job::with_priority("a", -1, stage_a));

        let mut trace = Trace::default();
        let outcome = sched.run_frame(&mut trace, Frame::first(1.0));
        assert_eq!(trace.calls, vec!["a", "b"]);
        assert_eq!(outcome, FrameOutcome::Completed { ran_stages: 2 });
    }

    #[test]
    fn equal_priorities_run_in_insertion_order() {
        let mut sched = Scheduler::new();
        sched.add_job(Job::new("b", stage_b));
        sched.add_job(Job::new("a", stage_a));
        assert_eq!(sched.stage_order(), vec!["b", "a"]);
    }

    #[test]
    fn failing_stage_skips_rest_of_frame_only() {
        let mut sched = Scheduler::new();
        sched.add_job(Job::with_priority("a", 0, stage_a));
        sched.add_job(Job::with_priority("fail", 1, stage_fail));
        sched.add_job(Job::with_priority("b", 2, stage_b));

        let mut trace = Trace::default();
        let outcome = sched.run_frame(&mut trace, Frame::first(1.0));
        let FrameOutcome::Skipped(fault) = outcome else {
            panic!("expected skipped frame");
        };
        assert_eq!(fault.stage, "fail");
        assert_eq!(trace.calls, vec!["a", "fail"]);

        // The next frame still runs from the top.
        let _ = sched.run_frame(&mut trace, Frame::new(1, 1.0));
        assert_eq!(trace.calls, vec!["a", "fail", "a", "fail"]);
    }
}
