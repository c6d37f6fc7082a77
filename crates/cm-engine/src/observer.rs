//! Run observer callbacks for progress reporting and log collection.

use crate::{RunReport, StepRecord};

/// Callbacks invoked by both executors at the boundaries of a run.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  The execution-log collaborator plugs
/// in here: `on_step` receives each snapshot as soon as the unit of work
/// completes, including the steps leading up to an aborted run.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl RunObserver for ProgressPrinter {
///     fn on_step(&mut self, record: &StepRecord) {
///         if record.index % 1000 == 0 {
///             println!("step {}", record.index);
///         }
///     }
/// }
/// ```
pub trait RunObserver {
    /// Called once before the first unit of work.
    fn on_run_start(&mut self) {}

    /// Called after each completed round or processed event.
    fn on_step(&mut self, _record: &StepRecord) {}

    /// Called once after the run completes normally.  Not called for
    /// aborted runs — the executor's returned error reports those.
    fn on_run_end(&mut self, _report: &RunReport) {}
}

/// A [`RunObserver`] that does nothing.  Use when you only need the
/// returned [`RunReport`].
pub struct NoopObserver;

impl RunObserver for NoopObserver {}
