//! The `TraceWriter` trait implemented by all backend writers.

use cm_engine::StepRecord;

use crate::OutputResult;

/// Trait implemented by the JSON Lines and CSV trace writers.
///
/// Writers receive one [`StepRecord`] per completed round or processed
/// event, in trace order, and a final `finish` when the run ends.
pub trait TraceWriter {
    /// Write one step of the trace.
    fn write_step(&mut self, record: &StepRecord) -> OutputResult<()>;

    /// Flush and close the underlying file handle.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
