//! `RunLogObserver<W>` — bridges `RunObserver` to a `TraceWriter`.

use cm_engine::{RunObserver, RunReport, StepRecord};

use crate::OutputError;
use crate::writer::TraceWriter;

/// A [`RunObserver`] that writes every step to any [`TraceWriter`] backend
/// (JSON Lines, CSV, …).
///
/// Errors from the writer are stored internally because `RunObserver`
/// methods have no return value.  After the executor's `run()` returns,
/// check for errors with [`take_error`][Self::take_error].
pub struct RunLogObserver<W: TraceWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: TraceWriter> RunLogObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after the run returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: TraceWriter> RunObserver for RunLogObserver<W> {
    fn on_step(&mut self, record: &StepRecord) {
        let result = self.writer.write_step(record);
        self.store_err(result);
    }

    fn on_run_end(&mut self, _report: &RunReport) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
