//! JSON output backend.
//!
//! Two forms are provided:
//! - [`JsonLinesWriter`] streams the trace as JSON Lines, one step record
//!   per line, suitable for very long runs.
//! - [`write_report`] dumps a whole [`RunReport`] (trace plus summary) as a
//!   single pretty-printed JSON document.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use cm_engine::{RunReport, StepRecord};

use crate::OutputResult;
use crate::writer::TraceWriter;

/// Streams step records to any `Write` sink as JSON Lines.
pub struct JsonLinesWriter<W: Write> {
    out:      W,
    finished: bool,
}

impl JsonLinesWriter<BufWriter<File>> {
    /// Create (or truncate) the file at `path`.
    pub fn from_path(path: &Path) -> OutputResult<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, finished: false }
    }

    /// Unwrap the inner sink (e.g. to inspect an in-memory buffer).
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TraceWriter for JsonLinesWriter<W> {
    fn write_step(&mut self, record: &StepRecord) -> OutputResult<()> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.out.flush()?;
        Ok(())
    }
}

/// Write a completed run's full report to `path` as pretty-printed JSON.
pub fn write_report(path: &Path, report: &RunReport) -> OutputResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, report)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
