//! `cm-output` — run-trace writers for the `rust_cm` framework.
//!
//! Two backends are provided:
//!
//! | Backend    | Form                                                        |
//! |------------|-------------------------------------------------------------|
//! | JSON Lines | One `StepRecord` per line; full fidelity, streams           |
//! | CSV        | Flat columns from the component's declarations              |
//!
//! Both implement [`TraceWriter`] and are driven by [`RunLogObserver`],
//! which implements `cm_engine::RunObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use cm_output::{JsonLinesWriter, RunLogObserver};
//!
//! let writer = JsonLinesWriter::from_path(Path::new("trace.jsonl")).unwrap();
//! let mut obs = RunLogObserver::new(writer);
//! let report = executor.run(&mut obs).unwrap();
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod json;
pub mod observer;
pub mod writer;


pub use csv::CsvTraceWriter;
pub use error::{OutputError, OutputResult};
pub use json::{JsonLinesWriter, write_report};
pub use observer::RunLogObserver;
pub use writer::TraceWriter;
