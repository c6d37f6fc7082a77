//! CSV output backend.
//!
//! A flat tabular view of the trace: the fixed columns `step`, `round`,
//! `time`, `event`, followed by one `input_<name>` column per declared
//! input, one `output_<name>` per declared output, and one `state_<key>`
//! per key of the component's state at writer creation.  State keys a task
//! invents mid-run are not representable in a streaming header and are
//! omitted; use the JSON backend when that matters.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use cm_core::Value;
use cm_engine::StepRecord;
use cm_model::Component;

use crate::OutputResult;
use crate::writer::TraceWriter;

/// Streams step records to one CSV file with a header fixed up front.
pub struct CsvTraceWriter {
    out:         Writer<File>,
    input_keys:  Vec<String>,
    output_keys: Vec<String>,
    state_keys:  Vec<String>,
    finished:    bool,
}

impl CsvTraceWriter {
    /// Create (or truncate) the file at `path` and write the header row
    /// derived from `component`'s declarations.
    pub fn new(path: &Path, component: &Component) -> OutputResult<Self> {
        let input_keys = component.input_names.clone();
        let output_keys = component.output_names.clone();
        let state_keys: Vec<String> = component.state.keys().cloned().collect();

        let mut header = vec![
            "step".to_string(),
            "round".to_string(),
            "time".to_string(),
            "event".to_string(),
        ];
        header.extend(input_keys.iter().map(|k| format!("input_{k}")));
        header.extend(output_keys.iter().map(|k| format!("output_{k}")));
        header.extend(state_keys.iter().map(|k| format!("state_{k}")));

        let mut out = Writer::from_path(path)?;
        out.write_record(&header)?;

        Ok(Self {
            out,
            input_keys,
            output_keys,
            state_keys,
            finished: false,
        })
    }
}

impl TraceWriter for CsvTraceWriter {
    fn write_step(&mut self, record: &StepRecord) -> OutputResult<()> {
        let mut row = vec![
            record.index.to_string(),
            record.round.map(|r| r.to_string()).unwrap_or_default(),
            record.time.map(|t| t.to_string()).unwrap_or_default(),
            record.event.clone().unwrap_or_default(),
        ];
        row.extend(self.input_keys.iter().map(|k| cell(record.inputs.get(k))));
        row.extend(self.output_keys.iter().map(|k| cell(record.outputs.get(k))));
        row.extend(self.state_keys.iter().map(|k| cell(record.state.get(k))));
        self.out.write_record(&row)?;
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

/// Render one value as a CSV cell: scalars unquoted, collections as
/// compact JSON, missing/null as empty.
fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}
