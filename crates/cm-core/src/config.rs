//! Run configuration recognized by both executors.

use std::time::Duration;

use crate::{CmError, CmResult, StatePredicate};

/// Top-level run configuration.
///
/// One struct covers both execution modes; mode-specific fields are ignored
/// by the other executor.  Built by the application crate (typically from a
/// CLI or a config file) and handed to an executor together with the
/// component.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Stop after this many rounds (synchronous mode).
    pub max_rounds: Option<u64>,

    /// Stop once simulated time reaches this many seconds (event-driven
    /// mode).  The bound is inclusive: the event at exactly `max_time` is
    /// still processed, then the run stops.
    pub max_time: Option<f64>,

    /// Stop after this many processed events (event-driven mode).
    pub max_events: Option<u64>,

    /// Stop as soon as this predicate over the live state holds, evaluated
    /// after every completed round or event.  Checked before any count limit.
    pub stop_condition: Option<StatePredicate>,

    /// Worker bound for concurrent task dispatch (event-driven mode).
    /// `None` dispatches on the global Rayon pool, i.e. unbounded up to the
    /// match-set size.
    pub max_workers: Option<usize>,

    /// Regenerate inputs every this many simulated seconds (event-driven
    /// mode).  `None` generates inputs once at start, if a provider is
    /// attached at all.
    pub input_interval: Option<f64>,

    /// Name of the event announcing freshly generated inputs (event-driven
    /// mode).  Tasks listen for it with an `Event` trigger.
    pub input_event: String,

    /// Seed for the random input provider.  The same seed always produces
    /// the same input sequence.
    pub seed: u64,

    /// Abort the whole run if it exceeds this much wall-clock time.  Checked
    /// between processing steps only — in-flight task dispatch is never
    /// cancelled.
    pub wall_clock_timeout: Option<Duration>,

    /// Record each step's task execution order in the log.
    pub track_task_order: bool,
}

/// Default name of the input-ready event.
pub const DEFAULT_INPUT_EVENT: &str = "input_ready";

impl RunConfig {
    /// A configuration with no limits, seed 0, and the default input event
    /// name.  A run under this config stops only when the event queue
    /// empties (event-driven) or never (synchronous) — set a limit.
    pub fn new() -> Self {
        Self {
            max_rounds:         None,
            max_time:           None,
            max_events:         None,
            stop_condition:     None,
            max_workers:        None,
            input_interval:     None,
            input_event:        DEFAULT_INPUT_EVENT.to_string(),
            seed:               0,
            wall_clock_timeout: None,
            track_task_order:   false,
        }
    }

    /// Reject invalid limit values before any execution starts.
    pub fn validate(&self) -> CmResult<()> {
        if self.input_event.is_empty() {
            return Err(CmError::Config("input_event must not be empty".into()));
        }
        if self.max_rounds == Some(0) {
            return Err(CmError::Config("max_rounds must be positive".into()));
        }
        if self.max_events == Some(0) {
            return Err(CmError::Config("max_events must be positive".into()));
        }
        if self.max_workers == Some(0) {
            return Err(CmError::Config("max_workers must be positive".into()));
        }
        if let Some(t) = self.max_time {
            if !t.is_finite() || t <= 0.0 {
                return Err(CmError::Config(format!("max_time must be positive, got {t}")));
            }
        }
        if let Some(i) = self.input_interval {
            if !i.is_finite() || i <= 0.0 {
                return Err(CmError::Config(format!(
                    "input_interval must be positive, got {i}"
                )));
            }
        }
        Ok(())
    }
}

// Derived `Default` would leave `input_event` empty; route it through
// `new()` so both construction paths agree.
impl Default for RunConfig {
    fn default() -> Self {
        Self::new()
    }
}
