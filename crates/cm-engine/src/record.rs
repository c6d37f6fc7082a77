//! Per-step snapshots and the run trace.

use serde::Serialize;

use cm_core::{SimTime, StateMap, StopReason};

/// The snapshot taken after one unit of work — a synchronous round or a
/// processed event.
///
/// `round` is set in synchronous mode; `time` and `event` in event-driven
/// mode.  `PartialEq` exists so determinism tests can compare whole traces.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StepRecord {
    /// 1-based step index (round number or processed-event count).
    pub index: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<u64>,

    /// Simulated time of the processed event, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,

    /// Name of the processed event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,

    /// The inputs in effect during this step.
    pub inputs: StateMap,

    /// Output accumulator after this step.
    pub outputs: StateMap,

    /// Component state after this step.
    pub state: StateMap,

    /// Names of the tasks that ran, in execution (or match) order.  Present
    /// only when `RunConfig::track_task_order` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_order: Option<Vec<String>>,
}

/// Everything a completed run produced: the trace plus summary statistics.
#[derive(Debug, PartialEq, Serialize)]
pub struct RunReport {
    pub records: Vec<StepRecord>,

    /// Why the run stopped.
    pub stop: StopReason,

    /// Rounds completed (synchronous mode; 0 otherwise).
    pub rounds: u64,

    /// Events processed (event-driven mode; 0 otherwise).
    pub events: u64,

    /// Final simulated time.
    pub final_time: SimTime,

    pub final_state: StateMap,

    pub final_outputs: StateMap,
}
