//! Termination evaluation shared by both executors.
//!
//! The evaluator is consulted once per completed unit of work — a round in
//! synchronous mode, a processed event in event-driven mode — never before
//! the unit completes.  When several configured limits hold at once the
//! reported reason follows a fixed precedence: the explicit state condition
//! wins (it is the "something specific happened" signal), then the hard
//! count/time limits, then the empty queue as the implicit default.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CmError, CmResult, RunConfig, SimTime, StateMap, StatePredicate};

// ── StopReason ────────────────────────────────────────────────────────────────

/// Why a run stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The configured state condition became true.
    StateCondition,
    /// The round limit was reached (synchronous mode).
    MaxRounds,
    /// Simulated time reached the limit (event-driven mode).
    MaxTime,
    /// The processed-event limit was reached (event-driven mode).
    MaxEvents,
    /// No events remain (event-driven mode's implicit default).
    QueueEmpty,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::StateCondition => "state condition satisfied",
            StopReason::MaxRounds => "round limit reached",
            StopReason::MaxTime => "simulated time limit reached",
            StopReason::MaxEvents => "event limit reached",
            StopReason::QueueEmpty => "event queue empty",
        };
        f.write_str(s)
    }
}

// ── RunCounters ───────────────────────────────────────────────────────────────

/// Units of work completed so far in the current run.
///
/// Created fresh at run start; never persisted across runs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RunCounters {
    /// Completed rounds (synchronous mode).
    pub rounds: u64,
    /// Processed events (event-driven mode).
    pub events: u64,
}

// ── TerminationEvaluator ──────────────────────────────────────────────────────

/// The shared stop-condition engine.
///
/// Built once per run from the [`RunConfig`]; holds no mutable state, so a
/// single instance serves every check of the run.
#[derive(Clone, Debug)]
pub struct TerminationEvaluator {
    max_rounds: Option<u64>,
    max_time:   Option<SimTime>,
    max_events: Option<u64>,
    condition:  Option<StatePredicate>,
}

impl TerminationEvaluator {
    /// Build from a validated config.
    ///
    /// Call [`RunConfig::validate`] first; this only converts `max_time`
    /// into a [`SimTime`] (which re-rejects non-finite values).
    pub fn from_config(config: &RunConfig) -> CmResult<Self> {
        let max_time = match config.max_time {
            Some(t) => Some(SimTime::new(t).map_err(|_| {
                CmError::Config(format!("max_time must be a finite positive number, got {t}"))
            })?),
            None => None,
        };
        Ok(Self {
            max_rounds: config.max_rounds,
            max_time,
            max_events: config.max_events,
            condition:  config.stop_condition.clone(),
        })
    }

    /// Decide whether the run should stop after the unit of work that just
    /// completed.
    ///
    /// `queue_empty` is `None` in synchronous mode (there is no queue) and
    /// `Some(..)` in event-driven mode.
    pub fn evaluate(
        &self,
        counters:    &RunCounters,
        now:         SimTime,
        state:       &StateMap,
        queue_empty: Option<bool>,
    ) -> Option<StopReason> {
        if let Some(cond) = &self.condition {
            if cond.eval(state) {
                return Some(StopReason::StateCondition);
            }
        }
        if let Some(max) = self.max_rounds {
            if counters.rounds >= max {
                return Some(StopReason::MaxRounds);
            }
        }
        if let Some(max) = self.max_time {
            // Inclusive bound: the event at exactly `max` has already been
            // processed by the time we are asked.
            if now >= max {
                return Some(StopReason::MaxTime);
            }
        }
        if let Some(max) = self.max_events {
            if counters.events >= max {
                return Some(StopReason::MaxEvents);
            }
        }
        if queue_empty == Some(true) {
            return Some(StopReason::QueueEmpty);
        }
        None
    }
}
