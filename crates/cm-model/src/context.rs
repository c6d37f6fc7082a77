//! The execution context a task action runs against.
//!
//! # Snapshot in, effects out
//!
//! A `TaskContext` is built per invocation from snapshots of the component's
//! state and outputs.  The action reads and writes the snapshot; afterwards
//! [`TaskContext::into_effects`] yields only the keys the action actually
//! wrote, plus any emit requests.  The executor applies those effects to the
//! live component.
//!
//! Recording *written keys* rather than merging whole map copies is what
//! makes concurrent dispatch behave sensibly: two co-triggered tasks writing
//! distinct keys never clobber each other, while tasks racing on the *same*
//! key resolve last-applied-wins — the race stays observable, which is the
//! point, without any locking.

use cm_core::{SimTime, StateMap, Value};
use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;

use crate::{ModelError, ModelResult};

/// Insertion-ordered set with the fast Fx hasher; order fixes the effect
/// application sequence so traces are reproducible.
type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

// ── EmitRequest ───────────────────────────────────────────────────────────────

/// A new-event request recorded by a task during execution.
///
/// The executor turns it into a queue event at `current_time + delay`.
#[derive(Clone, Debug, PartialEq)]
pub struct EmitRequest {
    pub name:     String,
    pub payload:  Value,
    pub delay:    f64,
    pub priority: i32,
}

// ── TaskContext ───────────────────────────────────────────────────────────────

/// The mutable view one task invocation runs against.
///
/// Exclusively owned by the invocation for its duration.  Inputs are read
/// only; state and outputs are snapshot copies with write tracking; `now`,
/// the triggering event's name and payload, and `emit` are populated only
/// for event-driven invocations.
pub struct TaskContext {
    inputs:          StateMap,
    state:           StateMap,
    outputs:         StateMap,
    written_state:   FxIndexSet<String>,
    written_outputs: FxIndexSet<String>,
    now:             SimTime,
    event_name:      Option<String>,
    event_payload:   Value,
    emits:           Vec<EmitRequest>,
    can_emit:        bool,
}

impl TaskContext {
    /// Context for one task of a synchronous round.  No clock, no event,
    /// no emit capability.
    pub fn for_round(inputs: StateMap, state: StateMap, outputs: StateMap) -> Self {
        Self {
            inputs,
            state,
            outputs,
            written_state:   FxIndexSet::default(),
            written_outputs: FxIndexSet::default(),
            now:             SimTime::ZERO,
            event_name:      None,
            event_payload:   Value::Null,
            emits:           Vec::new(),
            can_emit:        false,
        }
    }

    /// Context for one task dispatched against a processed event.
    pub fn for_event(
        inputs:        StateMap,
        state:         StateMap,
        outputs:       StateMap,
        now:           SimTime,
        event_name:    impl Into<String>,
        event_payload: Value,
    ) -> Self {
        Self {
            inputs,
            state,
            outputs,
            written_state:   FxIndexSet::default(),
            written_outputs: FxIndexSet::default(),
            now,
            event_name:      Some(event_name.into()),
            event_payload,
            emits:           Vec::new(),
            can_emit:        true,
        }
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    /// This round's / this event's value for a declared input.
    pub fn input(&self, name: &str) -> Option<&Value> {
        self.inputs.get(name)
    }

    /// Current value of a state field (the snapshot, including this task's
    /// own earlier writes).
    pub fn state(&self, name: &str) -> Option<&Value> {
        self.state.get(name)
    }

    /// Current value of an output field.
    pub fn output(&self, name: &str) -> Option<&Value> {
        self.outputs.get(name)
    }

    /// The simulated time of the event being processed.  Always
    /// `SimTime::ZERO` in synchronous rounds.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Name of the triggering event, if this is an event-driven invocation.
    pub fn event_name(&self) -> Option<&str> {
        self.event_name.as_deref()
    }

    /// Payload of the triggering event (`Value::Null` when absent).
    pub fn event_payload(&self) -> &Value {
        &self.event_payload
    }

    // ── Writes ────────────────────────────────────────────────────────────

    /// Write a state field.  Visible to this task immediately and to the
    /// component once the executor applies the effects.
    pub fn set_state(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        self.written_state.insert(name.clone());
        self.state.insert(name, value.into());
    }

    /// Write an output field.
    pub fn set_output(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        self.written_outputs.insert(name.clone());
        self.outputs.insert(name, value.into());
    }

    /// Request a new event at `now + delay`.
    ///
    /// `delay` must be ≥ 0 — a negative delay is a configuration error
    /// rejected here, at the point of use.  Calling from a synchronous
    /// round is likewise a configuration error: rounds have no event queue.
    pub fn emit(
        &mut self,
        name: impl Into<String>,
        payload: Value,
        delay: f64,
        priority: i32,
    ) -> ModelResult<()> {
        let name = name.into();
        if !self.can_emit {
            return Err(ModelError::EmitUnsupported);
        }
        if !delay.is_finite() || delay < 0.0 {
            return Err(ModelError::NegativeDelay { event: name, delay });
        }
        self.emits.push(EmitRequest { name, payload, delay, priority });
        Ok(())
    }

    /// Consume the context, keeping only what the task actually changed.
    pub fn into_effects(mut self) -> TaskEffects {
        let state_writes = self
            .written_state
            .iter()
            .filter_map(|k| self.state.swap_remove(k).map(|v| (k.clone(), v)))
            .collect();
        let output_writes = self
            .written_outputs
            .iter()
            .filter_map(|k| self.outputs.swap_remove(k).map(|v| (k.clone(), v)))
            .collect();
        TaskEffects {
            state_writes,
            output_writes,
            emits: self.emits,
        }
    }
}

// ── TaskEffects ───────────────────────────────────────────────────────────────

/// What one task invocation changed: written state/output keys (in write
/// order) and emitted event requests.
#[derive(Debug, Default)]
pub struct TaskEffects {
    pub state_writes:  Vec<(String, Value)>,
    pub output_writes: Vec<(String, Value)>,
    pub emits:         Vec<EmitRequest>,
}

impl TaskEffects {
    /// Apply the writes to live state/output maps.  Emits are the caller's
    /// to schedule.
    pub fn apply_writes(&mut self, state: &mut StateMap, outputs: &mut StateMap) {
        for (k, v) in self.state_writes.drain(..) {
            state.insert(k, v);
        }
        for (k, v) in self.output_writes.drain(..) {
            outputs.insert(k, v);
        }
    }
}
