//! `TriggerMatcher` — which tasks become ready for a processed event.
//!
//! Triggers themselves are immutable; the matching *state* they need — has
//! the immediate task fired, what did a condition evaluate to last time —
//! lives here, in a `Vec` parallel to the component's task list.  One
//! matcher serves one run and is rebuilt on re-run.

use cm_core::StateMap;
use cm_event::Event;
use cm_model::{Component, Task, Trigger};

/// Name of the synthetic occurrence event for a periodic task.
///
/// The executor enqueues these itself; a periodic task matches nothing but
/// its own occurrences.  The leading underscore keeps the namespace clear
/// of user event names.
pub fn periodic_event_name(task: &str) -> String {
    format!("_periodic_{task}")
}

/// Per-task hidden matching state.
enum TriggerState {
    /// `Immediate`: fires on the very first processed event, then never.
    Immediate { fired: bool },
    /// `Condition`: last evaluation, for false→true edge detection.
    Condition { was_true: bool },
    /// `Periodic` / `Event`: matching is stateless.
    Stateless,
}

/// Decides, per processed event, the subset of tasks that become ready.
pub struct TriggerMatcher {
    states: Vec<TriggerState>,
}

impl TriggerMatcher {
    /// Fresh matching state for one run of `component`.
    pub fn new(component: &Component) -> Self {
        let states = component
            .tasks()
            .iter()
            .map(|task| match task.trigger {
                Some(Trigger::Immediate) => TriggerState::Immediate { fired: false },
                Some(Trigger::Condition { .. }) => TriggerState::Condition { was_true: false },
                _ => TriggerState::Stateless,
            })
            .collect();
        Self { states }
    }

    /// Collect the declaration indices of every task ready for `event`.
    ///
    /// Condition predicates are re-evaluated here on *every* processed
    /// event, whatever its name, against the state the previous step left
    /// behind; they match only on the false→true edge.  All matches for one
    /// processing step are collected before any dispatch happens.
    pub fn collect_ready(&mut self, tasks: &[Task], event: &Event, state: &StateMap) -> Vec<usize> {
        let mut ready = Vec::new();
        for (i, task) in tasks.iter().enumerate() {
            let matched = match task.trigger.as_ref() {
                Some(Trigger::Immediate) => {
                    let TriggerState::Immediate { fired } = &mut self.states[i] else {
                        unreachable!("matcher state built from the same task list");
                    };
                    if *fired {
                        false
                    } else {
                        *fired = true;
                        true
                    }
                }
                Some(Trigger::Periodic { .. }) => event.name == periodic_event_name(&task.name),
                Some(Trigger::Event { name }) => event.name == *name,
                Some(Trigger::Condition { predicate }) => {
                    let TriggerState::Condition { was_true } = &mut self.states[i] else {
                        unreachable!("matcher state built from the same task list");
                    };
                    let is_true = predicate.eval(state);
                    let edge = is_true && !*was_true;
                    *was_true = is_true;
                    edge
                }
                None => false,
            };
            if matched {
                ready.push(i);
            }
        }
        ready
    }
}
