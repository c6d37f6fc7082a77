//! The event type.

use std::fmt;

use cm_core::{SimTime, Value};

/// A timestamped, prioritized unit of work in event-driven execution.
///
/// Immutable once created: ownership passes to the [`EventQueue`](crate::EventQueue)
/// on push and to the dispatch step on pop; events are
/// never retained after dispatch.  Lower `priority` is more urgent; ties are
/// broken by the queue's enqueue sequence, not stored here.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// When the event fires, in simulated seconds.
    pub time:        SimTime,
    /// Event name — what triggers match against.
    pub name:        String,
    /// Opaque payload (`Value::Null` when empty).
    pub payload:     Value,
    /// Lower is more urgent among events at the same time.
    pub priority:    i32,
    /// Name of the task whose `emit` created this event, if any.
    pub source_task: Option<String>,
}

impl Event {
    /// An event at `time` with no payload, default priority, no source.
    pub fn new(time: SimTime, name: impl Into<String>) -> Self {
        Event {
            time,
            name: name.into(),
            payload: Value::Null,
            priority: 0,
            source_task: None,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn from_task(mut self, task: impl Into<String>) -> Self {
        self.source_task = Some(task.into());
        self
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' @ {}", self.name, self.time)
    }
}
