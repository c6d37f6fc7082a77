//! Trigger variants — when an event-driven task becomes ready.

use cm_core::StatePredicate;

/// The readiness condition of an event-driven task.
///
/// A closed enum rather than a trait object: matching is pattern-matched in
/// the engine, and the compiler enforces exhaustiveness when a variant is
/// added.  Matching *state* (the immediate-fired flag, a condition's last
/// value) lives in the engine's `TriggerMatcher`, not here — a `Trigger` is
/// immutable once the component is built.
#[derive(Clone, Debug)]
pub enum Trigger {
    /// Ready exactly once, at simulation start.
    Immediate,

    /// Ready at simulated times `0, interval, 2·interval, …` until the run
    /// terminates.  `interval` must be positive (validated when the
    /// component is built).
    Periodic { interval: f64 },

    /// Ready whenever an event with this name is processed.
    Event { name: String },

    /// Ready on the false→true transition of the predicate, re-evaluated
    /// after every processed event.  Edge-detected: not ready again until
    /// the predicate has returned to false and come back true.
    Condition { predicate: StatePredicate },
}

impl Trigger {
    /// Shorthand for an event-name trigger.
    pub fn on_event(name: impl Into<String>) -> Self {
        Trigger::Event { name: name.into() }
    }

    /// Shorthand for a condition trigger from a closure.
    pub fn on_condition<F>(predicate: F) -> Self
    where
        F: Fn(&cm_core::StateMap) -> bool + Send + Sync + 'static,
    {
        Trigger::Condition { predicate: StatePredicate::new(predicate) }
    }
}
