//! Tasks and the `TaskAction` capability trait.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::{ModelError, TaskContext, Trigger};

// ── ActionError ───────────────────────────────────────────────────────────────

/// An unhandled failure raised by a task body.
///
/// Opaque by design: the framework does not interpret action failures, it
/// only aborts the run and reports where they happened.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ActionError(String);

impl ActionError {
    pub fn msg(message: impl Into<String>) -> Self {
        ActionError(message.into())
    }
}

// `ctx.emit(..)?` inside an action surfaces the model error verbatim.
impl From<ModelError> for ActionError {
    fn from(e: ModelError) -> Self {
        ActionError(e.to_string())
    }
}

// ── TaskAction ────────────────────────────────────────────────────────────────

/// The opaque computational body of a task.
///
/// Implementations read inputs and state through the [`TaskContext`], write
/// state and outputs into it, and (event-driven only) request new events via
/// [`TaskContext::emit`].  Concrete strategies — a hand-written closure, an
/// expression-tree interpreter, a compiled plugin — all sit behind this one
/// trait.
///
/// # Thread safety
///
/// The event-driven executor may run co-triggered actions in parallel, so
/// implementations must be `Send + Sync`.  Per-run mutable data belongs in
/// component state, not in the action itself.
pub trait TaskAction: Send + Sync + 'static {
    fn run(&self, ctx: &mut TaskContext) -> Result<(), ActionError>;
}

impl<F> TaskAction for F
where
    F: Fn(&mut TaskContext) -> Result<(), ActionError> + Send + Sync + 'static,
{
    fn run(&self, ctx: &mut TaskContext) -> Result<(), ActionError> {
        self(ctx)
    }
}

// ── Task ──────────────────────────────────────────────────────────────────────

/// A named unit of work within a component.
///
/// Synchronous tasks carry `depends_on` and no trigger; event-driven tasks
/// carry exactly one trigger and no dependencies.  `Component::new` enforces
/// both.
pub struct Task {
    pub name:       String,
    /// Names of tasks that must run earlier in each round (synchronous only).
    pub depends_on: Vec<String>,
    /// Readiness condition (event-driven only).
    pub trigger:    Option<Trigger>,
    action:         Arc<dyn TaskAction>,
}

impl Task {
    /// A task for a synchronous component, ordered after `depends_on`.
    pub fn synchronous<I, S>(name: impl Into<String>, depends_on: I, action: impl TaskAction) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Task {
            name:       name.into(),
            depends_on: depends_on.into_iter().map(Into::into).collect(),
            trigger:    None,
            action:     Arc::new(action),
        }
    }

    /// A task for an event-driven component, ready per `trigger`.
    pub fn event_driven(name: impl Into<String>, trigger: Trigger, action: impl TaskAction) -> Self {
        Task {
            name:       name.into(),
            depends_on: Vec::new(),
            trigger:    Some(trigger),
            action:     Arc::new(action),
        }
    }

    /// Invoke the task's action against `ctx`.
    #[inline]
    pub fn run(&self, ctx: &mut TaskContext) -> Result<(), ActionError> {
        self.action.run(ctx)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("depends_on", &self.depends_on)
            .field("trigger", &self.trigger)
            .finish_non_exhaustive()
    }
}
