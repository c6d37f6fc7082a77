//! Error types for cm-model.
//!
//! Everything here is a *definition* or *configuration* error: detected
//! before execution starts, or rejected at the point of use (`emit`).
//! Action failures are a separate type — see
//! [`ActionError`][crate::ActionError].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("duplicate task name '{0}'")]
    DuplicateTask(String),

    #[error("task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency { task: String, dependency: String },

    #[error("circular task dependencies detected in component '{0}'")]
    DependencyCycle(String),

    #[error("synchronous task '{0}' must not carry a trigger")]
    UnexpectedTrigger(String),

    #[error("event-driven task '{0}' must not carry dependencies")]
    UnexpectedDependencies(String),

    #[error("event-driven task '{0}' has no trigger")]
    MissingTrigger(String),

    #[error("periodic trigger on task '{task}' has non-positive interval {interval}")]
    InvalidInterval { task: String, interval: f64 },

    #[error("negative delay {delay} emitting event '{event}'")]
    NegativeDelay { event: String, delay: f64 },

    #[error("emit is not available in synchronous execution")]
    EmitUnsupported,

    #[error("no input defined for round {0}")]
    InputExhausted(u64),

    #[error("no specification for input '{0}'")]
    MissingInputSpec(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
