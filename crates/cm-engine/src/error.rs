//! Error types for cm-engine.
//!
//! Definition errors arrive wrapped as [`ModelError`]s, configuration
//! errors as [`CmError::Config`], and action failures as the two
//! `TaskFailed*` variants carrying where the failure happened.  Invariant
//! violations (time moving backward) are engine bugs and panic instead.

use std::time::Duration;

use thiserror::Error;

use cm_core::{CmError, SimTime};
use cm_model::{ActionError, ComponentKind, ModelError};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CmError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("component '{component}' is {actual:?}, but this executor requires {required:?}")]
    WrongKind {
        component: String,
        required:  ComponentKind,
        actual:    ComponentKind,
    },

    #[error("missing required input '{input}' in round {round}")]
    MissingInput { input: String, round: u64 },

    #[error("task '{task}' failed in round {round}: {source}")]
    TaskFailedInRound {
        task:  String,
        round: u64,
        source: ActionError,
    },

    #[error("task '{task}' failed on event '{event}' at {time}: {source}")]
    TaskFailedOnEvent {
        task:  String,
        event: String,
        time:  SimTime,
        source: ActionError,
    },

    #[error("run exceeded the wall-clock timeout of {0:?}")]
    WallClockTimeout(Duration),
}

pub type EngineResult<T> = Result<T, EngineError>;
