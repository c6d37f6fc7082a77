//! `cm-core` — foundational types for the `rust_cm` component modeling
//! framework.
//!
//! This crate is a dependency of every other `cm-*` crate.  It intentionally
//! has no `cm-*` dependencies and minimal external ones (`indexmap`,
//! `serde`/`serde_json`, `thiserror`).
//!
//! # What lives here
//!
//! | Module          | Contents                                               |
//! |-----------------|--------------------------------------------------------|
//! | [`value`]       | `Value`, `StateMap`, `StatePredicate`                  |
//! | [`time`]        | `SimTime`, `SimClock`                                  |
//! | [`config`]      | `RunConfig`                                            |
//! | [`termination`] | `StopReason`, `RunCounters`, `TerminationEvaluator`    |
//! | [`error`]       | `CmError`, `CmResult`                                  |

pub mod config;
pub mod error;
pub mod termination;
pub mod time;
pub mod value;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::RunConfig;
pub use error::{CmError, CmResult};
pub use termination::{RunCounters, StopReason, TerminationEvaluator};
pub use time::{SimClock, SimTime};
pub use value::{StateMap, StatePredicate, Value};
