//! `cm-model` — the in-memory component model and the task-facing API.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`component`] | `Component`, `ComponentKind`, definition validation       |
//! | [`task`]      | `Task`, the `TaskAction` trait, `ActionError`             |
//! | [`trigger`]   | `Trigger` enum (event-driven readiness conditions)        |
//! | [`context`]   | `TaskContext`, `TaskEffects`, `EmitRequest`               |
//! | [`input`]     | `InputProvider` trait and stock implementations           |
//! | [`error`]     | `ModelError`, `ModelResult<T>`                            |
//!
//! # Design notes
//!
//! A task body is an opaque *action*: anything implementing [`TaskAction`]
//! (including a plain closure).  Actions never touch the live component —
//! they run against a [`TaskContext`] snapshot and come back as
//! [`TaskEffects`], which the executor applies.  This produce/apply split is
//! what lets the event-driven executor fan a batch of co-triggered tasks out
//! across threads with a single join barrier and no locking.

pub mod component;
pub mod context;
pub mod error;
pub mod input;
pub mod task;
pub mod trigger;


pub use component::{Component, ComponentKind};
pub use context::{EmitRequest, TaskContext, TaskEffects};
pub use error::{ModelError, ModelResult};
pub use input::{ConstantInputs, FixedInputs, InputProvider, InputSpec, NoInputs, RandomInputs};
pub use task::{ActionError, Task, TaskAction};
pub use trigger::Trigger;
