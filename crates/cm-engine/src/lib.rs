//! `cm-engine` — the two execution engines of the `rust_cm` framework.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`order`]      | Topological task ordering (Kahn's algorithm)              |
//! | [`sync`]       | `SyncExecutor` — dependency-ordered round loop            |
//! | [`matcher`]    | `TriggerMatcher` — per-event task readiness               |
//! | [`event_loop`] | `EventExecutor` — discrete-event simulation loop          |
//! | [`record`]     | `StepRecord`, `RunReport` — per-step snapshots + trace    |
//! | [`observer`]   | `RunObserver` callbacks, `NoopObserver`                   |
//! | [`error`]      | `EngineError`, `EngineResult<T>`                          |
//!
//! # The two models
//!
//! **Synchronous**: tasks are topologically ordered over `depends_on` once,
//! then every round runs them sequentially in that order.  Fully
//! deterministic given a fixed input sequence.
//!
//! **Event-driven**: a `(time, priority, sequence)`-ordered queue drives a
//! simulated clock.  All tasks matched by one processed event dispatch
//! concurrently (with the `parallel` feature, bounded by
//! `RunConfig::max_workers`) and join before the next event — the only
//! synchronization barrier.  Tasks racing on the same state key resolve
//! last-applied-wins with no locking: observing such races is a use case,
//! not a defect.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | (default) Rayon fan-out for co-triggered task dispatch.  |

pub mod error;
pub mod event_loop;
pub mod matcher;
pub mod observer;
pub mod order;
pub mod record;
pub mod sync;

#[cfg(test)]
mod tests;

pub use error::{EngineError, EngineResult};
pub use event_loop::{EventExecutor, RunState};
pub use matcher::TriggerMatcher;
pub use observer::{NoopObserver, RunObserver};
pub use order::topological_order;
pub use record::{RunReport, StepRecord};
pub use sync::SyncExecutor;
