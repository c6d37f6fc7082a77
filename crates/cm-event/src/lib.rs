//! `cm-event` — events and the pending-event queue.
//!
//! | Module    | Contents                                        |
//! |-----------|-------------------------------------------------|
//! | [`event`] | `Event` — a timestamped, prioritized unit of work |
//! | [`queue`] | `EventQueue` — (time, priority, sequence) min-heap |

pub mod event;
pub mod queue;

#[cfg(test)]
mod tests;

pub use event::Event;
pub use queue::EventQueue;
