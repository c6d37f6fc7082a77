//! `EventQueue` — the pending-event priority structure.
//!
//! # Ordering
//!
//! `pop()` always returns the event with the lexicographically smallest
//! `(time, priority, sequence)` key.  The sequence number is assigned at
//! push time and strictly increases, so two events at the same time and
//! priority come out in the order they went in.  That FIFO tie-break is
//! load-bearing: a task that re-emits its own triggering event with zero
//! delay must produce the same trace on every run.
//!
//! # Performance note
//!
//! A `BinaryHeap` of key-wrapped entries gives O(log n) push and pop.  Rust's
//! heap is a max-heap, so entries are wrapped in `Reverse`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use cm_core::SimTime;

use crate::Event;

/// Heap entry carrying the full tie-break key alongside the event.
///
/// `Ord` compares `(time, priority, seq)` only; the event itself never
/// participates in comparisons.
struct Entry {
    time:     SimTime,
    priority: i32,
    seq:      u64,
    event:    Event,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.time, self.priority, self.seq).cmp(&(other.time, other.priority, other.seq))
    }
}

/// A mutable min-queue of pending events, owned exclusively by the
/// event-driven executor.
#[derive(Default)]
pub struct EventQueue {
    heap:     BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `event`, assigning it the next sequence number.
    pub fn push(&mut self, event: Event) {
        let entry = Entry {
            time:     event.time,
            priority: event.priority,
            seq:      self.next_seq,
            event,
        };
        self.next_seq += 1;
        self.heap.push(Reverse(entry));
    }

    /// Remove and return the minimum-key event, or `None` when empty.
    pub fn pop(&mut self) -> Option<Event> {
        self.heap.pop().map(|Reverse(entry)| entry.event)
    }

    /// The minimum-key event without removing it.
    pub fn peek(&self) -> Option<&Event> {
        self.heap.peek().map(|Reverse(entry)| &entry.event)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drop all pending events.  The sequence counter keeps counting — old
    /// and new events must never compare equal on the tie-break key.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
