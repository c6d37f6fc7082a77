//! Unit tests for events and the event queue.

use cm_core::SimTime;
use serde_json::json;

use crate::{Event, EventQueue};

fn t(secs: f64) -> SimTime {
    SimTime::new(secs).unwrap()
}

#[cfg(test)]
mod ordering {
    use super::*;

    #[test]
    fn pops_in_time_order() {
        let mut q = EventQueue::new();
        q.push(Event::new(t(3.0), "c"));
        q.push(Event::new(t(1.0), "a"));
        q.push(Event::new(t(2.0), "b"));

        let names: Vec<String> = std::iter::from_fn(|| q.pop()).map(|e| e.name).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn priority_breaks_time_ties_lower_first() {
        let mut q = EventQueue::new();
        q.push(Event::new(t(1.0), "low").with_priority(5));
        q.push(Event::new(t(1.0), "urgent").with_priority(-1));
        q.push(Event::new(t(1.0), "normal"));

        assert_eq!(q.pop().unwrap().name, "urgent");
        assert_eq!(q.pop().unwrap().name, "normal");
        assert_eq!(q.pop().unwrap().name, "low");
    }

    #[test]
    fn sequence_breaks_full_ties_fifo() {
        let mut q = EventQueue::new();
        for i in 0..10 {
            q.push(Event::new(t(2.0), format!("e{i}")));
        }
        for i in 0..10 {
            assert_eq!(q.pop().unwrap().name, format!("e{i}"));
        }
    }

    #[test]
    fn pop_always_returns_current_minimum() {
        // Interleave pushes and pops; every pop must beat everything left.
        let mut q = EventQueue::new();
        q.push(Event::new(t(5.0), "later"));
        q.push(Event::new(t(1.0), "first"));
        assert_eq!(q.pop().unwrap().name, "first");

        q.push(Event::new(t(0.5), "jumped"));
        q.push(Event::new(t(5.0), "also-later").with_priority(-3));
        assert_eq!(q.pop().unwrap().name, "jumped");
        assert_eq!(q.pop().unwrap().name, "also-later");
        assert_eq!(q.pop().unwrap().name, "later");
        assert!(q.pop().is_none());
    }
}

#[cfg(test)]
mod queue_api {
    use super::*;

    #[test]
    fn peek_does_not_remove() {
        let mut q = EventQueue::new();
        q.push(Event::new(t(1.0), "only"));
        assert_eq!(q.peek().unwrap().name, "only");
        assert_eq!(q.len(), 1);
        assert!(!q.is_empty());
    }

    #[test]
    fn clear_keeps_sequence_monotonic() {
        let mut q = EventQueue::new();
        q.push(Event::new(t(1.0), "before"));
        q.clear();
        assert!(q.is_empty());

        // FIFO among equals must still hold across the clear.
        q.push(Event::new(t(1.0), "x"));
        q.push(Event::new(t(1.0), "y"));
        assert_eq!(q.pop().unwrap().name, "x");
        assert_eq!(q.pop().unwrap().name, "y");
    }

    #[test]
    fn event_builders() {
        let e = Event::new(t(2.0), "tick")
            .with_payload(json!({"n": 3}))
            .with_priority(7)
            .from_task("emitter");
        assert_eq!(e.payload["n"], json!(3));
        assert_eq!(e.priority, 7);
        assert_eq!(e.source_task.as_deref(), Some("emitter"));
        assert_eq!(e.to_string(), "'tick' @ t=2s");
    }
}
