//! Dynamic values, state maps, and opaque state predicates.
//!
//! Component state, inputs, outputs, and event payloads are all dynamic
//! JSON-like values: a component definition declares `count: 0` or
//! `label: "idle"` without a schema language, and task actions read and
//! write them untyped.  `serde_json::Value` covers exactly that shape and
//! serializes for free in the execution log.
//!
//! `StateMap` is insertion-ordered (`IndexMap`) so a component's declared
//! field order survives into snapshots and exports.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// A dynamic value: null, bool, number, string, array, or object.
pub type Value = serde_json::Value;

/// Named values in declaration order — state, inputs, or outputs.
pub type StateMap = IndexMap<String, Value>;

// ── StatePredicate ────────────────────────────────────────────────────────────

/// An opaque boolean condition over component state.
///
/// Used both as a run stop condition and inside `Condition` triggers.  The
/// closure form keeps the framework free of any expression language: an
/// embedder may back this with a hand-written closure, a compiled expression
/// tree, or anything else that can look at a [`StateMap`].
///
/// Cheap to clone (an `Arc`), callable from any thread.
#[derive(Clone)]
pub struct StatePredicate(Arc<dyn Fn(&StateMap) -> bool + Send + Sync>);

impl StatePredicate {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&StateMap) -> bool + Send + Sync + 'static,
    {
        StatePredicate(Arc::new(f))
    }

    /// Evaluate the predicate against `state`.
    #[inline]
    pub fn eval(&self, state: &StateMap) -> bool {
        (self.0)(state)
    }
}

impl fmt::Debug for StatePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StatePredicate(..)")
    }
}
