//! Simulated-time model.
//!
//! # Design
//!
//! Time is a continuous count of simulated seconds held in `SimTime`, a
//! newtype over `f64`.  Triggers and emit delays are fractional (a task may
//! fire every 0.5 s or re-emit with a 0.001 s delay), so an integer tick
//! counter would force a resolution choice on every caller; `f64` seconds
//! keep the API in the units the component author thinks in.
//!
//! `SimTime` is totally ordered.  That is sound because construction rejects
//! NaN, negative, and infinite values — every `SimTime` in the system is a
//! finite non-negative second count, and `f64::total_cmp` then agrees with
//! the ordinary `<` on all of them.
//!
//! Simulated time never tracks wall-clock time: the clock jumps directly to
//! each processed event's timestamp and stands still between events.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CmError, CmResult};

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute point in simulated time, in seconds from run start.
///
/// Always finite and non-negative; see [`SimTime::new`].
#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimTime(f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    /// Validate `secs` as a point in simulated time.
    ///
    /// Rejects NaN, infinities, and negative values with
    /// [`CmError::InvalidTime`] — those are configuration errors, never
    /// representable states.
    pub fn new(secs: f64) -> CmResult<SimTime> {
        if !secs.is_finite() || secs < 0.0 {
            return Err(CmError::InvalidTime(secs));
        }
        Ok(SimTime(secs))
    }

    /// The raw second count.
    #[inline]
    pub fn secs(self) -> f64 {
        self.0
    }

    /// The time `delta` seconds after `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `delta` is negative or non-finite; callers
    /// validate delays before reaching here.
    #[inline]
    pub fn offset(self, delta: f64) -> SimTime {
        debug_assert!(delta.is_finite() && delta >= 0.0, "bad time offset {delta}");
        SimTime(self.0 + delta)
    }

    /// Seconds elapsed from `earlier` to `self`.
    #[inline]
    pub fn since(self, earlier: SimTime) -> f64 {
        self.0 - earlier.0
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // NaN is excluded at construction, so total_cmp matches `<` here.
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}s", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The monotone simulation clock owned by an executor for one run.
///
/// The clock only ever jumps forward, to the timestamp of the event being
/// processed.  Moving it backward is an engine bug, not a user error, and
/// panics.
#[derive(Clone, Debug)]
pub struct SimClock {
    current: SimTime,
    started: SimTime,
}

impl SimClock {
    /// A clock positioned at `start`.
    pub fn new(start: SimTime) -> Self {
        Self { current: start, started: start }
    }

    /// The current simulated time.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.current
    }

    /// Jump the clock to `to`.
    ///
    /// # Panics
    /// Panics if `to` is earlier than the current time.  The event queue's
    /// ordering guarantees pops arrive in non-decreasing time order, so this
    /// firing means the engine itself is broken.
    pub fn advance_to(&mut self, to: SimTime) {
        assert!(
            to >= self.current,
            "simulated time moved backward: {to} < {}",
            self.current
        );
        self.current = to;
    }

    /// Seconds of simulated time elapsed since the clock was created.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.current.since(self.started)
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(SimTime::ZERO)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.current)
    }
}
