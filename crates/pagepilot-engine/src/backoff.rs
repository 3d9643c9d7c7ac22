//! Shared exponential back-off for the recovery watchers.
//!
//! One tracker is shared by the explicit-button strategy, the icon fallback,
//! and the single-"resume"-button variant: they gate on the same eligibility
//! clock so a stubborn failure is not hammered from several directions.
//!
//! Update rule (kept consistent everywhere): on a triggered recovery the next
//! eligible time is set from the delay *before* advancing, then the delay
//! doubles, capped at the ceiling. The delay returns to the floor only when a
//! polling tick observes no failure indicator at all.

use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use crate::config::BackoffConfig;

struct State {
    delay: Duration,
    next_eligible: Option<Instant>,
}

/// Exponential back-off tracker. Shared as `Arc<Backoff>`.
pub struct Backoff {
    floor: Duration,
    ceiling: Duration,
    state: Mutex<State>,
}

impl Backoff {
    pub fn new(config: &BackoffConfig) -> Self {
        Self {
            floor: config.floor(),
            ceiling: config.ceiling(),
            state: Mutex::new(State {
                delay: config.floor(),
                next_eligible: None,
            }),
        }
    }

    /// Whether a recovery action may fire at `now`.
    pub fn eligible(&self, now: Instant) -> bool {
        match self.state.lock().next_eligible {
            None => true,
            Some(t) => now >= t,
        }
    }

    /// Record a triggered recovery: schedule the next eligible time using the
    /// current delay, then double the delay (capped). Returns the new delay,
    /// which is what the notice shows.
    pub fn advance(&self, now: Instant) -> Duration {
        let mut state = self.state.lock();
        state.next_eligible = Some(now + state.delay);
        state.delay = (state.delay * 2).min(self.ceiling);
        state.delay
    }

    /// Reset to the floor, eligible immediately. Called only when no failure
    /// indicator is present.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.delay = self.floor;
        state.next_eligible = None;
    }

    /// Current delay; the next `advance` schedules eligibility with this
    /// value before doubling it.
    pub fn current_delay(&self) -> Duration {
        self.state.lock().delay
    }
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
