//! Drain guards.
//!
//! Three independent guards bound a single drain call:
//!
//! 1. **Length cap**: at most `max_events` events are processed.
//! 2. **Repetition**: popping a fingerprint seen earlier in the same drain
//!    spends from a suspicion budget, twice as fast when the queue holds
//!    `growth_threshold` events after that event resolves. An unseen
//!    fingerprint restores the budget.
//! 3. **Timeout**: the gap between two consecutive iterations must not
//!    exceed `timeout`.

use std::time::Instant;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::DrainConfig;
use crate::events::Fingerprint;

/// Which guard stopped a drain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbortReason {
    /// The per-drain event budget ran out.
    LengthCap,
    /// The same event kept coming back.
    Repetition,
    /// One iteration took longer than the timeout.
    Timeout,
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AbortReason::LengthCap => "length cap reached",
            AbortReason::Repetition => "suspected event loop",
            AbortReason::Timeout => "event timed out",
        };
        f.write_str(s)
    }
}

/// Guard state for one drain call.
#[derive(Debug)]
pub(crate) struct DrainGuards {
    config: DrainConfig,
    budget: u32,
    suspicion: i32,
    seen: FxHashSet<Fingerprint>,
    last_tick: Instant,
}

impl DrainGuards {
    pub(crate) fn new(config: DrainConfig) -> Self {
        Self {
            config,
            budget: config.max_events,
            suspicion: config.suspicion_budget,
            seen: FxHashSet::default(),
            last_tick: Instant::now(),
        }
    }

    /// Whether the length cap still allows another event.
    pub(crate) fn has_budget(&self) -> bool {
        self.budget > 0
    }

    /// Feed the repetition guard one popped event.
    ///
    /// `pending` is the queue length once the event has been broadcast and
    /// dispatched, so follow-ups it caused count toward growth.
    pub(crate) fn observe(&mut self, fingerprint: Fingerprint, pending: usize) {
        if self.seen.insert(fingerprint) {
            self.suspicion = self.config.suspicion_budget;
        } else if pending >= self.config.growth_threshold {
            self.suspicion -= 2;
        } else {
            self.suspicion -= 1;
        }
    }

    /// Charge one processed event against the length cap.
    pub(crate) fn consume(&mut self) {
        self.budget = self.budget.saturating_sub(1);
    }

    /// Evaluate all guards, then refresh the iteration timestamp.
    pub(crate) fn check(&mut self) -> Option<AbortReason> {
        let now = Instant::now();
        let reason = if self.budget == 0 {
            Some(AbortReason::LengthCap)
        } else if self.suspicion <= 0 {
            Some(AbortReason::Repetition)
        } else if now.duration_since(self.last_tick) > self.config.timeout {
            Some(AbortReason::Timeout)
        } else {
            None
        };
        self.last_tick = now;
        reason
    }

    #[cfg(test)]
    pub(crate) fn suspicion(&self) -> i32 {
        self.suspicion
    }
}
