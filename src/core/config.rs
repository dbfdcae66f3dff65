//! Drain guard configuration.
//!
//! A single drain call stops early when one of three guards trips: the
//! length cap, the repetition guard or the per-event timeout. The limits
//! are tunable; the defaults reproduce the stock engine behavior.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Limits applied by [`QueueManager::drain`](crate::queue::QueueManager::drain).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrainConfig {
    /// Maximum events processed in one drain call (default: 100).
    pub max_events: u32,

    /// Suspicion budget restored whenever an unseen fingerprint is popped
    /// (default: 20). A repeated fingerprint spends from it; reaching zero
    /// aborts the drain.
    pub suspicion_budget: i32,

    /// Pending-queue length at which a repeated fingerprint costs double
    /// (default: 4).
    pub growth_threshold: usize,

    /// Longest allowed gap between two iterations (default: 400ms).
    pub timeout: Duration,
}

impl Default for DrainConfig {
    fn default() -> Self {
        Self {
            max_events: 100,
            suspicion_budget: 20,
            growth_threshold: 4,
            timeout: Duration::from_millis(400),
        }
    }
}

impl DrainConfig {
    /// Set the length cap.
    #[must_use]
    pub fn with_max_events(mut self, max_events: u32) -> Self {
        self.max_events = max_events;
        self
    }

    /// Set the repetition guard's suspicion budget.
    #[must_use]
    pub fn with_suspicion_budget(mut self, budget: i32) -> Self {
        self.suspicion_budget = budget;
        self
    }

    /// Set the queue length at which repetitions cost double.
    #[must_use]
    pub fn with_growth_threshold(mut self, threshold: usize) -> Self {
        self.growth_threshold = threshold;
        self
    }

    /// Set the per-event timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
