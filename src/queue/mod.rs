//! Event queue and drain loop.
//!
//! The [`QueueManager`] owns pending events and listeners and runs the
//! drain loop: pop, broadcast to listeners, dispatch through the registry,
//! repeat until the queue is empty or a guard trips.
//!
//! ## Example Usage
//!
//! ```
//! use combat_bus::core::{Character, DrainConfig, TeamId};
//! use combat_bus::queue::QueueManager;
//! use combat_bus::registry::{DAMAGE, HEAL};
//!
//! let manager = QueueManager::new().with_config(DrainConfig::default().with_max_events(10));
//! let hero = Character::new("hero", TeamId::new(1));
//!
//! let hit = manager.event(DAMAGE).with_target(hero.clone()).with_magnitude(30).build().unwrap();
//! let potion = manager.event(HEAL).with_target(hero.clone()).with_magnitude(5).build().unwrap();
//!
//! manager.submit_normal(hit);
//! manager.submit_normal(potion);
//!
//! let outcome = manager.drain().unwrap();
//! assert!(outcome.is_exhausted());
//! assert_eq!(outcome.processed(), 2);
//! assert_eq!(hero.hp(), 75);
//! ```

mod guard;
mod manager;

pub use guard::AbortReason;
pub use manager::QueueManager;
pub(crate) use manager::WeakManager;

use serde::{Deserialize, Serialize};

/// How a drain call ended.
///
/// A tripped guard is a normal, reported outcome, not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrainOutcome {
    /// The queue is empty.
    Exhausted {
        /// Events broadcast and dispatched during this call.
        processed: u32,
    },

    /// A guard stopped the drain with events still pending.
    Aborted {
        reason: AbortReason,
        processed: u32,
        /// Events left in the queue.
        remaining: usize,
    },
}

impl DrainOutcome {
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, DrainOutcome::Exhausted { .. })
    }

    #[must_use]
    pub fn is_aborted(&self) -> bool {
        matches!(self, DrainOutcome::Aborted { .. })
    }

    #[must_use]
    pub fn processed(&self) -> u32 {
        match self {
            DrainOutcome::Exhausted { processed } | DrainOutcome::Aborted { processed, .. } => {
                *processed
            }
        }
    }

    /// Events left pending (zero when exhausted).
    #[must_use]
    pub fn remaining(&self) -> usize {
        match self {
            DrainOutcome::Exhausted { .. } => 0,
            DrainOutcome::Aborted { remaining, .. } => *remaining,
        }
    }

    /// The guard that tripped, if any.
    #[must_use]
    pub fn abort_reason(&self) -> Option<AbortReason> {
        match self {
            DrainOutcome::Exhausted { .. } => None,
            DrainOutcome::Aborted { reason, .. } => Some(*reason),
        }
    }
}
