//! Identity newtypes.
//!
//! Characters, queue managers, registries and listeners are compared by
//! identity rather than by value. Each kind of object draws its ids from its
//! own process-wide counter, so ids are unique for the lifetime of the
//! process and never reused.
//!
//! ```
//! use combat_bus::core::{CharacterId, TeamId};
//!
//! let a = CharacterId::next();
//! let b = CharacterId::next();
//! assert_ne!(a, b);
//!
//! assert_eq!(TeamId::new(2).raw(), 2);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl $name {
            /// Allocate a fresh, process-unique id.
            #[must_use]
            pub fn next() -> Self {
                static COUNTER: AtomicU64 = AtomicU64::new(1);
                Self(COUNTER.fetch_add(1, Ordering::Relaxed))
            }

            /// Get the raw ID value.
            #[must_use]
            pub const fn raw(self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }
    };
}

define_id!(
    /// Stable identity of a [`Character`](super::Character).
    CharacterId,
    "Character"
);

define_id!(
    /// Identity of a [`QueueManager`](crate::queue::QueueManager).
    ///
    /// Part of every event fingerprint, so identical events bound to two
    /// different managers never count as repetitions of each other.
    ManagerId,
    "Manager"
);

define_id!(
    /// Identity of a [`HandlerRegistry`](crate::registry::HandlerRegistry) handle.
    ///
    /// A derived registry gets its own id even though it aliases the
    /// parent's storage.
    RegistryId,
    "Registry"
);

define_id!(
    /// Identity of a listener (skill) registered with a queue manager.
    ListenerId,
    "Listener"
);

/// Team tag. Characters on the same team are allies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub u32);

impl TeamId {
    /// Create a new team ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Team({})", self.0)
    }
}
