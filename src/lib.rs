//! # combat-bus
//!
//! An in-process combat event bus for turn-based games.
//!
//! Characters exchange typed events (damage, heal, skip, skill triggers)
//! through a central queue. Draining the queue broadcasts each event to
//! passive listeners (skills), which may react by queueing follow-up
//! events, then dispatches it to the effect function registered for its
//! type.
//!
//! ## Design Principles
//!
//! 1. **Validate at construction**: An event can only be built against a
//!    queue manager whose registry knows its type. A malformed event never
//!    enters a queue.
//!
//! 2. **Single-threaded, re-entrant**: Everything runs on the caller's
//!    thread. Listeners and effects may submit to or skip from the queue
//!    that is currently draining them.
//!
//! 3. **Guarded drains**: A drain stops on a length cap, on suspected
//!    repetition loops, or on a per-event timeout. Guard trips are reported
//!    outcomes, not errors.
//!
//! ## Modules
//!
//! - `core`: Identities, characters, drain configuration
//! - `events`: Event types, events, fingerprints, extension data
//! - `registry`: Handler registry and the base ruleset
//! - `queue`: Queue manager and drain loop
//! - `skills`: Listener trait and sample skills
//! - `error`: Error taxonomy

pub mod core;
pub mod error;
pub mod events;
pub mod queue;
pub mod registry;
pub mod skills;

// Re-export commonly used types
pub use crate::core::{
    Character, CharacterId, CharacterSnapshot, DrainConfig,
    ListenerId, ManagerId, RegistryId, TeamId,
};

pub use crate::error::{BusError, ListenerError, RegistryError, ValidationError};

pub use crate::events::{EventBuilder, EventType, ExtraValue, Extras, Fingerprint, GameEvent};

pub use crate::registry::{Effect, HandlerRegistry, COMMAND_SKIP, DAMAGE, HEAL};

pub use crate::queue::{AbortReason, DrainOutcome, QueueManager};

pub use crate::skills::{Cooldown, Fireball, Listener, ListenerRef, SkillState, Skip, FIREBALL};
