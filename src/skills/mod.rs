//! Listeners and skills.
//!
//! A listener receives every event a queue manager drains, before the
//! event's effect runs. Passive skills are listeners: they watch for a
//! trigger condition and answer with a priority follow-up event.
//!
//! ## Key Components
//!
//! - [`Listener`]: The capability trait the queue manager broadcasts to
//! - [`SkillState`]: Identity, name, owner and reaction type shared by skills
//! - [`Cooldown`]: Event-counted cooldown
//! - [`Fireball`], [`Skip`]: Sample passive skills
//!
//! ## Self-Registration
//!
//! A skill that introduces its own event type declares it through
//! [`Listener::reaction_type`] and supplies its effect through
//! [`Listener::effect`]. When the skill joins a queue manager whose registry
//! doesn't know the type yet, the manager calls [`Listener::reg`], which
//! binds the type to the effect.
//!
//! ## Example Usage
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use combat_bus::core::{Character, TeamId};
//! use combat_bus::queue::QueueManager;
//! use combat_bus::registry::DAMAGE;
//! use combat_bus::skills::{Fireball, FIREBALL};
//!
//! let manager = QueueManager::new();
//! let hero = Character::new("hero", TeamId::new(1));
//! let enemy = Character::with_hp("enemy", TeamId::new(2), 250);
//!
//! let fireball = Rc::new(RefCell::new(Fireball::new(hero.clone())));
//! manager.register_listener(fireball.clone()).unwrap();
//! assert!(manager.registry().is_registered(&FIREBALL));
//!
//! let hit = manager
//!     .event(DAMAGE)
//!     .with_actor(enemy.clone())
//!     .with_target(hero.clone())
//!     .with_magnitude(7)
//!     .build()
//!     .unwrap();
//! manager.submit_normal(hit);
//! manager.drain().unwrap();
//!
//! // 100 - 7 damage + 9 from the fireball's heal.
//! assert_eq!(hero.hp(), 102);
//! assert_eq!(enemy.hp(), 240);
//! ```

mod fireball;
mod skip;

pub use fireball::{Fireball, FIREBALL, FIREBALL_DAMAGE, FIREBALL_HEAL};
pub use skip::Skip;

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::core::{Character, ListenerId};
use crate::error::{BusError, RegistryError};
use crate::events::{EventType, GameEvent};
use crate::registry::{Effect, HandlerRegistry};

/// Cooldown, in broadcast events, applied by the sample skills after firing.
pub const SKILL_COOLDOWN: i64 = 6;

/// Shared, mutable handle to a registered listener.
pub type ListenerRef = Rc<RefCell<dyn Listener>>;

/// Capability trait for objects that receive broadcast events.
///
/// Every method except identity has a no-op default. A listener that only
/// observes overrides [`update`](Listener::update); a skill that introduces
/// its own event type also overrides [`reaction_type`](Listener::reaction_type)
/// and [`effect`](Listener::effect).
pub trait Listener {
    /// Stable identity used for registration and removal.
    fn id(&self) -> ListenerId;

    /// Human-readable name (for logs).
    fn name(&self) -> &str;

    /// The event type this listener introduces, if any.
    fn reaction_type(&self) -> Option<&EventType> {
        None
    }

    /// Effect bound to [`reaction_type`](Listener::reaction_type).
    fn effect(&self) -> Effect {
        Effect::noop()
    }

    /// Bind the reaction type to the effect.
    ///
    /// Called once by the queue manager when the listener joins and its
    /// reaction type is not registered yet.
    fn reg(&self, registry: &HandlerRegistry) -> Result<(), RegistryError> {
        match self.reaction_type() {
            Some(event_type) => registry.register(event_type.clone(), self.effect()),
            None => Ok(()),
        }
    }

    /// Observe one broadcast event.
    ///
    /// May submit follow-up events to the event's owning manager. Errors
    /// abort the drain that delivered the event.
    fn update(&mut self, event: &GameEvent) -> Result<(), BusError> {
        let _ = event;
        Ok(())
    }
}

/// Identity and configuration common to every skill.
#[derive(Clone, Debug)]
pub struct SkillState {
    pub id: ListenerId,
    pub name: String,
    pub owner: Option<Character>,
    pub reaction_type: Option<EventType>,
}

impl SkillState {
    /// Create skill state with a fresh id.
    pub fn new(name: impl Into<String>, owner: Option<Character>) -> Self {
        Self {
            id: ListenerId::next(),
            name: name.into(),
            owner,
            reaction_type: None,
        }
    }

    /// Declare the event type this skill introduces (builder pattern).
    #[must_use]
    pub fn with_reaction_type(mut self, event_type: EventType) -> Self {
        self.reaction_type = Some(event_type);
        self
    }

    /// Check whether `character` is this skill's owner.
    #[must_use]
    pub fn is_owned_by(&self, character: &Character) -> bool {
        self.owner.as_ref() == Some(character)
    }
}

/// Cooldown counted in broadcast events.
///
/// Ticks once per event the skill observes; ready while the counter is at
/// or below zero. The counter keeps falling while ready.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooldown {
    remaining: i64,
    period: i64,
}

impl Cooldown {
    /// Create a ready cooldown that resets to `period`.
    #[must_use]
    pub const fn new(period: i64) -> Self {
        Self {
            remaining: 0,
            period,
        }
    }

    pub fn tick(&mut self) {
        self.remaining -= 1;
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.remaining <= 0
    }

    /// Start the cooldown after firing.
    pub fn reset(&mut self) {
        self.remaining = self.period;
    }

    #[must_use]
    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    #[must_use]
    pub fn period(&self) -> i64 {
        self.period
    }
}
