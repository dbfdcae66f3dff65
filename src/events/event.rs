//! Combat events.
//!
//! An event describes one occurrence: who acted, who was affected, what
//! kind of thing happened and how big it was. Events are validated when
//! built and immutable afterwards; an event that would fail validation can
//! never enter a queue.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::core::{Character, CharacterId, ManagerId};
use crate::error::ValidationError;
use crate::queue::{QueueManager, WeakManager};

use super::extra::{ExtraValue, Extras};

/// Event type tag.
///
/// Types are open-ended strings. A type must be registered with a
/// [`HandlerRegistry`](crate::registry::HandlerRegistry) before any event
/// of that type can be built against it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventType(Cow<'static, str>);

impl EventType {
    /// Create an event type from a static tag (usable in `const`).
    #[must_use]
    pub const fn from_static(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }

    /// Create an event type from any string.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(Cow::Owned(tag.into()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for EventType {
    fn from(s: String) -> Self {
        Self(Cow::Owned(s))
    }
}

impl From<&EventType> for EventType {
    fn from(t: &EventType) -> Self {
        t.clone()
    }
}

/// A validated event bound to one queue manager.
///
/// Built through [`EventBuilder`]:
///
/// ```
/// use combat_bus::core::{Character, TeamId};
/// use combat_bus::queue::QueueManager;
/// use combat_bus::registry::DAMAGE;
///
/// let manager = QueueManager::new();
/// let enemy = Character::new("enemy", TeamId::new(2));
/// let hero = Character::new("hero", TeamId::new(1));
///
/// let event = manager
///     .event(DAMAGE)
///     .with_actor(enemy)
///     .with_target(hero.clone())
///     .with_magnitude(7)
///     .build()
///     .unwrap();
///
/// assert_eq!(event.magnitude(), 7);
/// assert_eq!(event.target(), Some(&hero));
/// ```
#[derive(Clone, Debug)]
pub struct GameEvent {
    actor: Option<Character>,
    target: Option<Character>,
    event_type: EventType,
    magnitude: i64,
    extras: Extras,
    manager: WeakManager,
}

impl GameEvent {
    /// Start building an event of the given type.
    pub fn builder(event_type: impl Into<EventType>) -> EventBuilder {
        EventBuilder::new(event_type)
    }

    /// The character that caused the event.
    #[must_use]
    pub fn actor(&self) -> Option<&Character> {
        self.actor.as_ref()
    }

    /// The character affected by the event.
    #[must_use]
    pub fn target(&self) -> Option<&Character> {
        self.target.as_ref()
    }

    #[must_use]
    pub fn event_type(&self) -> &EventType {
        &self.event_type
    }

    /// Check the event's type.
    #[must_use]
    pub fn is(&self, event_type: &EventType) -> bool {
        &self.event_type == event_type
    }

    /// Base value of the event (damage dealt, hp healed, events skipped).
    /// Never negative.
    #[must_use]
    pub fn magnitude(&self) -> i64 {
        self.magnitude
    }

    #[must_use]
    pub fn extras(&self) -> &Extras {
        &self.extras
    }

    #[must_use]
    pub fn extra(&self, key: &str) -> Option<&ExtraValue> {
        self.extras.get(key)
    }

    /// The owning queue manager, if it is still alive.
    #[must_use]
    pub fn manager(&self) -> Option<QueueManager> {
        self.manager.upgrade()
    }

    /// The owning queue manager, or [`ValidationError::ManagerDropped`].
    pub fn require_manager(&self) -> Result<QueueManager, ValidationError> {
        self.manager.upgrade().ok_or(ValidationError::ManagerDropped)
    }

    #[must_use]
    pub fn manager_id(&self) -> ManagerId {
        self.manager.id()
    }

    /// Derive this event's loop-detection fingerprint.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint {
            event_type: self.event_type.clone(),
            magnitude: self.magnitude,
            extras: self
                .extras
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            actor: self.actor.as_ref().map(Character::id),
            target: self.target.as_ref().map(Character::id),
            manager: self.manager.id(),
        }
    }
}

/// Comparable summary of an event's content, used only for loop detection.
///
/// Two events with equal fingerprints are considered repetitions of each
/// other even though they are distinct values.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub event_type: EventType,
    pub magnitude: i64,
    /// Extension items sorted by key.
    pub extras: Vec<(String, ExtraValue)>,
    pub actor: Option<CharacterId>,
    pub target: Option<CharacterId>,
    pub manager: ManagerId,
}

/// Builder for [`GameEvent`].
///
/// All validation happens in [`build`](EventBuilder::build).
#[derive(Clone, Debug)]
pub struct EventBuilder {
    actor: Option<Character>,
    target: Option<Character>,
    event_type: EventType,
    magnitude: i64,
    extras: Extras,
    manager: Option<QueueManager>,
}

impl EventBuilder {
    /// Create a builder with magnitude 0, no actors and no manager.
    pub fn new(event_type: impl Into<EventType>) -> Self {
        Self {
            actor: None,
            target: None,
            event_type: event_type.into(),
            magnitude: 0,
            extras: Extras::new(),
            manager: None,
        }
    }

    /// Set the acting character (builder pattern).
    #[must_use]
    pub fn with_actor(mut self, actor: Character) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Set the target character (builder pattern).
    #[must_use]
    pub fn with_target(mut self, target: Character) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the magnitude (builder pattern).
    #[must_use]
    pub fn with_magnitude(mut self, magnitude: i64) -> Self {
        self.magnitude = magnitude;
        self
    }

    /// Add one extension item (builder pattern).
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<ExtraValue>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    /// Replace the whole extension map (builder pattern).
    #[must_use]
    pub fn with_extras(mut self, extras: Extras) -> Self {
        self.extras = extras;
        self
    }

    /// Bind the event to its owning queue manager (builder pattern).
    #[must_use]
    pub fn in_queue(mut self, manager: &QueueManager) -> Self {
        self.manager = Some(manager.clone());
        self
    }

    /// Validate and build the event.
    ///
    /// Fails if the magnitude is negative, the type is empty, no manager was
    /// given, or the manager's registry does not know the type.
    pub fn build(self) -> Result<GameEvent, ValidationError> {
        if self.magnitude < 0 {
            return Err(ValidationError::NegativeMagnitude(self.magnitude));
        }
        if self.event_type.is_empty() {
            return Err(ValidationError::EmptyType);
        }
        let manager = self.manager.ok_or(ValidationError::MissingManager)?;
        if !manager.registry().is_registered(&self.event_type) {
            return Err(ValidationError::UnregisteredType(self.event_type));
        }

        Ok(GameEvent {
            actor: self.actor,
            target: self.target,
            event_type: self.event_type,
            magnitude: self.magnitude,
            extras: self.extras,
            manager: manager.downgrade(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TeamId;
    use crate::registry::{DAMAGE, HEAL};

    #[test]
    fn test_event_type() {
        let t = EventType::new("poison");
        assert_eq!(t.as_str(), "poison");
        assert_eq!(format!("{}", t), "poison");
        assert_eq!(EventType::from_static("poison"), t);
        assert!(EventType::new("").is_empty());
    }

    #[test]
    fn test_builder_defaults() {
        let manager = QueueManager::new();
        let event = manager.event(HEAL).build().unwrap();

        assert_eq!(event.actor(), None);
        assert_eq!(event.target(), None);
        assert_eq!(event.magnitude(), 0);
        assert!(event.extras().is_empty());
        assert_eq!(event.manager_id(), manager.id());
        assert!(event.is(&HEAL));
    }

    #[test]
    fn test_negative_magnitude_rejected() {
        let manager = QueueManager::new();
        let err = manager.event(DAMAGE).with_magnitude(-1).build().unwrap_err();
        assert_eq!(err, ValidationError::NegativeMagnitude(-1));
    }

    #[test]
    fn test_empty_type_rejected() {
        let manager = QueueManager::new();
        let err = manager.event("").build().unwrap_err();
        assert_eq!(err, ValidationError::EmptyType);
    }

    #[test]
    fn test_missing_manager_rejected() {
        let err = GameEvent::builder(DAMAGE).with_magnitude(1).build().unwrap_err();
        assert_eq!(err, ValidationError::MissingManager);
    }

    #[test]
    fn test_unregistered_type_rejected() {
        let manager = QueueManager::new();
        let err = manager.event("poison").build().unwrap_err();
        assert_eq!(err, ValidationError::UnregisteredType(EventType::new("poison")));
    }

    #[test]
    fn test_manager_handle_is_weak() {
        let manager = QueueManager::new();
        let event = manager.event(DAMAGE).build().unwrap();
        assert_eq!(event.manager().map(|m| m.id()), Some(manager.id()));

        drop(manager);
        assert!(event.manager().is_none());
        assert_eq!(event.require_manager().err(), Some(ValidationError::ManagerDropped));
    }

    #[test]
    fn test_fingerprint_ignores_extra_order() {
        let manager = QueueManager::new();
        let hero = Character::new("hero", TeamId::new(1));

        let a = manager
            .event(DAMAGE)
            .with_target(hero.clone())
            .with_magnitude(3)
            .with_extra("element", "fire")
            .with_extra("crit", true)
            .build()
            .unwrap();
        let b = manager
            .event(DAMAGE)
            .with_target(hero)
            .with_magnitude(3)
            .with_extra("crit", true)
            .with_extra("element", "fire")
            .build()
            .unwrap();

        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_distinguishes_identity() {
        let manager = QueueManager::new();
        let other_manager = QueueManager::new();
        let a = Character::new("twin", TeamId::new(1));
        let b = Character::new("twin", TeamId::new(1));

        let to_a = manager.event(DAMAGE).with_target(a.clone()).build().unwrap();
        let to_b = manager.event(DAMAGE).with_target(b).build().unwrap();
        assert_ne!(to_a.fingerprint(), to_b.fingerprint());

        let elsewhere = other_manager.event(DAMAGE).with_target(a).build().unwrap();
        assert_ne!(to_a.fingerprint(), elsewhere.fingerprint());
    }
}
