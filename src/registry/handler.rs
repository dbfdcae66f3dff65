//! Handler registry.
//!
//! The registry binds event types to effect functions. Registration happens
//! at setup time: an event can only be built once its type is registered.
//!
//! ## Shared Storage
//!
//! A [`HandlerRegistry`] is a handle. [`HandlerRegistry::derive`] returns a
//! child handle that aliases the parent's storage rather than copying it, so
//! a binding added, replaced or removed through either handle is visible
//! through both. Clone a handle to share the same registry; derive one to
//! get a separately identified registry over the same bindings.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::core::RegistryId;
use crate::error::{BusError, RegistryError};
use crate::events::{EventType, GameEvent};

/// An effect function: the mechanical consequence of one event type.
///
/// Effects run synchronously during dispatch and may call back into the
/// owning queue manager (to submit follow-ups or skip pending events).
#[derive(Clone)]
pub struct Effect(Rc<dyn Fn(&GameEvent) -> Result<(), BusError>>);

impl Effect {
    /// Wrap a closure as an effect.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&GameEvent) -> Result<(), BusError> + 'static,
    {
        Self(Rc::new(f))
    }

    /// An effect that does nothing.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(|_| Ok(()))
    }

    /// Run the effect against an event.
    pub fn apply(&self, event: &GameEvent) -> Result<(), BusError> {
        (self.0)(event)
    }
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Effect(..)")
    }
}

#[derive(Default)]
struct RegistryStorage {
    types: RefCell<FxHashSet<EventType>>,
    bindings: RefCell<FxHashMap<EventType, Effect>>,
}

/// Event type to effect function bindings.
///
/// ## Example
///
/// ```
/// use combat_bus::events::EventType;
/// use combat_bus::registry::HandlerRegistry;
///
/// const POISON: EventType = EventType::from_static("poison");
///
/// let base = HandlerRegistry::base();
/// let ruleset = base.derive();
///
/// ruleset
///     .handles(POISON, |event| {
///         if let Some(target) = event.target() {
///             target.adjust_hp(-event.magnitude());
///         }
///         Ok(())
///     })
///     .unwrap();
///
/// // The child aliases the base's storage.
/// assert!(base.is_registered(&POISON));
/// ```
#[derive(Clone)]
pub struct HandlerRegistry {
    id: RegistryId,
    parent: Option<RegistryId>,
    storage: Rc<RegistryStorage>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: RegistryId::next(),
            parent: None,
            storage: Rc::new(RegistryStorage::default()),
        }
    }

    /// Create a child registry that continues this one.
    ///
    /// The child shares this registry's storage: mutations through either
    /// handle are observed by the other.
    #[must_use]
    pub fn derive(&self) -> Self {
        Self {
            id: RegistryId::next(),
            parent: Some(self.id),
            storage: Rc::clone(&self.storage),
        }
    }

    #[must_use]
    pub fn id(&self) -> RegistryId {
        self.id
    }

    /// The registry this one was derived from, if any.
    #[must_use]
    pub fn parent_id(&self) -> Option<RegistryId> {
        self.parent
    }

    /// Check whether two handles alias the same bindings.
    #[must_use]
    pub fn shares_storage_with(&self, other: &HandlerRegistry) -> bool {
        Rc::ptr_eq(&self.storage, &other.storage)
    }

    /// Bind a new event type to its effect.
    ///
    /// Fails without modifying the registry if the type is already bound.
    pub fn register(
        &self,
        event_type: impl Into<EventType>,
        effect: Effect,
    ) -> Result<(), RegistryError> {
        let event_type = event_type.into();
        let mut types = self.storage.types.borrow_mut();
        if types.contains(&event_type) {
            return Err(RegistryError::DuplicateRegistration(event_type));
        }
        types.insert(event_type.clone());
        debug!(registry = %self.id, event_type = %event_type, "registered handler");
        self.storage.bindings.borrow_mut().insert(event_type, effect);
        Ok(())
    }

    /// Register a closure as the effect of a new event type.
    pub fn handles<F>(&self, event_type: impl Into<EventType>, f: F) -> Result<(), RegistryError>
    where
        F: Fn(&GameEvent) -> Result<(), BusError> + 'static,
    {
        self.register(event_type, Effect::new(f))
    }

    /// Overwrite the effect of an already registered type.
    pub fn replace(
        &self,
        event_type: impl Into<EventType>,
        effect: Effect,
    ) -> Result<(), RegistryError> {
        let event_type = event_type.into();
        if !self.is_registered(&event_type) {
            return Err(RegistryError::UnregisteredType(event_type));
        }
        debug!(registry = %self.id, event_type = %event_type, "replaced handler");
        self.storage.bindings.borrow_mut().insert(event_type, effect);
        Ok(())
    }

    /// Unbind and unregister a type.
    ///
    /// Removing one of the base types (damage, heal, skip) is allowed but
    /// makes every event of that type unbuildable.
    pub fn remove(&self, event_type: impl Into<EventType>) -> Result<(), RegistryError> {
        let event_type = event_type.into();
        if !self.storage.types.borrow_mut().remove(&event_type) {
            return Err(RegistryError::UnregisteredType(event_type));
        }
        self.storage.bindings.borrow_mut().remove(&event_type);
        debug!(registry = %self.id, event_type = %event_type, "removed handler");
        Ok(())
    }

    #[must_use]
    pub fn is_registered(&self, event_type: &EventType) -> bool {
        self.storage.types.borrow().contains(event_type)
    }

    /// All registered types, sorted.
    #[must_use]
    pub fn registered_types(&self) -> Vec<EventType> {
        let mut types: Vec<_> = self.storage.types.borrow().iter().cloned().collect();
        types.sort();
        types
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.types.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.types.borrow().is_empty()
    }

    /// Run the effect bound to the event's type.
    ///
    /// The binding is looked up at call time, so a type removed after the
    /// event was built fails here with [`RegistryError::NoEffectBound`].
    /// No borrow is held while the effect runs; effects may register or
    /// replace types.
    pub fn dispatch(&self, event: &GameEvent) -> Result<(), BusError> {
        let effect = self
            .storage
            .bindings
            .borrow()
            .get(event.event_type())
            .cloned()
            .ok_or_else(|| RegistryError::NoEffectBound(event.event_type().clone()))?;
        effect.apply(event)
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("types", &self.registered_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POISON: EventType = EventType::from_static("poison");

    #[test]
    fn test_register_and_lookup() {
        let registry = HandlerRegistry::new();
        assert!(registry.is_empty());

        registry.register(POISON, Effect::noop()).unwrap();
        assert!(registry.is_registered(&POISON));
        assert!(!registry.is_registered(&EventType::new("burn")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let registry = HandlerRegistry::new();
        registry.register(POISON, Effect::noop()).unwrap();

        let err = registry.register(POISON, Effect::noop()).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateRegistration(POISON));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_replace_requires_registration() {
        let registry = HandlerRegistry::new();
        let err = registry.replace(POISON, Effect::noop()).unwrap_err();
        assert_eq!(err, RegistryError::UnregisteredType(POISON));
        assert!(!registry.is_registered(&POISON));
    }

    #[test]
    fn test_remove() {
        let registry = HandlerRegistry::new();
        registry.register(POISON, Effect::noop()).unwrap();
        registry.remove(POISON).unwrap();
        assert!(!registry.is_registered(&POISON));

        let err = registry.remove(POISON).unwrap_err();
        assert_eq!(err, RegistryError::UnregisteredType(POISON));
    }

    #[test]
    fn test_derive_aliases_storage() {
        let parent = HandlerRegistry::new();
        let child = parent.derive();

        assert_ne!(parent.id(), child.id());
        assert_eq!(child.parent_id(), Some(parent.id()));
        assert!(child.shares_storage_with(&parent));

        child.register(POISON, Effect::noop()).unwrap();
        assert!(parent.is_registered(&POISON));

        parent.remove(POISON).unwrap();
        assert!(!child.is_registered(&POISON));
    }

    #[test]
    fn test_registered_types_sorted() {
        let registry = HandlerRegistry::new();
        registry.register("b", Effect::noop()).unwrap();
        registry.register("a", Effect::noop()).unwrap();
        assert_eq!(
            registry.registered_types(),
            vec![EventType::new("a"), EventType::new("b")]
        );
    }
}
