//! Queue manager.
//!
//! Owns the pending-event deque, the listener list and the bound registry.
//!
//! ## Queue Orientation
//!
//! Events are drained from the back of the deque:
//! - [`submit_normal`](QueueManager::submit_normal) pushes to the front, so
//!   normal events resolve in submission order after everything queued.
//! - [`submit_priority`](QueueManager::submit_priority) pushes to the back,
//!   so the event resolves next. Skill reactions use this to resolve right
//!   after their trigger.
//!
//! ## Re-entrancy
//!
//! Listeners and effects run while [`drain`](QueueManager::drain) is in the
//! middle of an iteration and may submit, skip or clear events on the same
//! queue. No borrow of the queue or listener list is held across a call
//! into a listener or effect.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::core::{DrainConfig, ListenerId, ManagerId};
use crate::error::{BusError, ListenerError};
use crate::events::{EventBuilder, EventType, GameEvent};
use crate::registry::HandlerRegistry;
use crate::skills::ListenerRef;

use super::guard::DrainGuards;
use super::{AbortReason, DrainOutcome};

struct ListenerEntry {
    id: ListenerId,
    listener: ListenerRef,
}

struct ManagerShared {
    id: ManagerId,
    pending: RefCell<VecDeque<GameEvent>>,
    listeners: RefCell<Vec<ListenerEntry>>,
    registry: HandlerRegistry,
    config: Cell<DrainConfig>,
}

/// Handle to a queue manager.
///
/// Clones share the same queue. Events keep a weak reference to their
/// owning manager, so pending events never keep a manager alive.
///
/// ## Example
///
/// ```
/// use combat_bus::core::{Character, TeamId};
/// use combat_bus::queue::{DrainOutcome, QueueManager};
/// use combat_bus::registry::DAMAGE;
///
/// let manager = QueueManager::new();
/// let hero = Character::new("hero", TeamId::new(1));
///
/// let hit = manager
///     .event(DAMAGE)
///     .with_target(hero.clone())
///     .with_magnitude(7)
///     .build()
///     .unwrap();
/// manager.submit_normal(hit);
///
/// let outcome = manager.drain().unwrap();
/// assert_eq!(outcome, DrainOutcome::Exhausted { processed: 1 });
/// assert_eq!(hero.hp(), 93);
/// ```
#[derive(Clone)]
pub struct QueueManager {
    shared: Rc<ManagerShared>,
}

impl QueueManager {
    /// Create a manager bound to a fresh child of the base ruleset.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(HandlerRegistry::base().derive())
    }

    /// Create a manager bound to the given registry.
    #[must_use]
    pub fn with_registry(registry: HandlerRegistry) -> Self {
        Self {
            shared: Rc::new(ManagerShared {
                id: ManagerId::next(),
                pending: RefCell::new(VecDeque::new()),
                listeners: RefCell::new(Vec::new()),
                registry,
                config: Cell::new(DrainConfig::default()),
            }),
        }
    }

    /// Set the drain limits (builder pattern).
    #[must_use]
    pub fn with_config(self, config: DrainConfig) -> Self {
        self.set_config(config);
        self
    }

    pub fn set_config(&self, config: DrainConfig) {
        self.shared.config.set(config);
    }

    #[must_use]
    pub fn config(&self) -> DrainConfig {
        self.shared.config.get()
    }

    #[must_use]
    pub fn id(&self) -> ManagerId {
        self.shared.id
    }

    /// The bound handler registry.
    #[must_use]
    pub fn registry(&self) -> &HandlerRegistry {
        &self.shared.registry
    }

    /// Start building an event owned by this manager.
    pub fn event(&self, event_type: impl Into<EventType>) -> EventBuilder {
        GameEvent::builder(event_type).in_queue(self)
    }

    pub(crate) fn downgrade(&self) -> WeakManager {
        WeakManager {
            id: self.shared.id,
            shared: Rc::downgrade(&self.shared),
        }
    }

    // -------------------------------------------------------------------------
    // Queue
    // -------------------------------------------------------------------------

    /// Queue an event to resolve after everything already pending.
    pub fn submit_normal(&self, event: GameEvent) {
        debug!(manager = %self.id(), event_type = %event.event_type(), "queued event");
        self.shared.pending.borrow_mut().push_front(event);
    }

    /// Queue an event to resolve next.
    pub fn submit_priority(&self, event: GameEvent) {
        debug!(manager = %self.id(), event_type = %event.event_type(), "queued priority event");
        self.shared.pending.borrow_mut().push_back(event);
    }

    /// Drop up to `count` events from the resolving end of the queue without
    /// broadcasting or dispatching them. Returns how many were dropped.
    pub fn skip_next(&self, count: usize) -> usize {
        let mut pending = self.shared.pending.borrow_mut();
        let skipped = count.min(pending.len());
        let remaining = pending.len() - skipped;
        pending.truncate(remaining);
        skipped
    }

    /// Empty the queue.
    pub fn clear(&self) {
        self.shared.pending.borrow_mut().clear();
        debug!(manager = %self.id(), "queue cleared");
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.shared.pending.borrow().len()
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.shared.pending.borrow().is_empty()
    }

    pub(crate) fn pop_next(&self) -> Option<GameEvent> {
        self.shared.pending.borrow_mut().pop_back()
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    /// Add a listener.
    ///
    /// If the listener declares a reaction type that the bound registry does
    /// not know yet, the listener registers it first. A listener that fails
    /// to register its type is not added. A listener that is running its own
    /// update cannot be inspected and is rejected with [`ListenerError::Busy`].
    pub fn register_listener(&self, listener: ListenerRef) -> Result<ListenerId, BusError> {
        let id = {
            let candidate = listener.try_borrow().map_err(|_| ListenerError::Busy)?;
            let id = candidate.id();
            if self.shared.listeners.borrow().iter().any(|e| e.id == id) {
                return Err(ListenerError::AlreadyRegistered(id).into());
            }
            if let Some(reaction) = candidate.reaction_type() {
                if !self.registry().is_registered(reaction) {
                    candidate.reg(self.registry())?;
                }
            }
            debug!(manager = %self.id(), listener = %id, name = candidate.name(), "listener registered");
            id
        };
        self.shared
            .listeners
            .borrow_mut()
            .push(ListenerEntry { id, listener });
        Ok(id)
    }

    /// Remove a listener.
    ///
    /// Fails with [`ListenerError::NotRegistered`] if no listener with this
    /// id is registered; the list is left unchanged.
    pub fn remove_listener(&self, id: ListenerId) -> Result<ListenerRef, ListenerError> {
        let mut listeners = self.shared.listeners.borrow_mut();
        let index = listeners
            .iter()
            .position(|e| e.id == id)
            .ok_or(ListenerError::NotRegistered(id))?;
        debug!(manager = %self.shared.id, listener = %id, "listener removed");
        Ok(listeners.remove(index).listener)
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.shared.listeners.borrow().len()
    }

    #[must_use]
    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.shared.listeners.borrow().iter().any(|e| e.id == id)
    }

    /// Deliver an event to every listener in registration order.
    ///
    /// The listener list is snapshotted first, so listeners added or removed
    /// during the broadcast take effect from the next one. A listener that
    /// is already running (a nested broadcast from inside its own update) is
    /// skipped.
    pub fn broadcast(&self, event: &GameEvent) -> Result<(), BusError> {
        let snapshot: SmallVec<[(ListenerId, ListenerRef); 8]> = self
            .shared
            .listeners
            .borrow()
            .iter()
            .map(|e| (e.id, Rc::clone(&e.listener)))
            .collect();

        for (id, listener) in snapshot {
            match listener.try_borrow_mut() {
                Ok(mut listener) => listener.update(event)?,
                Err(_) => warn!(listener = %id, "listener busy; skipped nested broadcast"),
            }
        }
        Ok(())
    }

    /// Run the event's effect through the bound registry.
    pub fn dispatch(&self, event: &GameEvent) -> Result<(), BusError> {
        debug!(manager = %self.id(), event_type = %event.event_type(), "dispatching");
        self.registry().dispatch(event)
    }

    // -------------------------------------------------------------------------
    // Drain
    // -------------------------------------------------------------------------

    /// Process pending events until the queue is empty or a guard trips.
    ///
    /// Each iteration pops the next event and takes its fingerprint,
    /// broadcasts it, dispatches it, feeds the fingerprint and the resulting
    /// queue length to the repetition guard, then evaluates the guards. Errors from listeners or effects abort the drain and are
    /// returned as-is; the failing event is not re-queued.
    pub fn drain(&self) -> Result<DrainOutcome, BusError> {
        let mut guards = DrainGuards::new(self.config());
        let mut processed = 0u32;
        let mut tripped = None;

        info!(manager = %self.id(), pending = self.pending_len(), "drain started");

        while guards.has_budget() {
            let Some(event) = self.pop_next() else {
                break;
            };
            let fingerprint = event.fingerprint();

            self.broadcast(&event)?;
            self.dispatch(&event)?;

            guards.observe(fingerprint, self.pending_len());

            processed += 1;
            guards.consume();

            if let Some(reason) = guards.check() {
                tripped = Some(reason);
                break;
            }
        }

        let remaining = self.pending_len();
        if remaining == 0 {
            info!(manager = %self.id(), processed, "drain finished");
            return Ok(DrainOutcome::Exhausted { processed });
        }

        // Leaving the loop with events pending means the budget ran out.
        let reason = tripped.unwrap_or(AbortReason::LengthCap);
        warn!(manager = %self.id(), %reason, processed, remaining, "drain aborted");
        Ok(DrainOutcome::Aborted {
            reason,
            processed,
            remaining,
        })
    }
}

impl Default for QueueManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for QueueManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueManager")
            .field("id", &self.shared.id)
            .field("pending", &self.pending_len())
            .field("listeners", &self.listener_count())
            .field("registry", &self.shared.registry.id())
            .finish()
    }
}

/// Non-owning reference from an event to its queue manager.
#[derive(Clone, Debug)]
pub(crate) struct WeakManager {
    id: ManagerId,
    shared: Weak<ManagerShared>,
}

impl WeakManager {
    pub(crate) fn id(&self) -> ManagerId {
        self.id
    }

    pub(crate) fn upgrade(&self) -> Option<QueueManager> {
        self.shared.upgrade().map(|shared| QueueManager { shared })
    }
}
