//! Error taxonomy.
//!
//! Every error is raised synchronously to the immediate caller. The engine
//! never catches or retries internally.
//!
//! - [`ValidationError`]: an event could not be constructed. A malformed
//!   event never reaches a queue.
//! - [`RegistryError`]: a registry operation named a type in the wrong state.
//! - [`ListenerError`]: a listener could not be added or removed.
//! - [`BusError`]: umbrella returned by effect functions, listener updates
//!   and [`QueueManager::drain`](crate::queue::QueueManager::drain).
//!
//! A drain guard tripping is not an error. It is reported as
//! [`DrainOutcome::Aborted`](crate::queue::DrainOutcome::Aborted).

use crate::core::ListenerId;
use crate::events::EventType;

/// Event construction failures.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Magnitude must be zero or positive.
    #[error("event magnitude must not be negative (got {0})")]
    NegativeMagnitude(i64),

    /// Event type tags must be non-empty.
    #[error("event type must not be empty")]
    EmptyType,

    /// The event was not bound to a queue manager.
    #[error("event has no owning queue manager")]
    MissingManager,

    /// The owning queue manager no longer exists.
    #[error("owning queue manager has been dropped")]
    ManagerDropped,

    /// The owning manager's registry does not know this type.
    #[error("event type '{0}' is not registered with the owning manager's registry")]
    UnregisteredType(EventType),
}

/// Handler registry failures.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Registering a type that is already bound.
    #[error("event type '{0}' is already registered; replace or remove it first")]
    DuplicateRegistration(EventType),

    /// Replacing or removing a type that was never bound.
    #[error("event type '{0}' is not registered")]
    UnregisteredType(EventType),

    /// Dispatching an event whose type has no bound effect.
    #[error("no effect bound for event type '{0}'")]
    NoEffectBound(EventType),
}

/// Listener list failures.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ListenerError {
    /// Removing a listener that is not registered.
    #[error("{0} is not registered")]
    NotRegistered(ListenerId),

    /// Registering a listener twice with the same manager.
    #[error("{0} is already registered")]
    AlreadyRegistered(ListenerId),

    /// The listener is mid-update and cannot be registered.
    #[error("listener is running and cannot be registered")]
    Busy,
}

/// Any failure surfaced by the bus.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BusError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Listener(#[from] ListenerError),
}
