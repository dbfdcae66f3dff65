//! Event data model.
//!
//! - [`EventType`]: Open-ended string tag naming what happened
//! - [`GameEvent`]: One validated occurrence bound to a queue manager
//! - [`EventBuilder`]: Validating constructor for events
//! - [`Fingerprint`]: Comparable summary used for loop detection
//! - [`ExtraValue`] / [`Extras`]: Extension data carried by events

mod event;
mod extra;

pub use event::{EventBuilder, EventType, Fingerprint, GameEvent};
pub use extra::{ExtraValue, Extras};
