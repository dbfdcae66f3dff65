//! Event type registry.
//!
//! - [`HandlerRegistry`]: Event type to effect bindings, with aliasing
//!   child registries
//! - [`Effect`]: An effect function bound to an event type
//! - [`DAMAGE`], [`HEAL`], [`COMMAND_SKIP`]: The base ruleset every
//!   registry built with [`HandlerRegistry::base`] starts from
//!
//! ## Example Usage
//!
//! ```
//! use combat_bus::events::EventType;
//! use combat_bus::registry::{Effect, HandlerRegistry, DAMAGE};
//!
//! let registry = HandlerRegistry::base().derive();
//! assert!(registry.is_registered(&DAMAGE));
//!
//! // Two-step registration: define the effect, then bind it.
//! let shield = Effect::new(|_event| Ok(()));
//! registry.register("shield", shield).unwrap();
//!
//! // Registering the same type twice is an error.
//! assert!(registry.register("shield", Effect::noop()).is_err());
//!
//! // Replacing keeps the type registered.
//! registry.replace("shield", Effect::noop()).unwrap();
//! assert!(registry.is_registered(&EventType::new("shield")));
//! ```

mod base;
mod handler;

pub use base::{install_base_ruleset, COMMAND_SKIP, DAMAGE, HEAL};
pub use handler::{Effect, HandlerRegistry};
