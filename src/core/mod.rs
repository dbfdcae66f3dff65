//! Core types: identities, characters and drain configuration.
//!
//! These are the building blocks every other module depends on. They carry
//! no event or queue logic of their own.

pub mod character;
pub mod config;
pub mod ids;

pub use character::{Character, CharacterSnapshot, DEFAULT_HP};
pub use config::DrainConfig;
pub use ids::{CharacterId, ListenerId, ManagerId, RegistryId, TeamId};
