//! Base ruleset.
//!
//! Three event types every ruleset starts from:
//! - [`DAMAGE`]: subtract the magnitude from the target's hit points
//! - [`HEAL`]: add the magnitude to the target's hit points
//! - [`COMMAND_SKIP`]: drop the next `magnitude` pending events from the
//!   owning queue without processing them
//!
//! Replacing or removing these in a registry derived from the base is
//! possible but changes every ruleset sharing that storage.

use tracing::{debug, warn};

use crate::error::{BusError, RegistryError};
use crate::events::{EventType, GameEvent};

use super::handler::{Effect, HandlerRegistry};

pub const DAMAGE: EventType = EventType::from_static("dmg");
pub const HEAL: EventType = EventType::from_static("heal");
pub const COMMAND_SKIP: EventType = EventType::from_static("command_skip");

impl HandlerRegistry {
    /// Create a registry holding the base ruleset.
    #[must_use]
    pub fn base() -> Self {
        let registry = Self::new();
        // A fresh registry cannot already hold these types.
        if let Err(err) = install_base_ruleset(&registry) {
            warn!(%err, "base ruleset already present");
        }
        registry
    }
}

/// Register the base ruleset into an existing registry.
pub fn install_base_ruleset(registry: &HandlerRegistry) -> Result<(), RegistryError> {
    registry.register(DAMAGE, Effect::new(apply_damage))?;
    registry.register(HEAL, Effect::new(apply_heal))?;
    registry.register(COMMAND_SKIP, Effect::new(apply_command_skip))?;
    Ok(())
}

fn apply_damage(event: &GameEvent) -> Result<(), BusError> {
    if let Some(target) = event.target() {
        let hp = target.adjust_hp(-event.magnitude());
        debug!(character = %target, amount = event.magnitude(), hp, "damage applied");
    }
    Ok(())
}

fn apply_heal(event: &GameEvent) -> Result<(), BusError> {
    if let Some(target) = event.target() {
        if event.magnitude() > 0 {
            let hp = target.adjust_hp(event.magnitude());
            debug!(character = %target, amount = event.magnitude(), hp, "heal applied");
        }
    }
    Ok(())
}

fn apply_command_skip(event: &GameEvent) -> Result<(), BusError> {
    if event.magnitude() <= 0 {
        return Ok(());
    }
    let manager = event.require_manager()?;
    let count = usize::try_from(event.magnitude()).unwrap_or(usize::MAX);
    let skipped = manager.skip_next(count);
    debug!(manager = %manager.id(), requested = count, skipped, "skip command applied");
    Ok(())
}
