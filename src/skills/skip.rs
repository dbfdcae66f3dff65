//! Passive skip.
//!
//! When the owner takes damage and the skill is off cooldown, the owner
//! cancels the next pending event with a priority skip command.

use tracing::debug;

use crate::core::{Character, ListenerId};
use crate::error::BusError;
use crate::events::GameEvent;
use crate::registry::{COMMAND_SKIP, DAMAGE};

use super::{Cooldown, Listener, SkillState, SKILL_COOLDOWN};

/// Skill that skips the event following a hit on its owner.
///
/// Unlike [`Fireball`](super::Fireball) it fires on any damage to the owner,
/// including damage from allies or with no actor. It introduces no event
/// type of its own; the skip command is part of the base ruleset.
#[derive(Clone, Debug)]
pub struct Skip {
    state: SkillState,
    cooldown: Cooldown,
}

impl Skip {
    pub fn new(owner: Character) -> Self {
        Self {
            state: SkillState::new("Passive Skip", Some(owner)),
            cooldown: Cooldown::new(SKILL_COOLDOWN),
        }
    }

    #[must_use]
    pub fn owner(&self) -> Option<&Character> {
        self.state.owner.as_ref()
    }

    #[must_use]
    pub fn cooldown(&self) -> i64 {
        self.cooldown.remaining()
    }
}

impl Listener for Skip {
    fn id(&self) -> ListenerId {
        self.state.id
    }

    fn name(&self) -> &str {
        &self.state.name
    }

    fn update(&mut self, event: &GameEvent) -> Result<(), BusError> {
        self.cooldown.tick();

        if !event.is(&DAMAGE) || !self.cooldown.is_ready() {
            return Ok(());
        }
        let Some(defender) = event.target() else {
            return Ok(());
        };
        if !self.state.is_owned_by(defender) {
            return Ok(());
        }
        let Some(manager) = event.manager() else {
            return Ok(());
        };

        debug!(owner = %defender, "skip triggered");
        let mut command = manager
            .event(COMMAND_SKIP)
            .with_actor(defender.clone())
            .with_magnitude(1)
            .with_extras(event.extras().clone());
        if let Some(attacker) = event.actor() {
            command = command.with_target(attacker.clone());
        }
        manager.submit_priority(command.build()?);
        self.cooldown.reset();
        Ok(())
    }
}
