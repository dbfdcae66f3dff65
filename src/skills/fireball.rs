//! Passive fireball.
//!
//! When the owner is damaged by an enemy and the skill is off cooldown, the
//! owner answers with a fireball at the attacker: the caster recovers
//! [`FIREBALL_HEAL`] hit points and the attacker loses [`FIREBALL_DAMAGE`].

use tracing::debug;

use crate::core::{Character, ListenerId};
use crate::error::BusError;
use crate::events::{EventType, GameEvent};
use crate::registry::{Effect, DAMAGE};

use super::{Cooldown, Listener, SkillState, SKILL_COOLDOWN};

/// Event type introduced by [`Fireball`].
pub const FIREBALL: EventType = EventType::from_static("Fireball");

/// Hit points the caster recovers.
pub const FIREBALL_HEAL: i64 = 9;

/// Hit points the attacker loses.
pub const FIREBALL_DAMAGE: i64 = 10;

/// Retaliating fireball skill.
#[derive(Clone, Debug)]
pub struct Fireball {
    state: SkillState,
    cooldown: Cooldown,
}

impl Fireball {
    pub fn new(owner: Character) -> Self {
        Self {
            state: SkillState::new("Passive Fireball", Some(owner))
                .with_reaction_type(FIREBALL),
            cooldown: Cooldown::new(SKILL_COOLDOWN),
        }
    }

    #[must_use]
    pub fn owner(&self) -> Option<&Character> {
        self.state.owner.as_ref()
    }

    /// Remaining cooldown in events; ready at zero or below.
    #[must_use]
    pub fn cooldown(&self) -> i64 {
        self.cooldown.remaining()
    }
}

impl Listener for Fireball {
    fn id(&self) -> ListenerId {
        self.state.id
    }

    fn name(&self) -> &str {
        &self.state.name
    }

    fn reaction_type(&self) -> Option<&EventType> {
        self.state.reaction_type.as_ref()
    }

    fn effect(&self) -> Effect {
        let caster = self.state.owner.clone();
        Effect::new(move |event| {
            debug!(caster = ?caster.as_ref().map(Character::name), "fireball resolves");
            if let Some(actor) = event.actor() {
                actor.adjust_hp(FIREBALL_HEAL);
            }
            if let Some(target) = event.target() {
                target.adjust_hp(-FIREBALL_DAMAGE);
            }
            Ok(())
        })
    }

    fn update(&mut self, event: &GameEvent) -> Result<(), BusError> {
        self.cooldown.tick();

        if !event.is(&DAMAGE) || !self.cooldown.is_ready() {
            return Ok(());
        }
        let (Some(attacker), Some(defender)) = (event.actor(), event.target()) else {
            return Ok(());
        };
        if !self.state.is_owned_by(defender) || attacker.is_ally_of(defender) {
            return Ok(());
        }
        let Some(manager) = event.manager() else {
            return Ok(());
        };

        debug!(owner = %defender, attacker = %attacker, "fireball triggered");
        let retaliation = manager
            .event(FIREBALL)
            .with_actor(defender.clone())
            .with_target(attacker.clone())
            .with_magnitude(1)
            .build()?;
        manager.submit_priority(retaliation);
        self.cooldown.reset();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TeamId;
    use crate::queue::QueueManager;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup() -> (QueueManager, Character, Character, Rc<RefCell<Fireball>>) {
        let manager = QueueManager::new();
        let hero = Character::new("hero", TeamId::new(1));
        let enemy = Character::with_hp("enemy", TeamId::new(2), 250);
        let fireball = Rc::new(RefCell::new(Fireball::new(hero.clone())));
        manager.register_listener(fireball.clone()).unwrap();
        (manager, hero, enemy, fireball)
    }

    #[test]
    fn test_registers_reaction_type() {
        let (manager, ..) = setup();
        assert!(manager.registry().is_registered(&FIREBALL));
    }

    #[test]
    fn test_triggers_on_enemy_damage() {
        let (manager, hero, enemy, fireball) = setup();
        let hit = manager
            .event(DAMAGE)
            .with_actor(enemy.clone())
            .with_target(hero.clone())
            .with_magnitude(7)
            .build()
            .unwrap();

        manager.broadcast(&hit).unwrap();

        assert_eq!(manager.pending_len(), 1);
        assert_eq!(fireball.borrow().cooldown(), SKILL_COOLDOWN);
    }

    #[test]
    fn test_ignores_ally_damage() {
        let (manager, hero, _, fireball) = setup();
        let friend = Character::new("friend", TeamId::new(1));
        let hit = manager
            .event(DAMAGE)
            .with_actor(friend)
            .with_target(hero)
            .with_magnitude(7)
            .build()
            .unwrap();

        manager.broadcast(&hit).unwrap();

        assert!(manager.is_idle());
        assert_eq!(fireball.borrow().cooldown(), -1);
    }

    #[test]
    fn test_ignores_damage_to_others() {
        let (manager, _, enemy, _) = setup();
        let bystander = Character::new("bystander", TeamId::new(1));
        let hit = manager
            .event(DAMAGE)
            .with_actor(enemy)
            .with_target(bystander)
            .with_magnitude(7)
            .build()
            .unwrap();

        manager.broadcast(&hit).unwrap();
        assert!(manager.is_idle());
    }

    #[test]
    fn test_respects_cooldown() {
        let (manager, hero, enemy, _) = setup();
        let hit = manager
            .event(DAMAGE)
            .with_actor(enemy)
            .with_target(hero)
            .with_magnitude(1)
            .build()
            .unwrap();

        manager.broadcast(&hit).unwrap();
        manager.broadcast(&hit).unwrap();
        assert_eq!(manager.pending_len(), 1);
    }

    #[test]
    fn test_effect() {
        let (manager, hero, enemy, _) = setup();
        let blast = manager
            .event(FIREBALL)
            .with_actor(hero.clone())
            .with_target(enemy.clone())
            .with_magnitude(1)
            .build()
            .unwrap();

        manager.dispatch(&blast).unwrap();
        assert_eq!(hero.hp(), 100 + FIREBALL_HEAL);
        assert_eq!(enemy.hp(), 250 - FIREBALL_DAMAGE);
    }
}
