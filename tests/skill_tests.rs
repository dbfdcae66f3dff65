//! Skill integration tests.
//!
//! These tests run full skirmishes through the bus: characters, sample
//! skills, submitted attacks, and a drain.

use std::cell::RefCell;
use std::rc::Rc;

use combat_bus::core::{Character, TeamId};
use combat_bus::queue::{DrainOutcome, QueueManager};
use combat_bus::registry::DAMAGE;
use combat_bus::skills::{Fireball, Listener, Skip, FIREBALL_DAMAGE, FIREBALL_HEAL, SKILL_COOLDOWN};

struct Skirmish {
    manager: QueueManager,
    hero: Character,
    enemy: Character,
    hero_fireball: Rc<RefCell<Fireball>>,
    enemy_skip: Rc<RefCell<Skip>>,
    enemy_fireball: Rc<RefCell<Fireball>>,
}

/// Hero (team 1, 100 hp) holds a fireball; enemy (team 2, 250 hp) holds a
/// skip and a fireball.
fn skirmish() -> Skirmish {
    let manager = QueueManager::new();
    let hero = Character::with_hp("hero", TeamId::new(1), 100);
    let enemy = Character::with_hp("enemy", TeamId::new(2), 250);

    let hero_fireball = Rc::new(RefCell::new(Fireball::new(hero.clone())));
    let enemy_skip = Rc::new(RefCell::new(Skip::new(enemy.clone())));
    let enemy_fireball = Rc::new(RefCell::new(Fireball::new(enemy.clone())));

    manager.register_listener(hero_fireball.clone()).unwrap();
    manager.register_listener(enemy_skip.clone()).unwrap();
    manager.register_listener(enemy_fireball.clone()).unwrap();

    Skirmish {
        manager,
        hero,
        enemy,
        hero_fireball,
        enemy_skip,
        enemy_fireball,
    }
}

fn hit(manager: &QueueManager, from: &Character, to: &Character, amount: i64) {
    let event = manager
        .event(DAMAGE)
        .with_actor(from.clone())
        .with_target(to.clone())
        .with_magnitude(amount)
        .build()
        .unwrap();
    manager.submit_normal(event);
}

/// Enemy hits hero for 7; hero's fireball retaliates.
#[test]
fn test_enemy_attack_triggers_fireball() {
    let s = skirmish();
    hit(&s.manager, &s.enemy, &s.hero, 7);

    let outcome = s.manager.drain().unwrap();
    assert_eq!(outcome, DrainOutcome::Exhausted { processed: 2 });

    // 100 - 7, then the fireball heals its caster.
    assert_eq!(s.hero.hp(), 100 - 7 + FIREBALL_HEAL);
    assert_eq!(s.hero.hp(), 102);
    // The fireball burns the attacker.
    assert_eq!(s.enemy.hp(), 250 - FIREBALL_DAMAGE);
    assert_eq!(s.enemy.hp(), 240);

    // Hero's fireball fired (cooldown 6) and then observed its own fireball.
    assert_eq!(s.hero_fireball.borrow().cooldown(), SKILL_COOLDOWN - 1);
    // Enemy skills never fired and ticked on both events.
    assert_eq!(s.enemy_skip.borrow().cooldown(), -2);
    assert_eq!(s.enemy_fireball.borrow().cooldown(), -2);
}

/// A skill's cooldown is set right after it fires.
#[test]
fn test_cooldown_set_on_fire() {
    let s = skirmish();
    let event = s
        .manager
        .event(DAMAGE)
        .with_actor(s.enemy.clone())
        .with_target(s.hero.clone())
        .with_magnitude(7)
        .build()
        .unwrap();

    s.manager.broadcast(&event).unwrap();
    assert_eq!(s.hero_fireball.borrow().cooldown(), SKILL_COOLDOWN);
    assert_eq!(s.manager.pending_len(), 1);
}

/// Hero hits enemy; the enemy's skip and fireball both react. The later
/// priority submission (fireball) resolves first; the skip then cancels the
/// hero's queued follow-up attack.
#[test]
fn test_hero_attack_triggers_enemy_skills() {
    let s = skirmish();
    hit(&s.manager, &s.hero, &s.enemy, 5);
    hit(&s.manager, &s.hero, &s.enemy, 8);

    let outcome = s.manager.drain().unwrap();
    assert!(outcome.is_exhausted());

    // First hit: enemy 245. Broadcast queues skip, then fireball on top.
    // Fireball: enemy +9 (254), hero -10 (90).
    // Skip: drops the second hit.
    assert_eq!(s.enemy.hp(), 250 - 5 + FIREBALL_HEAL);
    assert_eq!(s.hero.hp(), 100 - FIREBALL_DAMAGE);
    assert_eq!(outcome.processed(), 3);

    assert_eq!(s.enemy_skip.borrow().cooldown(), SKILL_COOLDOWN - 2);
    assert_eq!(s.enemy_fireball.borrow().cooldown(), SKILL_COOLDOWN - 2);
}

/// Back-and-forth attacks respect cooldowns across drains.
#[test]
fn test_cooldown_persists_across_drains() {
    let s = skirmish();

    hit(&s.manager, &s.enemy, &s.hero, 7);
    s.manager.drain().unwrap();
    assert_eq!(s.hero.hp(), 102);

    // Second attack: fireball is still cooling down (5 -> 4), no retaliation.
    hit(&s.manager, &s.enemy, &s.hero, 7);
    let outcome = s.manager.drain().unwrap();
    assert_eq!(outcome, DrainOutcome::Exhausted { processed: 1 });
    assert_eq!(s.hero.hp(), 95);
    assert_eq!(s.enemy.hp(), 240);
    assert_eq!(s.hero_fireball.borrow().cooldown(), SKILL_COOLDOWN - 2);
}

/// Hit points are never clamped.
#[test]
fn test_hp_goes_negative() {
    let manager = QueueManager::new();
    let a = Character::with_hp("a", TeamId::new(1), 5);
    let b = Character::with_hp("b", TeamId::new(2), 5);

    hit(&manager, &a, &b, 50);
    manager.drain().unwrap();
    assert_eq!(b.hp(), -45);
}

/// A removed skill stops reacting.
#[test]
fn test_removed_skill_stops_reacting() {
    let s = skirmish();
    let id = s.hero_fireball.borrow().id();
    s.manager.remove_listener(id).unwrap();

    hit(&s.manager, &s.enemy, &s.hero, 7);
    s.manager.drain().unwrap();
    assert_eq!(s.hero.hp(), 93);
    assert_eq!(s.enemy.hp(), 250);
}
