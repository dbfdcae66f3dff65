//! Combat actors.
//!
//! A [`Character`] is a cheap, cloneable handle to one actor. Every clone
//! refers to the same underlying actor: effect functions mutate hit points
//! through the handle held by an event, and the caller observes the change
//! through its own clone.
//!
//! Equality and hashing use the character's [`CharacterId`], never its
//! current values. Two characters with the same name, team and hit points
//! are still different actors.

use std::cell::Cell;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::ids::{CharacterId, TeamId};

/// Hit points a character starts with unless told otherwise.
pub const DEFAULT_HP: i64 = 100;

#[derive(Debug)]
struct CharacterInner {
    id: CharacterId,
    name: String,
    team: TeamId,
    hp: Cell<i64>,
}

/// Shared handle to a combat actor.
///
/// Hit points are a plain signed integer. The engine never clamps them, so
/// they may go negative.
///
/// ```
/// use combat_bus::core::{Character, TeamId};
///
/// let hero = Character::new("hero", TeamId::new(1));
/// let alias = hero.clone();
///
/// alias.adjust_hp(-7);
/// assert_eq!(hero.hp(), 93);
/// assert_eq!(hero, alias);
/// ```
#[derive(Clone, Debug)]
pub struct Character {
    inner: Rc<CharacterInner>,
}

impl Character {
    /// Create a character with [`DEFAULT_HP`] hit points.
    pub fn new(name: impl Into<String>, team: TeamId) -> Self {
        Self::with_hp(name, team, DEFAULT_HP)
    }

    /// Create a character with explicit starting hit points.
    pub fn with_hp(name: impl Into<String>, team: TeamId, hp: i64) -> Self {
        Self {
            inner: Rc::new(CharacterInner {
                id: CharacterId::next(),
                name: name.into(),
                team,
                hp: Cell::new(hp),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> CharacterId {
        self.inner.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    #[must_use]
    pub fn team(&self) -> TeamId {
        self.inner.team
    }

    #[must_use]
    pub fn hp(&self) -> i64 {
        self.inner.hp.get()
    }

    /// Add `delta` to current hit points and return the new value.
    pub fn adjust_hp(&self, delta: i64) -> i64 {
        let hp = self.inner.hp.get().saturating_add(delta);
        self.inner.hp.set(hp);
        hp
    }

    /// Check whether two characters are on the same team.
    #[must_use]
    pub fn is_ally_of(&self, other: &Character) -> bool {
        self.team() == other.team()
    }

    /// Capture the character's current values.
    #[must_use]
    pub fn snapshot(&self) -> CharacterSnapshot {
        CharacterSnapshot {
            id: self.id(),
            name: self.inner.name.clone(),
            team: self.team(),
            hp: self.hp(),
        }
    }
}

impl PartialEq for Character {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Character {}

impl Hash for Character {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl std::fmt::Display for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.inner.name)
    }
}

/// Point-in-time copy of a character's values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub id: CharacterId,
    pub name: String,
    pub team: TeamId,
    pub hp: i64,
}
