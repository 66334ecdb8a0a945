//! Players, roles and the roster.
//!
//! ## Roster
//!
//! Ordered name → `Player` mapping. Backed by a `Vec` (roster order matters
//! for backfill and candidate ordering) plus an index for O(1) lookup.
//! Names are fixed once the roster is built.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Secret role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Mafia,
    Citizen,
}

impl Role {
    /// Wire/display label (`MAFIA` / `CITIZEN`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Role::Mafia => "MAFIA",
            Role::Citizen => "CITIZEN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A seat at the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub role: Role,
    pub alive: bool,
}

impl Player {
    /// A living player.
    #[must_use]
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
            alive: true,
        }
    }

    /// A living citizen.
    #[must_use]
    pub fn citizen(name: impl Into<String>) -> Self {
        Self::new(name, Role::Citizen)
    }

    /// A living mafia.
    #[must_use]
    pub fn mafia(name: impl Into<String>) -> Self {
        Self::new(name, Role::Mafia)
    }

    /// Mark this player as already eliminated.
    #[must_use]
    pub fn dead(mut self) -> Self {
        self.alive = false;
        self
    }
}

/// Ordered player set keyed by unique name.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Player>", into = "Vec<Player>")]
pub struct Roster {
    players: Vec<Player>,
    index: FxHashMap<String, usize>,
}

impl Roster {
    /// Build a roster. Later duplicates of a name are ignored.
    pub fn new(players: impl IntoIterator<Item = Player>) -> Self {
        let mut roster = Self::default();
        for player in players {
            if roster.index.contains_key(&player.name) {
                continue;
            }
            roster.index.insert(player.name.clone(), roster.players.len());
            roster.players.push(player);
        }
        roster
    }

    /// Number of seats.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether the roster has no seats.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Look up a player.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Player> {
        self.index.get(name).map(|&i| &self.players[i])
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Player> {
        let i = *self.index.get(name)?;
        Some(&mut self.players[i])
    }

    /// Whether `name` is seated.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Players in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Living players in roster order.
    pub fn alive(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.alive)
    }
}

impl From<Vec<Player>> for Roster {
    fn from(players: Vec<Player>) -> Self {
        Self::new(players)
    }
}

impl From<Roster> for Vec<Player> {
    fn from(roster: Roster) -> Self {
        roster.players
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_labels() {
        assert_eq!(Role::Mafia.to_string(), "MAFIA");
        assert_eq!(serde_json::to_string(&Role::Citizen).unwrap(), "\"CITIZEN\"");
    }

    #[test]
    fn test_roster_order_and_lookup() {
        let roster = Roster::new(vec![
            Player::citizen("b"),
            Player::mafia("a"),
            Player::citizen("c").dead(),
        ]);

        let names: Vec<_> = roster.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(roster.get("a").unwrap().role, Role::Mafia);
        assert!(roster.get("z").is_none());
        assert_eq!(roster.alive().count(), 2);
    }

    #[test]
    fn test_roster_ignores_duplicate_names() {
        let roster = Roster::new(vec![Player::citizen("a"), Player::mafia("a")]);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.get("a").unwrap().role, Role::Citizen);
    }

    #[test]
    fn test_roster_serde() {
        let roster = Roster::new(vec![Player::citizen("x"), Player::mafia("y")]);
        let json = serde_json::to_string(&roster).unwrap();
        let back: Roster = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get("y").unwrap().role, Role::Mafia);
        assert_eq!(back.len(), 2);
    }
}
