use std::collections::BTreeMap;

use rand::{Rng, seq::IndexedRandom as _};
use serde::{Deserialize, Serialize};

use super::TeamId;

/// A player as seen by the engine: a display name plus free-form ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    #[serde(default)]
    pub abilities: BTreeMap<String, f64>,
}

impl Player {
    #[must_use]
    pub fn new<S>(name: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            abilities: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterSlot {
    pub position: String,
    pub player: Player,
}

/// Players on the floor for one team, keyed by position (`PG`, `SG`, ...).
///
/// Slots keep their insertion order, which is also the order of the names
/// reported in a game's `team_players`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    slots: Vec<RosterSlot>,
}

impl Roster {
    #[must_use]
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Puts `player` at `position`, replacing any previous occupant.
    pub fn insert<S>(&mut self, position: S, player: Player)
    where
        S: Into<String>,
    {
        let position = position.into();
        match self.slots.iter_mut().find(|slot| slot.position == position) {
            Some(slot) => slot.player = player,
            None => self.slots.push(RosterSlot { position, player }),
        }
    }

    #[must_use]
    pub fn get(&self, position: &str) -> Option<&Player> {
        self.slots
            .iter()
            .find(|slot| slot.position == position)
            .map(|slot| &slot.player)
    }

    pub fn slots(&self) -> impl Iterator<Item = &RosterSlot> {
        self.slots.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|slot| slot.player.name.as_str())
    }

    /// A player drawn uniformly over the occupied positions.
    pub fn random_player<R>(&self, rng: &mut R) -> Option<&Player>
    where
        R: Rng + ?Sized,
    {
        self.slots.choose(rng).map(|slot| &slot.player)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<S> FromIterator<(S, Player)> for Roster
where
    S: Into<String>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (S, Player)>,
    {
        let mut roster = Self::new();
        for (position, player) in iter {
            roster.insert(position, player);
        }
        roster
    }
}

/// One side of a matchup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamEntry {
    pub id: TeamId,
    /// Offensive strength on a 0–100 scale; biases possessions towards a make.
    pub power: f64,
    pub roster: Roster,
}

/// The two teams of a game. Possession `i` belongs to `teams[i % 2]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub teams: [TeamEntry; 2],
}

impl Matchup {
    #[must_use]
    pub fn new(first: TeamEntry, second: TeamEntry) -> Self {
        Self {
            teams: [first, second],
        }
    }

    /// The team owning possession number `possession`.
    #[must_use]
    pub fn on_offense(&self, possession: usize) -> &TeamEntry {
        &self.teams[possession % 2]
    }

    #[must_use]
    pub fn team_players(&self) -> BTreeMap<TeamId, Vec<String>> {
        self.teams
            .iter()
            .map(|team| {
                (
                    team.id.clone(),
                    team.roster.names().map(str::to_owned).collect(),
                )
            })
            .collect()
    }
}
