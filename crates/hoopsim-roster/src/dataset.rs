use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};

/// Ability keys read by the selection and profile code.
pub const OVERALL: &str = "Overall";
pub const INSIDE_SCORING: &str = "Inside Scoring";
pub const OUTSIDE_SCORING: &str = "Outside Scoring";

/// One entry of the player dataset.
///
/// Only the fields the generator reads are kept; the rest of the record is
/// ignored. In JSON:
///
/// ```json
/// {
///   "player": "Jane Doe",
///   "biographic information": {"Position": "PG/SG", "Height": "6'3\""},
///   "general abilities": {"Overall": 84, "Inside Scoring": 79, "Outside Scoring": 88}
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    #[serde(rename = "player")]
    pub name: String,
    #[serde(rename = "biographic information")]
    pub biography: Option<Biography>,
    #[serde(
        rename = "general abilities",
        default,
        deserialize_with = "numeric_abilities"
    )]
    pub abilities: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Biography {
    /// One or more positions separated by `/`, e.g. `SF/PF`.
    #[serde(rename = "Position")]
    pub position: String,
}

impl PlayerRecord {
    /// Creates a record with a position and the three ratings the generator uses.
    #[must_use]
    pub fn new<S, P>(name: S, position: P, overall: f64, inside: f64, outside: f64) -> Self
    where
        S: Into<String>,
        P: Into<String>,
    {
        Self {
            name: name.into(),
            biography: Some(Biography {
                position: position.into(),
            }),
            abilities: [
                (OVERALL.to_owned(), overall),
                (INSIDE_SCORING.to_owned(), inside),
                (OUTSIDE_SCORING.to_owned(), outside),
            ]
            .into_iter()
            .collect(),
        }
    }

    #[must_use]
    pub fn position(&self) -> Option<&str> {
        self.biography.as_ref().map(|b| b.position.as_str())
    }

    /// Returns `true` if the position string mentions `position`.
    #[must_use]
    pub fn plays(&self, position: &str) -> bool {
        self.position().is_some_and(|p| p.contains(position))
    }

    /// The `Overall` rating; 0 if the dataset does not rate the player.
    #[must_use]
    pub fn overall(&self) -> f64 {
        self.ability(OVERALL)
    }

    #[must_use]
    pub fn ability(&self, key: &str) -> f64 {
        self.abilities.get(key).copied().unwrap_or(0.0)
    }
}

/// Keeps the numeric abilities, skipping any non-numeric entry.
fn numeric_abilities<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Ability {
        Number(f64),
        Other(IgnoredAny),
    }

    let raw = Option::<BTreeMap<String, Ability>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| match value {
            Ability::Number(n) => Some((key, n)),
            Ability::Other(_) => None,
        })
        .collect())
}

/// The full player dataset, in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerDataset {
    players: Vec<PlayerRecord>,
}

impl PlayerDataset {
    #[must_use]
    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl FromIterator<PlayerRecord> for PlayerDataset {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = PlayerRecord>,
    {
        Self {
            players: iter.into_iter().collect(),
        }
    }
}
