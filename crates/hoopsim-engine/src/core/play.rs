use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::GameClock;

/// Identifier of a team, also used as the team's display name in play text.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
pub struct TeamId(String);

impl TeamId {
    #[must_use]
    pub fn new<S>(name: S) -> Self
    where
        S: Into<String>,
    {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One line of the play-by-play log.
///
/// Boundary plays (quarter start/end markers) have no team and never score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub team: Option<TeamId>,
    pub time: GameClock,
    pub description: String,
    #[serde(rename = "ScoringPlay")]
    pub scoring_play: bool,
    pub points: u8,
}

impl Play {
    #[must_use]
    pub fn scored(team: TeamId, time: GameClock, description: String, points: u8) -> Self {
        Self {
            team: Some(team),
            time,
            description,
            scoring_play: true,
            points,
        }
    }

    #[must_use]
    pub fn unscored(team: TeamId, time: GameClock, description: String) -> Self {
        Self {
            team: Some(team),
            time,
            description,
            scoring_play: false,
            points: 0,
        }
    }

    /// The `start of quarter N` marker (`number` is 1-based).
    #[must_use]
    pub fn quarter_start(number: usize, time: GameClock) -> Self {
        Self::boundary(time, format!("start of quarter {number}"))
    }

    /// The marker appended when the clock runs out in the middle of a possession.
    #[must_use]
    pub fn quarter_end() -> Self {
        Self::boundary(GameClock::ZERO, "end of quarter".to_owned())
    }

    fn boundary(time: GameClock, description: String) -> Self {
        Self {
            team: None,
            time,
            description,
            scoring_play: false,
            points: 0,
        }
    }

    #[must_use]
    pub fn is_boundary(&self) -> bool {
        self.team.is_none()
    }
}

/// Plays of one quarter, in clock order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quarter {
    plays: Vec<Play>,
}

impl Quarter {
    #[must_use]
    pub const fn new() -> Self {
        Self { plays: Vec::new() }
    }

    pub fn push(&mut self, play: Play) {
        self.plays.push(play);
    }

    #[must_use]
    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn iter(&self) -> impl Iterator<Item = &Play> {
        self.plays.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.plays.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    /// Returns `true` if the quarter ended on an explicit clock-exhaustion marker.
    #[must_use]
    pub fn ended_on_clock(&self) -> bool {
        self.plays
            .last()
            .is_some_and(|play| play.is_boundary() && play.description == "end of quarter")
    }
}

impl FromIterator<Play> for Quarter {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Play>,
    {
        Self {
            plays: iter.into_iter().collect(),
        }
    }
}

/// A simulated game: the play-by-play log plus the derived team summaries.
///
/// Serializes to the benchmark game format:
///
/// ```json
/// {
///   "pbp": [[{"team": null, "time": "12:00", "description": "start of quarter 1", "ScoringPlay": false, "points": 0}, ...], ...],
///   "team_players": {"team1": ["..."], "team2": ["..."]},
///   "team_scores": {"team1": 98, "team2": 87}
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub pbp: Vec<Quarter>,
    pub team_players: BTreeMap<TeamId, Vec<String>>,
    pub team_scores: BTreeMap<TeamId, u32>,
}

impl Game {
    /// Assembles a game and computes `team_scores` from the quarters.
    #[must_use]
    pub fn new(pbp: Vec<Quarter>, team_players: BTreeMap<TeamId, Vec<String>>) -> Self {
        let team_scores = tally_scores(&pbp, team_players.keys().cloned());
        Self {
            pbp,
            team_players,
            team_scores,
        }
    }

    pub fn plays(&self) -> impl Iterator<Item = &Play> {
        self.pbp.iter().flat_map(Quarter::iter)
    }
}

/// Sums the points of every scoring play per team.
///
/// Every team in `teams` is present in the result, starting at zero; teams
/// that only appear in the plays are added as they score.
pub fn tally_scores<I>(quarters: &[Quarter], teams: I) -> BTreeMap<TeamId, u32>
where
    I: IntoIterator<Item = TeamId>,
{
    let mut scores = teams
        .into_iter()
        .map(|team| (team, 0))
        .collect::<BTreeMap<_, _>>();
    for play in quarters.iter().flat_map(Quarter::iter) {
        if let (Some(team), true) = (&play.team, play.scoring_play) {
            *scores.entry(team.clone()).or_insert(0) += u32::from(play.points);
        }
    }
    scores
}
