//! Measurements of simulated quarters and summaries over game batches.
//!
//! Only the first four quarters of a game are measured.

use std::{collections::BTreeMap, fmt};

use hoopsim_engine::{Game, Quarter, TeamId};

use crate::descriptive::DescriptiveStats;

const REGULATION_QUARTERS: usize = 4;

/// What was measured on one quarter.
#[derive(Debug, Clone, PartialEq)]
pub struct QuarterStats {
    pub plays: u32,
    /// Share of scoring plays among all plays (boundary markers included).
    pub density: f64,
    /// Whitespace-separated words of the `time<TAB>description` log lines.
    pub words: u32,
    /// Changes of the team in possession, counting the first one.
    pub turns: u32,
    pub free_throws: u32,
    /// Scoring plays other than free throws.
    pub other_scores: u32,
    /// Points per team from scoring plays other than free throws.
    pub field_goal_points: BTreeMap<TeamId, u32>,
}

impl QuarterStats {
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn new(quarter: &Quarter) -> Self {
        let plays = quarter.len() as u32;
        let scoring = quarter.iter().filter(|p| p.scoring_play).count();
        let density = if quarter.is_empty() {
            0.0
        } else {
            f64::from(scoring as u32) / f64::from(plays)
        };
        let words = quarter
            .iter()
            .map(|p| {
                let line = format!("{}\t{}", p.time, p.description);
                line.split_whitespace().count() as u32
            })
            .sum();

        let mut turns = 0;
        let mut on_offense = None;
        for team in quarter.iter().filter_map(|p| p.team.as_ref()) {
            if on_offense != Some(team) {
                on_offense = Some(team);
                turns += 1;
            }
        }

        let mut free_throws = 0;
        let mut other_scores = 0;
        let mut field_goal_points = BTreeMap::new();
        for play in quarter.iter().filter(|p| p.scoring_play) {
            if play.description.contains("free throw") {
                free_throws += 1;
                continue;
            }
            other_scores += 1;
            if let Some(team) = &play.team {
                *field_goal_points.entry(team.clone()).or_insert(0) += u32::from(play.points);
            }
        }

        Self {
            plays,
            density,
            words,
            turns,
            free_throws,
            other_scores,
            field_goal_points,
        }
    }

    #[must_use]
    pub fn field_goal_points_of(&self, team: &TeamId) -> u32 {
        self.field_goal_points.get(team).copied().unwrap_or(0)
    }
}

/// Share of quarters won by each side or drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WinRates {
    pub first: f64,
    pub second: f64,
    pub draw: f64,
}

/// Summary of a batch of games.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchStats {
    pub quarters: usize,
    /// Mean density over quarters.
    pub density: f64,
    pub plays: DescriptiveStats,
    pub words: DescriptiveStats,
    pub turns: DescriptiveStats,
    pub free_throws_per_quarter: f64,
    pub other_scores_per_quarter: f64,
    /// Quarter outcomes between the first and second team of each game, by
    /// field-goal points.
    pub win_rates: WinRates,
}

impl BatchStats {
    /// Summarizes the regulation quarters of `games`.
    ///
    /// Returns `None` if there is no quarter to measure. Quarters are compared
    /// between the first two teams of each game's `team_players`, in key order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<'a, I>(games: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Game>,
    {
        let mut measured = Vec::new();
        let mut first_wins = 0_usize;
        let mut second_wins = 0_usize;
        for game in games {
            let mut teams = game.team_players.keys();
            let first = teams.next();
            let second = teams.next();
            for quarter in game.pbp.iter().take(REGULATION_QUARTERS) {
                let stats = QuarterStats::new(quarter);
                let score = |team: Option<&TeamId>| team.map_or(0, |t| stats.field_goal_points_of(t));
                match score(first).cmp(&score(second)) {
                    std::cmp::Ordering::Greater => first_wins += 1,
                    std::cmp::Ordering::Less => second_wins += 1,
                    std::cmp::Ordering::Equal => {}
                }
                measured.push(stats);
            }
        }

        let quarters = measured.len();
        let n = quarters as f64;
        let plays = DescriptiveStats::from_counts(measured.iter().map(|q| q.plays))?;
        let words = DescriptiveStats::from_counts(measured.iter().map(|q| q.words))?;
        let turns = DescriptiveStats::from_counts(measured.iter().map(|q| q.turns))?;
        let density = measured.iter().map(|q| q.density).sum::<f64>() / n;
        let free_throws = measured.iter().map(|q| f64::from(q.free_throws)).sum::<f64>();
        let other_scores = measured.iter().map(|q| f64::from(q.other_scores)).sum::<f64>();
        let draws = quarters - first_wins - second_wins;

        Some(Self {
            quarters,
            density,
            plays,
            words,
            turns,
            free_throws_per_quarter: free_throws / n,
            other_scores_per_quarter: other_scores / n,
            win_rates: WinRates {
                first: first_wins as f64 / n,
                second: second_wins as f64 / n,
                draw: draws as f64 / n,
            },
        })
    }

    /// Non-scoring plays per scoring play, the `x` of `S:NS = 1:x`.
    #[must_use]
    pub fn non_scoring_ratio(&self) -> f64 {
        (1.0 - self.density) / self.density
    }
}

impl fmt::Display for BatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = |f: &mut fmt::Formatter<'_>, name: &str, stats: &DescriptiveStats| {
            writeln!(
                f,
                "average {name}: {:.2}, min: {}, max: {}",
                stats.mean, stats.min, stats.max
            )
        };
        writeln!(f, "quarters: {}", self.quarters)?;
        writeln!(f, "S:NS is 1:{:.1}", self.non_scoring_ratio())?;
        range(f, "#plays", &self.plays)?;
        range(f, "#words", &self.words)?;
        range(f, "#turns", &self.turns)?;
        writeln!(
            f,
            "free throws per quarter: {:.2}, other scores per quarter: {:.2}",
            self.free_throws_per_quarter, self.other_scores_per_quarter
        )?;
        write!(
            f,
            "team1 win rate: {:.3}, team2 win rate: {:.3}, draw rate: {:.3}",
            self.win_rates.first, self.win_rates.second, self.win_rates.draw
        )
    }
}
