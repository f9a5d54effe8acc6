use std::collections::BTreeMap;

use rand::{Rng, seq::IndexedRandom as _};

use crate::{PlayerDataset, PlayerRecord, RosterError, Side};

/// Floor positions, in roster order.
pub const POSITIONS: [&str; 5] = ["PG", "SG", "SF", "PF", "C"];
/// Players signed per team, starters included.
pub const TEAM_SIZE: usize = 10;
/// Anonymous names are `Player1` to `Player99`.
const ANONYMOUS_IDS: std::ops::RangeInclusive<u32> = 1..=99;

/// A player signed for a team.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedPlayer {
    pub name: String,
    /// Position string as listed in the dataset, possibly `A/B`.
    pub position: String,
    pub abilities: BTreeMap<String, f64>,
}

impl SelectedPlayer {
    fn sign(record: &PlayerRecord, position: &str) -> Self {
        Self {
            name: record.name.clone(),
            position: position.to_owned(),
            abilities: record.abilities.clone(),
        }
    }

    #[must_use]
    pub fn ability(&self, key: &str) -> f64 {
        self.abilities.get(key).copied().unwrap_or(0.0)
    }
}

/// The two squads of a matchup, starters first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamSelection {
    pub strong: Vec<SelectedPlayer>,
    pub weak: Vec<SelectedPlayer>,
}

/// Signs a strong and a weak team from `dataset`.
///
/// Starters: for every position a player listing it is drawn at random, with
/// `Overall >= strong_min` for the strong team and `Overall <= weak_max` for
/// the weak one. Bench: the dataset is scanned in order and matching players
/// (`Overall >= strong_min` or `Overall < weak_max`) are signed until each
/// team has [`TEAM_SIZE`] players. The bench only accepts one position at a
/// time, redrawn after each signing. Players without biographic information
/// are never picked.
///
/// With `anonymous`, every name is replaced by `Player<n>`, `n` in `1..=99`
/// (names may repeat).
pub fn select_team_players<R>(
    dataset: &PlayerDataset,
    strong_min: f64,
    weak_max: f64,
    anonymous: bool,
    rng: &mut R,
) -> Result<TeamSelection, RosterError>
where
    R: Rng + ?Sized,
{
    let mut selection = TeamSelection::default();

    for position in POSITIONS {
        let strong = draw_starter(dataset, &selection.strong, position, rng, |overall| {
            overall >= strong_min
        })
        .ok_or(RosterError::NoCandidates {
            side: Side::Strong,
            position,
        })?;
        let weak = draw_starter(dataset, &selection.weak, position, rng, |overall| {
            overall <= weak_max
        })
        .ok_or(RosterError::NoCandidates {
            side: Side::Weak,
            position,
        })?;
        selection.strong.push(strong);
        selection.weak.push(weak);
    }

    let starters = selection
        .strong
        .iter()
        .chain(&selection.weak)
        .map(|p| p.name.clone())
        .collect::<Vec<_>>();
    let mut wanted = random_position(rng);
    for record in dataset.players() {
        let Some(position) = record.position() else {
            continue;
        };
        if starters.contains(&record.name) || !position.contains(wanted) {
            continue;
        }
        let overall = record.overall();
        if overall >= strong_min && selection.strong.len() < TEAM_SIZE {
            selection.strong.push(SelectedPlayer::sign(record, position));
            wanted = random_position(rng);
        }
        if overall < weak_max && selection.weak.len() < TEAM_SIZE {
            selection.weak.push(SelectedPlayer::sign(record, position));
            wanted = random_position(rng);
        }
    }

    if anonymous {
        for player in selection.strong.iter_mut().chain(&mut selection.weak) {
            player.name = format!("Player{}", rng.random_range(ANONYMOUS_IDS));
        }
    }
    Ok(selection)
}

fn draw_starter<R, F>(
    dataset: &PlayerDataset,
    team: &[SelectedPlayer],
    position: &str,
    rng: &mut R,
    rated: F,
) -> Option<SelectedPlayer>
where
    R: Rng + ?Sized,
    F: Fn(f64) -> bool,
{
    let candidates = dataset
        .players()
        .iter()
        .filter(|record| record.plays(position) && rated(record.overall()))
        .filter(|record| team.iter().all(|p| p.name != record.name))
        .collect::<Vec<_>>();
    let record = candidates.choose(rng)?;
    Some(SelectedPlayer::sign(record, record.position()?))
}

fn random_position<R>(rng: &mut R) -> &'static str
where
    R: Rng + ?Sized,
{
    POSITIONS[rng.random_range(0..POSITIONS.len())]
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    /// Eight players per position: four rated 90, four rated 60.
    fn dataset() -> PlayerDataset {
        let mut players = Vec::new();
        for (offset, position) in [0.0, 1.0, 2.0, 3.0, 4.0].into_iter().zip(POSITIONS) {
            for i in 0..8 {
                let overall = if i < 4 { 90.0 } else { 60.0 };
                players.push(PlayerRecord::new(
                    format!("{position} {i}"),
                    position,
                    overall,
                    overall - offset,
                    overall + offset,
                ));
            }
        }
        players.push(PlayerRecord {
            name: "No Bio".to_owned(),
            biography: None,
            abilities: BTreeMap::from([("Overall".to_owned(), 99.0)]),
        });
        players.into_iter().collect()
    }

    #[test]
    fn test_starters_cover_every_position() {
        let mut rng = Pcg32::seed_from_u64(1);
        let selection = select_team_players(&dataset(), 85.0, 70.0, false, &mut rng).unwrap();
        for (i, position) in POSITIONS.iter().enumerate() {
            assert!(selection.strong[i].position.contains(position));
            assert!(selection.weak[i].position.contains(position));
        }
        for player in &selection.strong {
            assert!(player.ability("Overall") >= 85.0);
        }
        for player in &selection.weak {
            assert!(player.ability("Overall") <= 70.0);
        }
    }

    #[test]
    fn test_teams_fill_up_without_duplicates() {
        let mut rng = Pcg32::seed_from_u64(2);
        let selection = select_team_players(&dataset(), 85.0, 70.0, false, &mut rng).unwrap();
        for team in [&selection.strong, &selection.weak] {
            assert!(team.len() <= TEAM_SIZE);
            assert!(team.len() >= POSITIONS.len());
            let mut names = team.iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), team.len());
            assert!(!names.contains(&"No Bio"));
        }
    }

    #[test]
    fn test_anonymous_names() {
        let mut rng = Pcg32::seed_from_u64(3);
        let selection = select_team_players(&dataset(), 85.0, 70.0, true, &mut rng).unwrap();
        for player in selection.strong.iter().chain(&selection.weak) {
            let id = player.name.strip_prefix("Player").unwrap();
            assert!(ANONYMOUS_IDS.contains(&id.parse::<u32>().unwrap()), "{}", player.name);
        }
    }

    #[test]
    fn test_no_candidates() {
        let mut rng = Pcg32::seed_from_u64(4);
        assert_eq!(
            select_team_players(&dataset(), 95.0, 70.0, false, &mut rng),
            Err(RosterError::NoCandidates {
                side: Side::Strong,
                position: "PG"
            })
        );
    }
}
