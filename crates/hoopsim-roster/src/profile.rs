use hoopsim_engine::{Matchup, Player, Roster, TeamEntry, TeamId};

use crate::{INSIDE_SCORING, OUTSIDE_SCORING, SelectedPlayer, TeamSelection};

/// Offensive power of a team: the mean over its players of the average of
/// inside and outside scoring. 0 for an empty team.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn team_power(team: &[SelectedPlayer]) -> f64 {
    if team.is_empty() {
        return 0.0;
    }
    let total = team
        .iter()
        .map(|p| (p.ability(INSIDE_SCORING) + p.ability(OUTSIDE_SCORING)) / 2.0)
        .sum::<f64>();
    total / team.len() as f64
}

/// Fills up to five floor positions from `team`, in order.
///
/// A player listed as `A/B` takes the first of `A`, `B` that is still open;
/// players whose positions are all taken sit on the bench.
#[must_use]
pub fn pick_starting_five(team: &[SelectedPlayer]) -> Roster {
    let mut roster = Roster::new();
    for player in team {
        if roster.len() == 5 {
            break;
        }
        let open = player
            .position
            .split('/')
            .map(str::trim)
            .find(|position| !position.is_empty() && roster.get(position).is_none());
        if let Some(position) = open {
            roster.insert(position, Player {
                name: player.name.clone(),
                abilities: player.abilities.clone(),
            });
        }
    }
    roster
}

/// The engine matchup for a selection: the strong team plays as `team1`, the
/// weak team as `team2`.
#[must_use]
pub fn build_matchup(selection: &TeamSelection) -> Matchup {
    let entry = |id: &str, team: &[SelectedPlayer]| TeamEntry {
        id: TeamId::new(id),
        power: team_power(team),
        roster: pick_starting_five(team),
    };
    Matchup::new(
        entry("team1", &selection.strong),
        entry("team2", &selection.weak),
    )
}
