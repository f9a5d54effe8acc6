use rand::Rng;
use tracing::debug;

use crate::{
    SimulationError,
    core::{Game, Matchup, Play, Quarter},
    engine::{
        GameSeed, ModelData, NoFallback, PointClassifier, SimulationConfig, TurnSampler,
        assign_timestamps, fill_placeholders, make_or_miss, parse_points, plays_per_turn,
        render_path,
    },
};

/// Composes possessions into quarters and games.
///
/// Possession `i` of a quarter belongs to `matchup.teams[i % 2]`. Each one is
/// sampled, rendered, timed and scored, then appended to the quarter until the
/// possession cap or until the clock runs out in the middle of a possession.
#[derive(Debug, Clone)]
pub struct GameSimulator<'a, C = NoFallback> {
    model: &'a ModelData,
    config: SimulationConfig,
    classifier: C,
}

impl<'a> GameSimulator<'a> {
    #[must_use]
    pub fn new(model: &'a ModelData, config: SimulationConfig) -> Self {
        Self::with_classifier(model, config, NoFallback)
    }
}

impl<'a, C> GameSimulator<'a, C>
where
    C: PointClassifier,
{
    /// Creates a simulator that asks `classifier` about unrecognized scoring plays.
    #[must_use]
    pub fn with_classifier(model: &'a ModelData, config: SimulationConfig, classifier: C) -> Self {
        Self {
            model,
            config,
            classifier,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Simulates a full game with a fresh generator seeded from `seed`.
    pub fn simulate_seeded(&self, matchup: &Matchup, seed: GameSeed) -> Result<Game, SimulationError> {
        let mut rng = seed.rng();
        self.simulate_game(matchup, &mut rng)
    }

    pub fn simulate_game<R>(&self, matchup: &Matchup, rng: &mut R) -> Result<Game, SimulationError>
    where
        R: Rng + ?Sized,
    {
        let pbp = (1..=self.config.quarters)
            .map(|number| self.simulate_quarter(matchup, number, rng))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Game::new(pbp, matchup.team_players()))
    }

    /// Simulates quarter `number` (1-based) from a full clock.
    pub fn simulate_quarter<R>(
        &self,
        matchup: &Matchup,
        number: usize,
        rng: &mut R,
    ) -> Result<Quarter, SimulationError>
    where
        R: Rng + ?Sized,
    {
        let sampler = TurnSampler::new(&self.model.graph).with_max_retries(self.config.max_retries);
        let mut clock = self.config.quarter_length;
        let mut quarter = Quarter::new();
        quarter.push(Play::quarter_start(number, clock));

        let mut opening = true;
        for possession in 0..self.config.max_possessions {
            let team = matchup.on_offense(possession);
            let target_length = plays_per_turn(self.config.density, rng);
            let outcome = make_or_miss(team.power, rng);
            let path = sampler
                .sample(target_length, Some(outcome), opening, rng)?
                .into_path();
            opening = false;
            if path.is_empty() {
                continue;
            }

            let templates = render_path(&path, &self.model.templates, rng);
            let timeline = assign_timestamps(&self.model.durations, &path, clock, rng);
            for ((node, &time), template) in path.iter().zip(&timeline.stamps).zip(templates) {
                let Some(template) = template else {
                    continue;
                };
                let description = fill_placeholders(&template, &team.id, &team.roster, rng);
                let play = if node.is_make() {
                    let points = parse_points(&template, &self.classifier);
                    Play::scored(team.id.clone(), time, description, points)
                } else {
                    Play::unscored(team.id.clone(), time, description)
                };
                quarter.push(play);
            }

            if timeline.exhausted {
                debug!(quarter = number, possession, "clock ran out");
                quarter.push(Play::quarter_end());
                break;
            }
            if let Some(last) = timeline.last() {
                clock = last;
            }
        }
        Ok(quarter)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::{
        SampleError,
        core::{GameClock, Node, Player, Roster, TeamEntry, TeamId},
        engine::{ClassifyError, DescriptionTemplates, EventDurations},
    };

    fn model() -> ModelData {
        let corpus: Vec<&[&str]> = vec![
            &["start", "miss", "defensive rebound", "end"],
            &["start", "miss", "offensive rebound", "make", "end"],
            &["start", "miss", "offensive rebound", "miss", "defensive rebound", "end"],
            &["start", "defensive three seconds", "miss", "defensive rebound", "end"],
            &["start", "make", "end"],
            &["start", "make", "end"],
            &["start", "shooting foul", "make", "make", "end"],
            &["start", "shooting foul", "make", "miss", "defensive rebound", "end"],
            &["start", "bad pass turnover", "steal", "end"],
            &["vs", "jump ball", "miss", "defensive rebound", "end"],
            &["vs", "jump ball", "make", "end"],
        ];
        let corpus = corpus
            .into_iter()
            .map(|p| p.iter().copied().map(Node::from_label).collect::<Vec<_>>());

        let mut durations = EventDurations::default();
        durations.insert("vs", [(0, 1.0)]);
        durations.insert("jump ball", [(2, 0.5), (4, 0.5)]);
        durations.insert("miss", [(0, 0.2), (8, 0.4), (14, 0.4)]);
        durations.insert("make", [(0, 0.6), (9, 0.4)]);
        durations.insert("defensive rebound", [(1, 1.0)]);
        durations.insert("offensive rebound", [(1, 1.0)]);
        durations.insert("shooting foul", [(6, 0.5), (12, 0.5)]);
        durations.insert("bad pass turnover", [(10, 1.0)]);
        durations.insert("steal", [(0, 0.5), (1, 0.5)]);
        durations.insert("defensive three seconds", [(3, 1.0)]);

        let mut templates = DescriptionTemplates::default();
        templates.insert("vs", ["<team> wins the opening tip"]);
        templates.insert("jump ball", ["jump ball <Player-C> vs. <Opponent>"]);
        templates.insert("miss", [
            "<Player-SG> misses 24-foot three point jumper",
            "<Player-PG> misses layup",
        ]);
        templates.insert("make", [
            "<Player-PG> makes driving layup",
            "<Player-SF> makes 26-foot three pointer",
            "<Player-C> makes free throw 1 of 2",
            "<Player-C> makes free throw 2 of 2",
            "<Player-PF> banks it in",
        ]);
        templates.insert("defensive rebound", ["<Player-C> defensive rebound"]);
        templates.insert("offensive rebound", ["<Player-PF> offensive rebound"]);
        templates.insert("shooting foul", ["<Player-SF> shooting foul"]);
        templates.insert("bad pass turnover", ["<Player-PG> bad pass"]);
        templates.insert("steal", ["<Player-SG> steal"]);
        templates.insert("defensive three seconds", ["<Player-C> defensive 3-seconds"]);

        ModelData::new(corpus, durations, templates)
    }

    fn matchup() -> Matchup {
        let team = |id: &str, power: f64, prefix: &str| TeamEntry {
            id: TeamId::new(id),
            power,
            roster: ["PG", "SG", "SF", "PF", "C"]
                .into_iter()
                .map(|pos| (pos, Player::new(format!("{prefix} {pos}"))))
                .collect::<Roster>(),
        };
        Matchup::new(team("team1", 80.0, "Strong"), team("team2", 30.0, "Weak"))
    }

    fn config() -> SimulationConfig {
        SimulationConfig {
            max_retries: 500,
            ..SimulationConfig::default()
        }
    }

    fn simulate(seed: u64) -> Game {
        let model = model();
        let simulator = GameSimulator::new(&model, config());
        let mut rng = Pcg32::seed_from_u64(seed);
        simulator.simulate_game(&matchup(), &mut rng).unwrap()
    }

    #[test]
    fn test_game_has_four_non_empty_quarters() {
        let game = simulate(1);
        assert_eq!(game.pbp.len(), 4);
        for (i, quarter) in game.pbp.iter().enumerate() {
            assert!(quarter.len() > 1);
            let first = &quarter.plays()[0];
            assert!(first.is_boundary());
            assert_eq!(first.description, format!("start of quarter {}", i + 1));
            assert_eq!(first.time, GameClock::QUARTER);
        }
    }

    #[test]
    fn test_scores_equal_sum_of_scoring_plays() {
        let game = simulate(2);
        let mut expected = BTreeMap::new();
        for play in game.plays().filter(|p| p.scoring_play) {
            *expected.entry(play.team.clone().unwrap()).or_insert(0) += u32::from(play.points);
        }
        assert_eq!(game.team_scores, expected);
        assert!(game.team_scores.values().all(|&s| s > 0));
    }

    #[test]
    fn test_scoring_plays_are_makes_with_points() {
        let game = simulate(3);
        for play in game.plays() {
            if play.scoring_play {
                assert!(play.description.contains("makes") || play.description.contains("banks"));
                assert!(play.points <= 3);
            } else {
                assert_eq!(play.points, 0);
            }
            assert!(!play.description.contains('<'), "{}", play.description);
        }
    }

    #[test]
    fn test_clock_runs_down_within_quarters() {
        let game = simulate(4);
        for quarter in &game.pbp {
            let times = quarter.iter().map(|p| p.time).collect::<Vec<_>>();
            assert!(times.windows(2).all(|w| w[0] >= w[1]), "{times:?}");
            if quarter.ended_on_clock() {
                assert_eq!(quarter.plays().last().unwrap().time, GameClock::ZERO);
            }
        }
    }

    #[test]
    fn test_first_possession_belongs_to_first_team() {
        let game = simulate(5);
        for quarter in &game.pbp {
            let first = quarter.iter().find(|p| !p.is_boundary()).unwrap();
            assert_eq!(first.team, Some(TeamId::new("team1")));
            assert_eq!(first.description, "team1 wins the opening tip");
        }
    }

    #[test]
    fn test_possessions_alternate_between_teams() {
        let game = simulate(11);
        let teams = [TeamId::new("team1"), TeamId::new("team2")];
        for quarter in &game.pbp {
            let mut runs = Vec::new();
            for team in quarter.iter().filter_map(|p| p.team.as_ref()) {
                if runs.last() != Some(&team) {
                    runs.push(team);
                }
            }
            assert!(runs.len() > 2);
            for (i, team) in runs.into_iter().enumerate() {
                assert_eq!(team, &teams[i % 2], "run {i}");
            }
        }
    }

    #[test]
    fn test_team_players_in_position_order() {
        let game = simulate(6);
        assert_eq!(game.team_players[&TeamId::new("team2")], [
            "Weak PG", "Weak SG", "Weak SF", "Weak PF", "Weak C"
        ]);
    }

    #[test]
    fn test_same_seed_same_game() {
        assert_eq!(simulate(7), simulate(7));
        assert_ne!(simulate(7), simulate(8));
    }

    #[test]
    fn test_seeded_simulation_is_reproducible() {
        let model = model();
        let simulator = GameSimulator::new(&model, config());
        let seed = GameSeed::from_bytes([7; 16]);
        assert_eq!(
            simulator.simulate_seeded(&matchup(), seed).unwrap(),
            simulator.simulate_seeded(&matchup(), seed).unwrap()
        );
    }

    #[test]
    fn test_classifier_scores_unrecognized_makes() {
        struct Two;
        impl PointClassifier for Two {
            fn classify(&self, _text: &str) -> Result<u8, ClassifyError> {
                Ok(2)
            }
        }

        let model = model();
        let simulator = GameSimulator::with_classifier(&model, config(), Two);
        let mut rng = Pcg32::seed_from_u64(9);
        let game = simulator.simulate_game(&matchup(), &mut rng).unwrap();
        assert!(
            game.plays()
                .filter(|p| p.description.contains("banks it in"))
                .all(|p| p.scoring_play && p.points == 2)
        );
    }

    #[test]
    fn test_empty_model_fails() {
        let model = ModelData::default();
        let simulator = GameSimulator::new(&model, SimulationConfig::default());
        let mut rng = Pcg32::seed_from_u64(10);
        let err = simulator.simulate_game(&matchup(), &mut rng).unwrap_err();
        assert!(matches!(err, SimulationError::Sample(SampleError::EmptyGraph)));
    }
}
