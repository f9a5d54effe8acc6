use std::{collections::BTreeMap, fmt::Write as _, path::PathBuf};

use anyhow::Context as _;
use hoopsim_engine::{Game, Quarter, TeamId};
use serde::{Deserialize, Serialize};

use crate::util::{self, Output};

const SYS_PROMPT: &str = "You are a helpful assistant tasked with analyzing sports games. You have been given a play-by-play breakdown of an NBA basketball game between two teams.\n
The \"Time\" column shows the exact time on the game clock when each play took place. The game clock counts down, so this column displays times in a descending order.\n
The \"Play\" column describes the action that happened at the respective times. It provides details of specific plays, movements, and outcomes on the court.\n
Team players are listed in two rows, each row representing one of the two basketball teams involved in the game.
";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BenchArg {
    /// Directory of simulated game files
    games_dir: PathBuf,
    /// Name of the benchmark file
    #[arg(long)]
    bench_name: String,
    /// Split each quarter into segments of this many plays
    #[arg(long)]
    steps: Option<usize>,
    /// Ask for per-player points, one instance per team
    #[arg(long)]
    player_stats: bool,
    /// Directory the benchmark file is written to
    #[arg(long, default_value = "benchmarks")]
    output_dir: PathBuf,
}

/// One benchmark question with its expected answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct BenchInstance {
    pub instance_id: String,
    pub system_msg: String,
    pub prompt_msg: String,
    pub truth: BTreeMap<String, i64>,
}

pub(crate) fn run(arg: &BenchArg) -> anyhow::Result<()> {
    let mut bench_name = arg.bench_name.clone();
    if let Some(steps) = arg.steps {
        anyhow::ensure!(steps > 0, "--steps must be positive");
        write!(bench_name, "-step_{steps}")?;
    }
    if arg.player_stats {
        bench_name.push_str("-player_stats");
    }
    let save_file = arg.output_dir.join(format!("{bench_name}.jsonl"));
    std::fs::create_dir_all(&arg.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            arg.output_dir.display()
        )
    })?;
    // Opened first so that an existing benchmark is never overwritten.
    let mut output = Output::create_new(save_file)?;

    let games = util::read_games_dir(&arg.games_dir)?;
    let instances = games
        .iter()
        .flat_map(|(name, game)| build_instances(name, game, arg.steps, arg.player_stats))
        .collect::<Vec<_>>();
    eprintln!(
        "Loaded {} instances from {}",
        instances.len(),
        arg.games_dir.display()
    );
    output.write_jsonl(&instances)?;
    eprintln!("Saved to {}", output.display_path());
    Ok(())
}

fn build_instances(
    game_name: &str,
    game: &Game,
    steps: Option<usize>,
    player_stats: bool,
) -> Vec<BenchInstance> {
    let affiliations = team_affiliations(&game.team_players);
    let prompts = if player_stats {
        game.team_players
            .iter()
            .map(|(team, players)| {
                let prompt = task_prompt("player", players.iter().map(String::as_str), &affiliations);
                (Some(team), prompt)
            })
            .collect::<Vec<_>>()
    } else {
        let prompt = task_prompt(
            "team",
            game.team_players.keys().map(TeamId::as_str),
            &affiliations,
        );
        vec![(None, prompt)]
    };

    let mut instances = Vec::new();
    for (step_id, description, truth) in segments(&game.pbp, steps) {
        for (team, prompt) in &prompts {
            let instance_id = match team {
                Some(team) => format!("{game_name}_{team}_{step_id}"),
                None => format!("{game_name}_{step_id}"),
            };
            instances.push(BenchInstance {
                instance_id,
                system_msg: SYS_PROMPT.to_owned(),
                prompt_msg: format!("{prompt}{description}"),
                truth: truth.clone(),
            });
        }
    }
    instances
}

fn team_affiliations(team_players: &BTreeMap<TeamId, Vec<String>>) -> String {
    team_players
        .iter()
        .map(|(team, players)| format!("\n{team}: {}", players.join(", ")))
        .collect()
}

fn task_prompt<'a, I>(subject: &str, keys: I, affiliations: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    format!(
        "Analyze the team-player affiliations and play-by-play descriptions below to determine the total points scored by each {subject}.\n\
         Please explain your reasoning step by step and provide the final results in the following JSON format.\n\
         {}\n\n#Team-Player Affiliations:{affiliations}\n\n#Play-by-Play Descriptions:\nTime\tPlay\n",
        zero_scores_json(keys)
    )
}

/// `{"a": 0, "b": 0}` with the keys in order, duplicates dropped.
fn zero_scores_json<'a, I>(keys: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = Vec::new();
    let mut entries = Vec::new();
    for key in keys {
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        let quoted = serde_json::Value::from(key).to_string();
        entries.push(format!("{quoted}: 0"));
    }
    format!("{{{}}}", entries.join(", "))
}

/// Splits the quarters into prompt segments.
///
/// Yields `(<quarter>_<segment>, log, truth)` with 1-based ids. The truth
/// counts the points scored within the segment, starting from zero for the
/// (at most two) teams that score in the first quarter.
fn segments(
    quarters: &[Quarter],
    steps: Option<usize>,
) -> Vec<(String, String, BTreeMap<String, i64>)> {
    let mut initial = BTreeMap::new();
    if let Some(first) = quarters.first() {
        for team in first
            .iter()
            .filter(|p| p.scoring_play)
            .filter_map(|p| p.team.as_ref())
        {
            initial.entry(team.to_string()).or_insert(0);
            if initial.len() == 2 {
                break;
            }
        }
    }

    let mut segments = Vec::new();
    for (q, quarter) in quarters.iter().enumerate() {
        let plays = quarter.plays();
        let size = steps.unwrap_or(plays.len()).max(1);
        for (s, segment) in plays.chunks(size).enumerate() {
            let mut log = String::new();
            let mut truth = initial.clone();
            for play in segment {
                log.push_str(&format!("{}\t{}\n", play.time, play.description));
                if let (true, Some(team)) = (play.scoring_play, &play.team) {
                    *truth.entry(team.to_string()).or_insert(0) += i64::from(play.points);
                }
            }
            segments.push((format!("{}_{}", q + 1, s + 1), log, truth));
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use hoopsim_engine::{GameClock, Play};

    use super::*;

    fn game() -> Game {
        let team1 = TeamId::new("team1");
        let team2 = TeamId::new("team2");
        let quarter = |n| -> Quarter {
            [
                Play::quarter_start(n, GameClock::QUARTER),
                Play::scored(team2.clone(), GameClock::from_seconds(700), "B makes layup".to_owned(), 2),
                Play::unscored(team1.clone(), GameClock::from_seconds(690), "A misses jumper".to_owned()),
                Play::scored(team1.clone(), GameClock::from_seconds(680), "A makes 25-foot three".to_owned(), 3),
            ]
            .into_iter()
            .collect()
        };
        let players = BTreeMap::from([
            (team1.clone(), vec!["Ann".to_owned(), "Al".to_owned()]),
            (team2.clone(), vec!["Bo".to_owned(), "Bea".to_owned()]),
        ]);
        Game::new(vec![quarter(1), quarter(2)], players)
    }

    #[test]
    fn test_team_instances_per_quarter() {
        let instances = build_instances("game_0", &game(), None, false);
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].instance_id, "game_0_1_1");
        assert_eq!(instances[1].instance_id, "game_0_2_1");
        let truth = &instances[0].truth;
        assert_eq!(truth["team1"], 3);
        assert_eq!(truth["team2"], 2);

        let prompt = &instances[0].prompt_msg;
        assert!(prompt.contains("{\"team1\": 0, \"team2\": 0}"));
        assert!(prompt.contains("#Team-Player Affiliations:\nteam1: Ann, Al\nteam2: Bo, Bea\n"));
        assert!(prompt.ends_with("Time\tPlay\n12:00\tstart of quarter 1\n11:40\tB makes layup\n11:30\tA misses jumper\n11:20\tA makes 25-foot three\n"));
    }

    #[test]
    fn test_step_segments() {
        let instances = build_instances("game_3", &game(), Some(3), false);
        let ids = instances
            .iter()
            .map(|i| i.instance_id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["game_3_1_1", "game_3_1_2", "game_3_2_1", "game_3_2_2"]);
        assert_eq!(instances[1].truth["team1"], 3);
        assert_eq!(instances[1].truth["team2"], 0);
    }

    #[test]
    fn test_player_instances_per_team() {
        let instances = build_instances("game_1", &game(), None, true);
        assert_eq!(instances.len(), 4);
        assert_eq!(instances[0].instance_id, "game_1_team1_1_1");
        assert_eq!(instances[1].instance_id, "game_1_team2_1_1");
        assert!(instances[0].prompt_msg.contains("{\"Ann\": 0, \"Al\": 0}"));
        assert!(instances[0].prompt_msg.contains("points scored by each player"));
    }

    #[test]
    fn test_zero_scores_json_escapes_and_dedups() {
        assert_eq!(zero_scores_json(["a\"b", "c", "c"]), "{\"a\\\"b\": 0, \"c\": 0}");
        assert_eq!(zero_scores_json(Vec::<&str>::new()), "{}");
    }
}
