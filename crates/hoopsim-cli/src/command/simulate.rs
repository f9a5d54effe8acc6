use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use hoopsim_engine::{
    Density, Game, GameSeed, GameSimulator, ModelData, PointClassifier, SimulationConfig,
};
use hoopsim_roster::{PlayerDataset, build_matchup, select_team_players};
use rand::Rng as _;
use rand_pcg::Pcg32;
use serde::Serialize;
use tracing::info;

use crate::{
    llm::{self, OpenAiClassifier},
    util::{self, MANIFEST_FILE, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Directory holding the event sequences, durations, templates and players
    #[arg(long, default_value = "model_data")]
    model_dir: PathBuf,
    /// Name of the benchmark, used in the default output directory
    #[arg(long, default_value = "bench")]
    bench_name: String,
    /// Number of games to simulate
    #[arg(long, default_value_t = 10)]
    bench_size: usize,
    /// Minimum Overall rating of the strong team's players
    #[arg(long, default_value_t = 85.0)]
    strong_team_strength: f64,
    /// Maximum Overall rating of the weak team's players
    #[arg(long, default_value_t = 75.0)]
    weak_team_strength: f64,
    /// Scoring to non-scoring ratio: 1:2, 1:3, real, 1:4, 1:5 or a density value
    #[arg(long, default_value = "real")]
    ratio: String,
    /// Replace player names with `Player<n>`
    #[arg(long)]
    anonymous: bool,
    /// Master seed as 32 hex digits; random if omitted
    #[arg(long)]
    seed: Option<GameSeed>,
    /// Output directory [default: simulations/<bench_name>_<bench_size>_<ratio>]
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Classify unrecognized scoring plays with an OpenAI chat model
    #[arg(long)]
    llm_fallback: bool,
    /// Chat model used by --llm-fallback
    #[arg(long, default_value = llm::DEFAULT_MODEL)]
    llm_model: String,
    /// API key used by --llm-fallback
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct Manifest<'a> {
    recorded_at: DateTime<Utc>,
    bench_name: &'a str,
    master_seed: GameSeed,
    ratio: &'a str,
    density: Density,
    strong_team_strength: f64,
    weak_team_strength: f64,
    anonymous: bool,
    llm_fallback: bool,
    game_count: usize,
    games: Vec<GameEntry>,
}

#[derive(Debug, Serialize)]
struct GameEntry {
    file: String,
    seed: GameSeed,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let density: Density = arg
        .ratio
        .parse()
        .with_context(|| format!("Invalid ratio: {}", arg.ratio))?;
    let output_dir = arg.output_dir.clone().unwrap_or_else(|| {
        PathBuf::from("simulations").join(format!(
            "{}_{}_{}",
            arg.bench_name, arg.bench_size, arg.ratio
        ))
    });
    util::create_empty_dir(&output_dir)?;

    let model = util::read_model_data(&arg.model_dir)?;
    let players = util::read_player_dataset(&arg.model_dir)?;
    info!(players = players.len(), "loaded player dataset");

    let config = SimulationConfig::with_density(density);
    let master_seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    info!(%master_seed, %density, "simulating {} games", arg.bench_size);

    let (games, entries) = if arg.llm_fallback {
        let api_key = arg
            .openai_api_key
            .clone()
            .context("--llm-fallback requires OPENAI_API_KEY")?;
        let classifier = OpenAiClassifier::new(api_key, arg.llm_model.clone())?;
        simulate_batch(arg, &model, &players, config, classifier, master_seed, &output_dir)?
    } else {
        simulate_batch(
            arg,
            &model,
            &players,
            config,
            hoopsim_engine::NoFallback,
            master_seed,
            &output_dir,
        )?
    };

    let manifest = Manifest {
        recorded_at: Utc::now(),
        bench_name: &arg.bench_name,
        master_seed,
        ratio: &arg.ratio,
        density,
        strong_team_strength: arg.strong_team_strength,
        weak_team_strength: arg.weak_team_strength,
        anonymous: arg.anonymous,
        llm_fallback: arg.llm_fallback,
        game_count: games.len(),
        games: entries,
    };
    Output::save_json(&manifest, Some(output_dir.join(MANIFEST_FILE)))?;
    eprintln!("Game simulation completed: saved to {}", output_dir.display());

    super::stats::print_stats(&games)
}

fn simulate_batch<C>(
    arg: &SimulateArg,
    model: &ModelData,
    players: &PlayerDataset,
    config: SimulationConfig,
    classifier: C,
    master_seed: GameSeed,
    output_dir: &Path,
) -> anyhow::Result<(Vec<Game>, Vec<GameEntry>)>
where
    C: PointClassifier,
{
    let simulator = GameSimulator::with_classifier(model, config, classifier);
    let mut master: Pcg32 = master_seed.rng();

    let mut games = Vec::with_capacity(arg.bench_size);
    let mut entries = Vec::with_capacity(arg.bench_size);
    for game_id in 0..arg.bench_size {
        let seed: GameSeed = master.random();
        let mut rng = seed.rng();
        let selection = select_team_players(
            players,
            arg.strong_team_strength,
            arg.weak_team_strength,
            arg.anonymous,
            &mut rng,
        )
        .with_context(|| format!("Failed to select teams for game {game_id}"))?;
        let matchup = build_matchup(&selection);
        let game = simulator
            .simulate_game(&matchup, &mut rng)
            .with_context(|| format!("Failed to simulate game {game_id}"))?;

        let file = format!("game_{game_id}.json");
        Output::save_json(&game, Some(output_dir.join(&file)))?;
        info!(
            game = game_id,
            %seed,
            team1 = matchup.teams[0].power,
            team2 = matchup.teams[1].power,
            "simulated {}/{}",
            game_id + 1,
            arg.bench_size
        );
        games.push(game);
        entries.push(GameEntry { file, seed });
    }
    Ok((games, entries))
}
