use std::path::PathBuf;

use hoopsim_stats::game_stats::BatchStats;

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct StatsArg {
    /// Directory of simulated game files
    games_dir: PathBuf,
}

pub(crate) fn run(arg: &StatsArg) -> anyhow::Result<()> {
    let games = util::read_games_dir(&arg.games_dir)?;
    eprintln!("Loaded {} games from {}", games.len(), arg.games_dir.display());
    print_stats(games.iter().map(|(_, game)| game))
}

pub(crate) fn print_stats<'a, I>(games: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = &'a hoopsim_engine::Game>,
{
    let stats = BatchStats::new(games).ok_or_else(|| anyhow::anyhow!("No quarters to analyze"))?;
    println!("############# Simulation Statistics #############");
    println!("{stats}");
    Ok(())
}
