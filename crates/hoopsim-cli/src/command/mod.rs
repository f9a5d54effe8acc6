use clap::{Parser, Subcommand};

use self::{bench::BenchArg, evaluate::EvaluateArg, simulate::SimulateArg, stats::StatsArg};

mod bench;
mod evaluate;
mod simulate;
mod stats;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Simulate a batch of games and write them as JSON files
    Simulate(#[clap(flatten)] SimulateArg),
    /// Print statistics of a directory of simulated games
    Stats(#[clap(flatten)] StatsArg),
    /// Build a JSONL benchmark from a directory of simulated games
    Bench(#[clap(flatten)] BenchArg),
    /// Score predictions against a benchmark with discounted accuracy
    Evaluate(#[clap(flatten)] EvaluateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::Stats(arg) => stats::run(&arg)?,
        Mode::Bench(arg) => bench::run(&arg)?,
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
    }
    Ok(())
}
