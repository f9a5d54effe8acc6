//! Simulation of play-by-play logs.
//!
//! - [`TransitionGraph`] - Markov model of event transitions, built from a corpus
//! - [`TurnSampler`] - Constrained random walks producing one possession each
//! - [`assign_timestamps`] - Game clock stamps from per-event duration tables
//! - [`render_path`] / [`fill_placeholders`] - Description templates and player names
//! - [`parse_points`] - Point values of scoring plays
//! - [`GameSimulator`] - Quarter and game composition
//!
//! # Game Flow
//!
//! For every possession of a quarter the simulator
//!
//! 1. draws a play count ([`plays_per_turn`]) and an outcome ([`make_or_miss`])
//! 2. samples a path that fits both
//! 3. renders a template for every event on the path
//! 4. runs the clock down along the path
//! 5. emits a [`Play`](crate::Play) per stamped event, scoring the makes
//!
//! and stops when the clock runs out or the possession cap is reached.
//!
//! # Example
//!
//! ```
//! use hoopsim_engine::{
//!     DescriptionTemplates, EventDurations, GameSeed, GameSimulator, Matchup, ModelData, Node,
//!     Player, Roster, SimulationConfig, TeamEntry, TeamId,
//! };
//!
//! let corpus = [
//!     vec![Node::Start, Node::make(), Node::End],
//!     vec![Node::Start, Node::miss(), Node::End],
//! ];
//! let mut durations = EventDurations::default();
//! durations.insert("make", [(0, 0.5), (12, 0.5)]);
//! durations.insert("miss", [(15, 1.0)]);
//! let mut templates = DescriptionTemplates::default();
//! templates.insert("make", ["<Player-PG> makes layup"]);
//! templates.insert("miss", ["<Player-PG> misses jumper"]);
//! let model = ModelData::new(&corpus, durations, templates);
//!
//! let team = |id: &str| TeamEntry {
//!     id: TeamId::new(id),
//!     power: 50.0,
//!     roster: [("PG", Player::new(format!("{id} guard")))].into_iter().collect::<Roster>(),
//! };
//! let matchup = Matchup::new(team("team1"), team("team2"));
//!
//! let config = SimulationConfig {
//!     max_retries: 100,
//!     ..SimulationConfig::default()
//! };
//! let simulator = GameSimulator::new(&model, config);
//! let game = simulator.simulate_seeded(&matchup, GameSeed::from_bytes([1; 16]))?;
//! assert_eq!(game.pbp.len(), 4);
//! # Ok::<(), hoopsim_engine::SimulationError>(())
//! ```

pub use self::{
    config::*, description::*, scoring::*, seed::*, simulator::*, tables::*, timing::*,
    transition_graph::*, turn_sampler::*,
};

mod config;
mod description;
mod scoring;
mod seed;
mod simulator;
mod tables;
mod timing;
mod transition_graph;
mod turn_sampler;
mod weighted;
