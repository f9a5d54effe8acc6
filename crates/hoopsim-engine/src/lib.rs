//! Markov-chain simulation of basketball play-by-play logs.
//!
//! The crate is split into [`core`], the plain data model (events, paths,
//! plays, quarters, games, rosters), and [`engine`], which turns a corpus of
//! historical possessions into simulated games.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SampleError {
    #[display("transition graph is empty")]
    EmptyGraph,
    #[display("transition graph has no edges out of `{node}`")]
    MissingNode { node: Node },
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SimulationError {
    #[display("failed to sample a possession")]
    Sample(SampleError),
}
