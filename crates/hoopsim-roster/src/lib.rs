//! Team selection over a static player dataset.
//!
//! A game is played between a *strong* and a *weak* team drawn from the same
//! dataset of rated players:
//!
//! 1. [`select_team_players`] signs ten players per team, one starter per
//!    position first, then a bench
//! 2. [`team_power`] turns a team's scoring ratings into the 0–100 power the
//!    engine uses to bias makes and misses
//! 3. [`pick_starting_five`] fills the five floor positions
//! 4. [`build_matchup`] assembles both teams into an engine
//!    [`Matchup`](hoopsim_engine::Matchup), strong team as `team1`
//!
//! # Example
//!
//! ```
//! use hoopsim_roster::{PlayerDataset, build_matchup, select_team_players};
//! use rand::SeedableRng as _;
//!
//! let dataset: PlayerDataset = (0..40)
//!     .map(|i| {
//!         let position = ["PG", "SG", "SF", "PF", "C"][i % 5];
//!         let overall = if i < 20 { 90.0 } else { 60.0 };
//!         hoopsim_roster::PlayerRecord::new(format!("Player {i}"), position, overall, overall, overall)
//!     })
//!     .collect();
//! let mut rng = rand_pcg::Pcg32::seed_from_u64(0);
//! let selection = select_team_players(&dataset, 85.0, 70.0, false, &mut rng)?;
//! let matchup = build_matchup(&selection);
//! assert_eq!(matchup.teams[0].roster.len(), 5);
//! # Ok::<(), hoopsim_roster::RosterError>(())
//! ```

pub use self::{dataset::*, profile::*, selection::*};

mod dataset;
mod profile;
mod selection;

/// Which side of the matchup a player is signed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Side {
    #[display("strong")]
    Strong,
    #[display("weak")]
    Weak,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RosterError {
    #[display("no {side} team candidate left for position {position}")]
    NoCandidates { side: Side, position: &'static str },
}
