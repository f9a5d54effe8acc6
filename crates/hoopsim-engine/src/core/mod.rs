//! Core data types of the play-by-play model.
//!
//! - [`Event`], [`Node`] and [`Path`] describe possessions as event sequences
//! - [`GameClock`] is the countdown clock used for timestamps
//! - [`Play`], [`Quarter`] and [`Game`] form the generated log
//! - [`Roster`], [`TeamEntry`] and [`Matchup`] describe the teams on the floor

pub use self::{clock::*, event::*, play::*, roster::*};

mod clock;
mod event;
mod play;
mod roster;
