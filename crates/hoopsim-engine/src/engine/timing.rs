use std::collections::BTreeMap;

use rand::Rng;
use tracing::warn;

use crate::{
    core::{GameClock, Node, Path},
    engine::{EventDurations, weighted::weighted_index},
};

/// Events that may legitimately take zero seconds.
const INSTANT_EVENTS: [&str; 2] = ["make", "defensive goaltending violation"];

/// Clock values stamped on a path, one per node, in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    pub stamps: Vec<GameClock>,
    /// Set when the quarter clock ran out before the end of the path.
    pub exhausted: bool,
}

impl Timeline {
    /// The clock after the last stamped event.
    #[must_use]
    pub fn last(&self) -> Option<GameClock> {
        self.stamps.last().copied()
    }
}

/// Runs the game clock down along `path`, starting at `start`.
///
/// Every node consumes a duration drawn from its empirical distribution.
/// When the clock would go below zero the walk stops there: the returned
/// timeline holds the stamps so far and is marked exhausted, so it may be
/// shorter than the path.
pub fn assign_timestamps<R>(
    durations: &EventDurations,
    path: &Path,
    start: GameClock,
    rng: &mut R,
) -> Timeline
where
    R: Rng + ?Sized,
{
    let mut clock = start;
    let mut timeline = Timeline::default();
    for node in path {
        let Some(distribution) = durations.get(node.label()) else {
            warn!(event = %node, "no duration distribution; keeping the clock");
            timeline.stamps.push(clock);
            continue;
        };
        let elapsed = draw_duration(node, distribution, rng);
        let Some(next) = clock.checked_sub(elapsed) else {
            timeline.exhausted = true;
            break;
        };
        clock = next;
        timeline.stamps.push(clock);
    }
    timeline
}

fn draw_duration<R>(node: &Node, distribution: &BTreeMap<u32, f64>, rng: &mut R) -> u32
where
    R: Rng + ?Sized,
{
    let allow_zero = INSTANT_EVENTS.contains(&node.label());
    let options = distribution
        .iter()
        .filter(|(seconds, _)| allow_zero || **seconds != 0)
        .collect::<Vec<_>>();
    weighted_index(options.iter().map(|(_, p)| **p), rng).map_or(0, |index| *options[index].0)
}
