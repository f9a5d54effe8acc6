//! Possession sampling: random walks over the transition graph.
//!
//! A possession is generated in three steps:
//!
//! 1. [`plays_per_turn`] draws a target play count from a discretized Gaussian
//!    whose mean follows the configured [`Density`]
//! 2. [`make_or_miss`] draws the possession's outcome from the offense's power
//! 3. [`TurnSampler::sample`] walks the graph from `start` (or `vs`) to `end`,
//!    retrying until a path fits the outcome and play count
//!
//! # Walk
//!
//! Each step picks a successor by its transition probability. Once two "make"
//! events are on the path the "make" edge is disabled for the rest of the walk:
//! two makes model a two-shot free-throw trip, never three. The walk stops at
//! `end`, at a node with no usable successor, or after a fixed step bound.
//!
//! # Acceptance
//!
//! The make target (1 with probability 0.75, 2 with probability 0.25) is drawn
//! once per [`TurnSampler::sample`] call. Each attempt is then judged:
//!
//! - `Miss`: must contain a "miss" and no "make", then must match the play count
//! - `Make`: must contain exactly the target number of makes, then must match
//!   the play count
//! - no outcome: must match the play count
//!
//! The play count of a quarter-opening path excludes its `vs` marker.
//!
//! Every attempt counts against the retry cap. When the cap is reached the last
//! walk is returned as [`Sampled::Degraded`]; callers use it as is.

use rand::Rng;
use tracing::debug;

use crate::{
    SampleError,
    core::{Node, Path},
    engine::{Density, TransitionGraph, weighted::weighted_index},
};

/// Hard bound on walk length; far above any realistic possession.
const MAX_STEPS: usize = 256;
/// Makes allowed on one path (a two-shot free-throw trip).
const MAX_MAKES: usize = 2;
const SINGLE_MAKE_PROBABILITY: f64 = 0.75;

/// Play counts are drawn from `1..=MAX_PLAYS_PER_TURN`.
pub const MAX_PLAYS_PER_TURN: usize = 10;
const PLAYS_MEAN: f64 = 1.65;
const PLAYS_STD_DEV: f64 = 0.92;

/// Field-goal probability at power 0 and at power 100.
const MIN_MAKE_PROBABILITY: f64 = 0.36;
const MAX_MAKE_PROBABILITY: f64 = 0.58;

/// The key event a possession is steered towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum Outcome {
    #[display("make")]
    Make,
    #[display("miss")]
    Miss,
}

/// Result of a constrained sample.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum Sampled {
    /// The path satisfies the requested outcome and play count.
    Accepted(Path),
    /// Retries ran out; the last walk, which may violate the constraints.
    Degraded(Path),
}

impl Sampled {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Accepted(path) | Self::Degraded(path) => path,
        }
    }

    #[must_use]
    pub fn into_path(self) -> Path {
        match self {
            Self::Accepted(path) | Self::Degraded(path) => path,
        }
    }
}

/// Samples possession paths from a [`TransitionGraph`].
#[derive(Debug, Clone, Copy)]
pub struct TurnSampler<'a> {
    graph: &'a TransitionGraph,
    max_retries: usize,
}

impl<'a> TurnSampler<'a> {
    pub const DEFAULT_MAX_RETRIES: usize = 10_000;

    #[must_use]
    pub fn new(graph: &'a TransitionGraph) -> Self {
        Self {
            graph,
            max_retries: Self::DEFAULT_MAX_RETRIES,
        }
    }

    /// Sets the number of attempts per [`Self::sample`] call (at least one).
    #[must_use]
    pub fn with_max_retries(self, max_retries: usize) -> Self {
        Self {
            max_retries: max_retries.max(1),
            ..self
        }
    }

    /// Walks the graph once, without any acceptance check.
    ///
    /// A quarter-opening walk starts at `vs` and keeps it as the first node; if
    /// the corpus never opened a quarter, the walk starts at `start` instead.
    pub fn walk<R>(&self, is_quarter_start: bool, rng: &mut R) -> Result<Path, SampleError>
    where
        R: Rng + ?Sized,
    {
        if self.graph.is_empty() {
            return Err(SampleError::EmptyGraph);
        }

        let mut path = Path::new();
        let mut current = Node::Start;
        if is_quarter_start {
            if self.graph.has_successors(&Node::Vs) {
                path.push(Node::Vs);
                current = Node::Vs;
            } else {
                debug!("transition graph has no `vs` node; opening the quarter from `start`");
            }
        }
        if !self.graph.has_successors(&current) {
            return Err(SampleError::MissingNode { node: current });
        }

        let mut makes = 0;
        for _ in 0..MAX_STEPS {
            let successors = self.graph.successors(&current);
            let weights = successors.iter().map(|t| {
                if makes >= MAX_MAKES && t.target.is_make() {
                    0.0
                } else {
                    t.probability
                }
            });
            let Some(index) = weighted_index(weights, rng) else {
                break;
            };
            let next = &successors[index].target;
            if next.is_end() {
                break;
            }
            if next.is_make() {
                makes += 1;
            }
            path.push(next.clone());
            current = next.clone();
        }
        Ok(path)
    }

    /// Samples a path for a possession of `target_length` plays ending in `outcome`.
    ///
    /// Fails only if the graph cannot be walked at all; unsatisfiable
    /// constraints produce [`Sampled::Degraded`].
    pub fn sample<R>(
        &self,
        target_length: usize,
        outcome: Option<Outcome>,
        is_quarter_start: bool,
        rng: &mut R,
    ) -> Result<Sampled, SampleError>
    where
        R: Rng + ?Sized,
    {
        let target_makes = if rng.random_bool(SINGLE_MAKE_PROBABILITY) {
            1
        } else {
            2
        };

        let mut last = Path::new();
        for _ in 0..self.max_retries {
            let path = self.walk(is_quarter_start, rng)?;
            if accepts(&path, target_length, outcome, target_makes) {
                return Ok(Sampled::Accepted(path));
            }
            last = path;
        }
        debug!(
            target_length,
            ?outcome,
            retries = self.max_retries,
            "retries exhausted; using the last sampled path"
        );
        Ok(Sampled::Degraded(last))
    }
}

fn accepts(path: &Path, target_length: usize, outcome: Option<Outcome>, target_makes: usize) -> bool {
    match outcome {
        Some(Outcome::Miss) => {
            if !path.contains_miss() || path.contains_make() {
                return false;
            }
        }
        Some(Outcome::Make) => {
            if path.make_count() != target_makes {
                return false;
            }
        }
        None => {}
    }
    path.play_count() == target_length
}

/// Draws the number of plays in a possession.
///
/// Each count `n` in `1..=10` is weighted by the Gaussian density at `n` with
/// mean `1.65 * (1 + 2 * density)` and standard deviation 0.92.
#[expect(clippy::cast_precision_loss)]
pub fn plays_per_turn<R>(density: Density, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    let mean = PLAYS_MEAN * (1.0 + 2.0 * density.value());
    let weights = (1..=MAX_PLAYS_PER_TURN).map(|n| gaussian_pdf(n as f64, mean, PLAYS_STD_DEV));
    weighted_index(weights, rng).map_or_else(|| nearest_play_count(mean), |index| index + 1)
}

/// Fallback when the mean is so far out that every density underflows.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn nearest_play_count(mean: f64) -> usize {
    if mean.is_nan() {
        return 1;
    }
    mean.round().clamp(1.0, MAX_PLAYS_PER_TURN as f64) as usize
}

fn gaussian_pdf(x: f64, mean: f64, std_dev: f64) -> f64 {
    let z = (x - mean) / std_dev;
    (-0.5 * z * z).exp() / (std_dev * (2.0 * std::f64::consts::PI).sqrt())
}

/// Draws whether a possession of a team with `power` (0–100) ends in a make.
///
/// The make probability scales linearly from 0.36 at power 0 to 0.58 at
/// power 100, spanning league field-goal percentages.
pub fn make_or_miss<R>(power: f64, rng: &mut R) -> Outcome
where
    R: Rng + ?Sized,
{
    let probability =
        power / 100.0 * (MAX_MAKE_PROBABILITY - MIN_MAKE_PROBABILITY) + MIN_MAKE_PROBABILITY;
    let probability = if probability.is_nan() {
        MIN_MAKE_PROBABILITY
    } else {
        probability.clamp(0.0, 1.0)
    };
    if rng.random_bool(probability) {
        Outcome::Make
    } else {
        Outcome::Miss
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn corpus(paths: &[&[&str]]) -> TransitionGraph {
        let paths = paths
            .iter()
            .map(|p| p.iter().copied().map(Node::from_label).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        TransitionGraph::build(&paths)
    }

    fn fixture_graph() -> TransitionGraph {
        corpus(&[
            &["start", "miss", "defensive rebound", "end"],
            &["start", "miss", "offensive rebound", "make", "end"],
            &["start", "make", "end"],
            &["start", "shooting foul", "make", "make", "end"],
            &["start", "shooting foul", "make", "miss", "defensive rebound", "end"],
            &["start", "turnover", "end"],
            &["start", "bad pass turnover", "steal", "end"],
            &["vs", "jump ball", "miss", "defensive rebound", "end"],
            &["vs", "jump ball", "make", "end"],
        ])
    }

    #[test]
    fn test_miss_paths_never_contain_make() {
        let graph = fixture_graph();
        let sampler = TurnSampler::new(&graph);
        let mut rng = Pcg32::seed_from_u64(11);
        for length in 1..=4 {
            for _ in 0..50 {
                let sampled = sampler
                    .sample(length, Some(Outcome::Miss), false, &mut rng)
                    .unwrap();
                if sampled.is_accepted() {
                    let path = sampled.path();
                    assert!(path.contains_miss());
                    assert!(!path.contains_make());
                    assert_eq!(path.play_count(), length);
                }
            }
        }
    }

    #[test]
    fn test_accepted_make_paths_have_one_or_two_makes() {
        let graph = fixture_graph();
        let sampler = TurnSampler::new(&graph);
        let mut rng = Pcg32::seed_from_u64(12);
        let mut accepted = 0;
        for length in 1..=5 {
            for _ in 0..50 {
                let sampled = sampler
                    .sample(length, Some(Outcome::Make), false, &mut rng)
                    .unwrap();
                let path = sampled.path();
                assert!(path.longest_make_run() <= 2);
                if sampled.is_accepted() {
                    accepted += 1;
                    assert!((1..=2).contains(&path.make_count()), "{path:?}");
                }
            }
        }
        assert!(accepted > 0);
    }

    #[test]
    fn test_make_paths_must_also_match_length() {
        // Length 3 is only reachable with two makes.
        let graph = corpus(&[
            &["start", "make", "end"],
            &["start", "shooting foul", "make", "make", "end"],
        ]);
        let sampler = TurnSampler::new(&graph).with_max_retries(200);
        let mut rng = Pcg32::seed_from_u64(23);
        let mut degraded = 0;
        for _ in 0..400 {
            let sampled = sampler
                .sample(3, Some(Outcome::Make), false, &mut rng)
                .unwrap();
            match sampled {
                Sampled::Accepted(path) => {
                    assert_eq!(path.play_count(), 3, "{path:?}");
                    assert_eq!(path.make_count(), 2, "{path:?}");
                }
                Sampled::Degraded(_) => degraded += 1,
            }
        }
        // target of one make (p = 0.75) can never be met
        assert!((220..=380).contains(&degraded), "{degraded}");
    }

    #[test]
    fn test_walk_caps_makes_at_two() {
        // "make" loops back to itself, so only the cap stops a third make.
        let graph = corpus(&[
            &["start", "make", "make", "make", "make", "end"],
            &["start", "make", "end"],
        ]);
        let sampler = TurnSampler::new(&graph);
        let mut rng = Pcg32::seed_from_u64(13);
        for _ in 0..200 {
            let path = sampler.walk(false, &mut rng).unwrap();
            assert!(path.make_count() <= 2, "{path:?}");
        }
    }

    #[test]
    fn test_quarter_start_keeps_vs_marker() {
        let graph = fixture_graph();
        let sampler = TurnSampler::new(&graph);
        let mut rng = Pcg32::seed_from_u64(14);
        let sampled = sampler.sample(2, None, true, &mut rng).unwrap();
        assert!(sampled.is_accepted());
        let path = sampled.path();
        assert!(path.opens_quarter());
        assert_eq!(path.play_count(), 2);
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_quarter_start_without_vs_falls_back_to_start() {
        let graph = corpus(&[&["start", "turnover", "end"]]);
        let sampler = TurnSampler::new(&graph);
        let mut rng = Pcg32::seed_from_u64(15);
        let path = sampler.walk(true, &mut rng).unwrap();
        assert_eq!(path.nodes(), [Node::from_label("turnover")]);
    }

    #[test]
    fn test_unsatisfiable_constraints_degrade() {
        let graph = corpus(&[&["start", "turnover", "end"]]);
        let sampler = TurnSampler::new(&graph).with_max_retries(25);
        let mut rng = Pcg32::seed_from_u64(16);
        let sampled = sampler
            .sample(3, Some(Outcome::Make), false, &mut rng)
            .unwrap();
        assert!(sampled.is_degraded());
        assert_eq!(sampled.into_path().nodes(), [Node::from_label("turnover")]);
    }

    #[test]
    fn test_empty_graph_is_a_configuration_error() {
        let graph = TransitionGraph::default();
        let sampler = TurnSampler::new(&graph);
        let mut rng = Pcg32::seed_from_u64(17);
        assert_eq!(
            sampler.sample(1, None, false, &mut rng),
            Err(SampleError::EmptyGraph)
        );
    }

    #[test]
    fn test_missing_start_node_is_a_configuration_error() {
        let graph = corpus(&[&["vs", "jump ball", "end"]]);
        let sampler = TurnSampler::new(&graph);
        let mut rng = Pcg32::seed_from_u64(18);
        assert_eq!(
            sampler.walk(false, &mut rng),
            Err(SampleError::MissingNode { node: Node::Start })
        );
    }

    #[test]
    fn test_same_seed_same_path() {
        let graph = fixture_graph();
        let sampler = TurnSampler::new(&graph);
        let mut a = Pcg32::seed_from_u64(19);
        let mut b = Pcg32::seed_from_u64(19);
        for _ in 0..20 {
            assert_eq!(
                sampler.sample(2, Some(Outcome::Make), false, &mut a),
                sampler.sample(2, Some(Outcome::Make), false, &mut b)
            );
        }
    }

    #[test]
    fn test_plays_per_turn_range_and_density() {
        let mut rng = Pcg32::seed_from_u64(20);
        let mean = |density: f64, rng: &mut Pcg32| {
            let total: usize = (0..2000)
                .map(|_| plays_per_turn(Density::new(density), rng))
                .inspect(|n| assert!((1..=MAX_PLAYS_PER_TURN).contains(n)))
                .sum();
            total as f64 / 2000.0
        };
        let sparse = mean(-0.3, &mut rng);
        let dense = mean(0.9, &mut rng);
        assert!(sparse < dense, "{sparse} >= {dense}");
    }

    #[test]
    fn test_plays_per_turn_extreme_density() {
        let mut rng = Pcg32::seed_from_u64(21);
        assert_eq!(plays_per_turn(Density::new(1_000.0), &mut rng), 10);
        assert_eq!(plays_per_turn(Density::new(-1_000.0), &mut rng), 1);
    }

    #[test]
    fn test_make_or_miss_follows_power() {
        let mut rng = Pcg32::seed_from_u64(22);
        let makes = |power: f64, rng: &mut Pcg32| {
            (0..2000)
                .filter(|_| make_or_miss(power, rng).is_make())
                .count()
        };
        let weak = makes(0.0, &mut rng);
        let strong = makes(100.0, &mut rng);
        assert!(weak < strong);
        assert!((600..=850).contains(&weak), "{weak}");
        assert!((1050..=1300).contains(&strong), "{strong}");
    }
}
