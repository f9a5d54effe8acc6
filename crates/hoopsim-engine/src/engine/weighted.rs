use rand::{
    Rng,
    distr::{Distribution as _, weighted::WeightedIndex},
};

/// Draws an index with probability proportional to `weights`.
///
/// Returns `None` when nothing can be drawn: no weights, all weights zero, or a
/// negative or NaN weight.
pub(crate) fn weighted_index<I, R>(weights: I, rng: &mut R) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
    R: Rng + ?Sized,
{
    let dist = WeightedIndex::new(weights).ok()?;
    Some(dist.sample(rng))
}
