//! Discounted accuracy (DCA) of numeric predictions.
//!
//! Exact answers score 1. An answer off by `d` scores `1 - d / (buckets + 1)`
//! while `d <= buckets`, and 0 beyond. The accuracy of a prediction set is the
//! mean score over all prediction/target pairs.

/// Discounted accuracy of `predictions` against `targets`.
///
/// Pairs are formed in order; extra elements of the longer slice are ignored.
/// Returns `None` when there is no pair to score.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn discounted_accuracy(predictions: &[i64], targets: &[i64], buckets: u32) -> Option<f64> {
    let pairs = predictions.len().min(targets.len());
    if pairs == 0 {
        return None;
    }

    let width = f64::from(buckets) + 1.0;
    let total = predictions
        .iter()
        .zip(targets)
        .map(|(prediction, target)| prediction.abs_diff(*target))
        .filter(|&error| error <= u64::from(buckets))
        .map(|error| 1.0 - error as f64 / width)
        .sum::<f64>();
    let accuracy = total / pairs as f64;
    Some(accuracy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_predictions_score_one() {
        assert_eq!(discounted_accuracy(&[3, 7, 12], &[3, 7, 12], 5), Some(1.0));
    }

    #[test]
    fn test_discount_per_bucket() {
        // errors 0, 2, 4 with buckets 0..=4: weights 1, 0.6, 0.2
        let accuracy = discounted_accuracy(&[5, 7, 1], &[5, 5, 5], 4).unwrap();
        assert!((accuracy - 1.8 / 3.0).abs() < 1e-12, "{accuracy}");
    }

    #[test]
    fn test_errors_beyond_last_bucket_score_zero() {
        assert_eq!(discounted_accuracy(&[0, 100], &[50, -100], 3), Some(0.0));
    }

    #[test]
    fn test_zero_buckets_is_exact_match_rate() {
        assert_eq!(discounted_accuracy(&[1, 2, 3, 4], &[1, 0, 3, 0], 0), Some(0.5));
    }

    #[test]
    fn test_huge_bucket_count() {
        let accuracy = discounted_accuracy(&[0, 10], &[1, 10], u32::MAX).unwrap();
        assert!(accuracy > 0.999_999 && accuracy < 1.0, "{accuracy}");
    }

    #[test]
    fn test_empty() {
        assert_eq!(discounted_accuracy(&[], &[], 3), None);
        assert_eq!(discounted_accuracy(&[1], &[], 3), None);
    }
}
