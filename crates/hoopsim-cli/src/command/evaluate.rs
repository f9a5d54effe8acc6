use std::{collections::BTreeMap, path::PathBuf};

use hoopsim_stats::metric::discounted_accuracy;
use serde::Deserialize;
use tracing::warn;

use super::bench::BenchInstance;
use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Benchmark JSONL file written by `bench`
    benchmark: PathBuf,
    /// Predictions JSONL file: `{"instance_id": ..., "prediction": {key: points}}` per line
    predictions: PathBuf,
    /// Largest error that still earns partial credit
    #[arg(long, default_value_t = 10)]
    buckets: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct Prediction {
    instance_id: String,
    prediction: BTreeMap<String, i64>,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let instances: Vec<BenchInstance> = util::read_jsonl_file("benchmark", &arg.benchmark)?;
    let predictions: Vec<Prediction> = util::read_jsonl_file("prediction", &arg.predictions)?;
    let predictions = predictions
        .into_iter()
        .map(|p| (p.instance_id, p.prediction))
        .collect::<BTreeMap<_, _>>();

    let (predicted, truth, missing) = pair_values(&instances, &predictions);
    if missing > 0 {
        warn!(missing, "instances without a prediction are scored as 0");
    }

    let accuracy = discounted_accuracy(&predicted, &truth, arg.buckets)
        .ok_or_else(|| anyhow::anyhow!("No values to evaluate"))?;
    let exact = discounted_accuracy(&predicted, &truth, 0)
        .ok_or_else(|| anyhow::anyhow!("No values to evaluate"))?;
    println!("instances: {}, values: {}", instances.len(), truth.len());
    println!("exact match: {exact:.4}");
    println!("discounted accuracy ({} buckets): {accuracy:.4}", arg.buckets);
    Ok(())
}

/// Lines up every truth value with its prediction; a missing prediction
/// counts as 0. Also returns the number of instances with no prediction.
fn pair_values(
    instances: &[BenchInstance],
    predictions: &BTreeMap<String, BTreeMap<String, i64>>,
) -> (Vec<i64>, Vec<i64>, usize) {
    let mut predicted = Vec::new();
    let mut truth = Vec::new();
    let mut missing = 0;
    for instance in instances {
        let prediction = predictions.get(&instance.instance_id);
        if prediction.is_none() {
            missing += 1;
        }
        for (key, &value) in &instance.truth {
            truth.push(value);
            predicted.push(
                prediction
                    .and_then(|p| p.get(key))
                    .copied()
                    .unwrap_or(0),
            );
        }
    }
    (predicted, truth, missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(id: &str, truth: &[(&str, i64)]) -> BenchInstance {
        BenchInstance {
            instance_id: id.to_owned(),
            system_msg: String::new(),
            prompt_msg: String::new(),
            truth: truth.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect(),
        }
    }

    #[test]
    fn test_pair_values() {
        let instances = [
            instance("g_1_1", &[("team1", 20), ("team2", 18)]),
            instance("g_2_1", &[("team1", 25), ("team2", 30)]),
        ];
        let predictions = BTreeMap::from([(
            "g_1_1".to_owned(),
            BTreeMap::from([("team1".to_owned(), 21)]),
        )]);
        let (predicted, truth, missing) = pair_values(&instances, &predictions);
        assert_eq!(truth, [20, 18, 25, 30]);
        assert_eq!(predicted, [21, 0, 0, 0]);
        assert_eq!(missing, 1);
    }
}
