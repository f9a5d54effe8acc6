use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{core::GameClock, engine::TurnSampler};

/// Named scoring-to-non-scoring ratios and the density that produces them.
const NAMED_RATIOS: [(&str, f64); 5] = [
    ("1:2", -0.3),
    ("1:3", 0.0),
    ("real", 0.0),
    ("1:4", 0.5),
    ("1:5", 0.9),
];

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid density `{input}`: expected one of 1:2, 1:3, 1:4, 1:5, real, or a number")]
pub struct ParseDensityError {
    input: String,
}

/// Pace of the simulated game.
///
/// Shifts the mean number of plays per possession to `1.65 * (1 + 2 * density)`.
/// Higher density means longer possessions, so scoring plays make up a smaller
/// share of the log. Parses either a named ratio (`1:2`, `1:3`, `real`, `1:4`,
/// `1:5`) or a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Density(f64);

impl Density {
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Default for Density {
    fn default() -> Self {
        Self(0.5)
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Density {
    type Err = ParseDensityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((_, value)) = NAMED_RATIOS.iter().find(|(name, _)| *name == s) {
            return Ok(Self(*value));
        }
        match s.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Self(value)),
            _ => Err(ParseDensityError {
                input: s.to_owned(),
            }),
        }
    }
}

/// Tunables of a game simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub density: Density,
    /// Number of quarters per game.
    pub quarters: usize,
    pub quarter_length: GameClock,
    /// Upper bound on possessions per quarter.
    pub max_possessions: usize,
    /// Attempts the turn sampler makes before settling for a degraded path.
    pub max_retries: usize,
}

impl SimulationConfig {
    pub const DEFAULT_QUARTERS: usize = 4;
    pub const DEFAULT_MAX_POSSESSIONS: usize = 200;
    pub const DEFAULT_MAX_RETRIES: usize = TurnSampler::DEFAULT_MAX_RETRIES;

    #[must_use]
    pub fn with_density(density: Density) -> Self {
        Self {
            density,
            ..Self::default()
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            density: Density::default(),
            quarters: Self::DEFAULT_QUARTERS,
            quarter_length: GameClock::QUARTER,
            max_possessions: Self::DEFAULT_MAX_POSSESSIONS,
            max_retries: Self::DEFAULT_MAX_RETRIES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_ratios() {
        assert_eq!("1:2".parse::<Density>().unwrap().value(), -0.3);
        assert_eq!("real".parse::<Density>().unwrap().value(), 0.0);
        assert_eq!("1:5".parse::<Density>().unwrap().value(), 0.9);
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!("0.25".parse::<Density>().unwrap().value(), 0.25);
        assert!("1:7".parse::<Density>().is_err());
        assert!("NaN".parse::<Density>().is_err());
    }

    #[test]
    fn test_default_retries_match_sampler() {
        let config = SimulationConfig::default();
        assert_eq!(config.max_retries, TurnSampler::DEFAULT_MAX_RETRIES);
        assert_eq!(config.quarters, 4);
    }
}
