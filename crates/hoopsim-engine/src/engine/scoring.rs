//! Point values of scoring plays.
//!
//! [`parse_points`] reads the point value of a "make" from its description
//! template. The rules are tried in order and the first match wins:
//!
//! | rule | points |
//! |---|---|
//! | mentions "free throw" | 1 |
//! | first number is a shot distance below 23 ft (or exactly 23 without "three") | 2 |
//! | first number is any other distance | 3 |
//! | mentions "two" / "three" | 2 / 3 |
//! | a two-point shot type (layup, dunk, tip, jump shot, jumper, hook shot) | 2 |
//! | otherwise: ask the [`PointClassifier`] | 0–3 |
//!
//! The 23-foot threshold approximates the three-point line.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

/// Distances below this are two-point attempts.
const THREE_POINT_DISTANCE: u64 = 23;
const TWO_POINT_SHOTS: [&str; 6] = ["layup", "dunk", "tip", "jump shot", "jumper", "hook shot"];

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("number pattern should compile"));

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("point classification failed: {message}")]
pub struct ClassifyError {
    message: String,
}

impl ClassifyError {
    #[must_use]
    pub fn new<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
        }
    }
}

/// Fallback for descriptions the rules cannot classify.
pub trait PointClassifier {
    /// Returns the point value (0–3) of a scoring play described by `text`.
    fn classify(&self, text: &str) -> Result<u8, ClassifyError>;
}

impl<C> PointClassifier for &C
where
    C: PointClassifier + ?Sized,
{
    fn classify(&self, text: &str) -> Result<u8, ClassifyError> {
        (**self).classify(text)
    }
}

/// Classifier that scores every unrecognized play as 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFallback;

impl PointClassifier for NoFallback {
    fn classify(&self, _text: &str) -> Result<u8, ClassifyError> {
        Ok(0)
    }
}

/// Point value of a "make" described by `description`.
///
/// # Example
///
/// ```
/// use hoopsim_engine::{NoFallback, parse_points};
///
/// assert_eq!(parse_points("<Player-SF> makes 25-foot three point jumper", &NoFallback), 3);
/// assert_eq!(parse_points("<Player-C> makes free throw 1 of 2", &NoFallback), 1);
/// assert_eq!(parse_points("<Player-PG> makes 18-foot jump shot", &NoFallback), 2);
/// ```
pub fn parse_points<C>(description: &str, fallback: &C) -> u8
where
    C: PointClassifier + ?Sized,
{
    let text = description.to_lowercase();

    if text.contains("free throw") {
        return 1;
    }
    if let Some(distance) = first_number(&text) {
        return match distance {
            None => 3,
            Some(d) if d < THREE_POINT_DISTANCE => 2,
            Some(THREE_POINT_DISTANCE) if !text.contains("three") => 2,
            Some(_) => 3,
        };
    }
    if text.contains("two") {
        return 2;
    }
    if text.contains("three") {
        return 3;
    }
    if TWO_POINT_SHOTS.iter().any(|shot| text.contains(shot)) {
        return 2;
    }

    match fallback.classify(description) {
        Ok(points @ 0..=3) => points,
        Ok(points) => {
            warn!(points, description, "fallback classifier returned an invalid point value");
            0
        }
        Err(err) => {
            warn!(%err, description, "fallback classifier failed");
            0
        }
    }
}

/// The first run of ASCII digits in `text`.
///
/// The outer option tells whether there is a number at all; the inner one is
/// `None` when it does not fit in a `u64`.
fn first_number(text: &str) -> Option<Option<u64>> {
    let digits = NUMBER.find(text)?;
    Some(digits.as_str().parse().ok())
}
