use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid game clock `{input}`")]
pub struct ParseClockError {
    input: String,
}

/// A countdown game clock with one-second resolution.
///
/// Displays as `m:ss` (`12:00`, `7:05`, `0:09`). Parsing also accepts a bare
/// number of seconds, rounding fractions up, since historical feeds report the
/// last minute as `45.3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GameClock {
    seconds: u32,
}

impl GameClock {
    pub const ZERO: Self = Self::from_seconds(0);
    /// Length of a regulation quarter.
    pub const QUARTER: Self = Self::from_seconds(12 * 60);

    #[must_use]
    pub const fn from_seconds(seconds: u32) -> Self {
        Self { seconds }
    }

    #[must_use]
    pub const fn seconds(self) -> u32 {
        self.seconds
    }

    /// Runs the clock down by `seconds`, or returns `None` if it would pass zero.
    #[must_use]
    pub const fn checked_sub(self, seconds: u32) -> Option<Self> {
        match self.seconds.checked_sub(seconds) {
            Some(seconds) => Some(Self { seconds }),
            None => None,
        }
    }
}

impl fmt::Display for GameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.seconds / 60, self.seconds % 60)
    }
}

impl FromStr for GameClock {
    type Err = ParseClockError;

    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParseClockError {
            input: s.to_owned(),
        };
        let s = s.trim();
        if let Some((minutes, seconds)) = s.split_once(':') {
            let minutes = minutes.parse::<u32>().map_err(|_| error())?;
            let seconds = seconds.parse::<u32>().map_err(|_| error())?;
            let total = minutes
                .checked_mul(60)
                .and_then(|m| m.checked_add(seconds))
                .ok_or_else(error)?;
            return Ok(Self::from_seconds(total));
        }
        let seconds = s.parse::<f64>().map_err(|_| error())?.ceil();
        if !(0.0..=f64::from(u32::MAX)).contains(&seconds) {
            return Err(error());
        }
        Ok(Self::from_seconds(seconds as u32))
    }
}

impl Serialize for GameClock {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GameClock {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_seconds() {
        assert_eq!(GameClock::QUARTER.to_string(), "12:00");
        assert_eq!(GameClock::from_seconds(425).to_string(), "7:05");
        assert_eq!(GameClock::from_seconds(9).to_string(), "0:09");
        assert_eq!(GameClock::ZERO.to_string(), "0:00");
    }

    #[test]
    fn test_parse_minutes_and_seconds() {
        assert_eq!("12:00".parse::<GameClock>().unwrap(), GameClock::QUARTER);
        assert_eq!("0:0".parse::<GameClock>().unwrap(), GameClock::ZERO);
        assert_eq!("3:07".parse::<GameClock>().unwrap().seconds(), 187);
    }

    #[test]
    fn test_parse_fractional_seconds_rounds_up() {
        assert_eq!("45.3".parse::<GameClock>().unwrap().seconds(), 46);
        assert_eq!("12".parse::<GameClock>().unwrap().seconds(), 12);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<GameClock>().is_err());
        assert!("ab:cd".parse::<GameClock>().is_err());
        assert!("-3".parse::<GameClock>().is_err());
    }

    #[test]
    fn test_checked_sub_stops_at_zero() {
        let clock = GameClock::from_seconds(10);
        assert_eq!(clock.checked_sub(10), Some(GameClock::ZERO));
        assert_eq!(clock.checked_sub(11), None);
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&GameClock::from_seconds(65)).unwrap();
        assert_eq!(json, "\"1:05\"");
        let clock: GameClock = serde_json::from_str(&json).unwrap();
        assert_eq!(clock.seconds(), 65);
    }
}
