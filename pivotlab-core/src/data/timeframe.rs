//! Bar-length strings such as `15m`, `4h`, `1D` or `1W`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::DataError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    Minute,
    Hour,
    Day,
    Week,
}

impl TimeUnit {
    pub fn seconds(&self) -> i64 {
        match self {
            TimeUnit::Minute => 60,
            TimeUnit::Hour => 3_600,
            TimeUnit::Day => 86_400,
            TimeUnit::Week => 604_800,
        }
    }

    fn suffix(&self) -> char {
        match self {
            TimeUnit::Minute => 'm',
            TimeUnit::Hour => 'h',
            TimeUnit::Day => 'D',
            TimeUnit::Week => 'W',
        }
    }
}

/// A count of time units, e.g. `4h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timeframe {
    pub count: u32,
    pub unit: TimeUnit,
}

impl Timeframe {
    pub fn new(count: u32, unit: TimeUnit) -> Self {
        Self { count, unit }
    }

    /// Parse `<count><unit>` with unit one of `m`, `h`, `D`, `W`.
    /// A bare number is taken as minutes.
    pub fn parse(s: &str) -> Result<Self, DataError> {
        let s = s.trim();
        let bad = || DataError::BadTimeframe(s.to_string());

        let (digits, unit) = match s.chars().last() {
            Some('m') => (&s[..s.len() - 1], TimeUnit::Minute),
            Some('h') => (&s[..s.len() - 1], TimeUnit::Hour),
            Some('D') => (&s[..s.len() - 1], TimeUnit::Day),
            Some('W') => (&s[..s.len() - 1], TimeUnit::Week),
            Some(c) if c.is_ascii_digit() => {
                warn!(timeframe = s, "timeframe unit missing, assuming minutes");
                (s, TimeUnit::Minute)
            }
            _ => return Err(bad()),
        };

        let count: u32 = digits.parse().map_err(|_| bad())?;
        if count == 0 {
            return Err(bad());
        }
        Ok(Self { count, unit })
    }

    /// Length of one bar in seconds.
    pub fn bar_seconds(&self) -> i64 {
        self.unit.seconds() * i64::from(self.count)
    }
}

impl Default for Timeframe {
    fn default() -> Self {
        Self::new(1, TimeUnit::Hour)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.unit.suffix())
    }
}

impl FromStr for Timeframe {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
