//! Trade direction and ledger records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::candle::Placement;

/// Side of a simulated fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Long => Direction::Short,
            Direction::Short => Direction::Long,
        }
    }

    /// Shorts are tagged above the bar, longs below.
    pub fn placement(&self) -> Placement {
        match self {
            Direction::Long => Placement::Below,
            Direction::Short => Placement::Above,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown trade direction {0:?} (expected LONG or SHORT)")]
pub struct DirectionParseError(pub String);

impl FromStr for Direction {
    type Err = DirectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LONG" => Ok(Direction::Long),
            "SHORT" => Ok(Direction::Short),
            _ => Err(DirectionParseError(s.to_string())),
        }
    }
}

/// One executed trade in the ledger.
///
/// `delta` is the change in equity relative to the equity recorded by the
/// previous trade (or the starting capital for the first one).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub direction: Direction,
    /// Equity immediately after the fill, marked at `price`.
    pub equity: f64,
    pub delta: f64,
    /// Execution price.
    pub price: f64,
    /// Notional committed in the new direction (zero for a pure close).
    pub amount: f64,
    /// Open time of the candle that produced the fill; `None` for stop-outs.
    pub open_time: Option<i64>,
}

impl TradeRecord {
    pub fn is_winner(&self) -> bool {
        self.delta > 0.0
    }

    pub fn is_loser(&self) -> bool {
        self.delta < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!("LONG".parse::<Direction>().unwrap(), Direction::Long);
        assert_eq!(" short ".parse::<Direction>().unwrap(), Direction::Short);
        let err = "FLAT".parse::<Direction>().unwrap_err();
        assert_eq!(err, DirectionParseError("FLAT".into()));
    }

    #[test]
    fn direction_placement_and_opposite() {
        assert_eq!(Direction::Long.placement(), Placement::Below);
        assert_eq!(Direction::Short.placement(), Placement::Above);
        assert_eq!(Direction::Long.opposite(), Direction::Short);
        assert_eq!(Direction::Short.to_string(), "SHORT");
    }

    #[test]
    fn trade_serializes_direction_uppercase() {
        let trade = TradeRecord {
            direction: Direction::Long,
            equity: 1000.0,
            delta: 0.0,
            price: 100.0,
            amount: 500.0,
            open_time: Some(0),
        };
        let json = serde_json::to_string(&trade).unwrap();
        assert!(json.contains("\"LONG\""));
        assert!(!trade.is_winner());
        assert!(!trade.is_loser());
    }
}
