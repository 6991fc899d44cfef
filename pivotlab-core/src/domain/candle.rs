//! Candle: the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an annotation is drawn relative to its candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    Above,
    Below,
}

/// Append-only text tags attached to a candle for chart rendering.
///
/// The simulation is the only writer; visualizers read after (or between)
/// bars. Tags are never removed or reordered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    above: Vec<String>,
    below: Vec<String>,
}

impl Annotations {
    pub fn push(&mut self, text: impl Into<String>, placement: Placement) {
        match placement {
            Placement::Above => self.above.push(text.into()),
            Placement::Below => self.below.push(text.into()),
        }
    }

    pub fn above(&self) -> &[String] {
        &self.above
    }

    pub fn below(&self) -> &[String] {
        &self.below
    }

    pub fn is_empty(&self) -> bool {
        self.above.is_empty() && self.below.is_empty()
    }
}

/// One OHLCV price bar over a fixed time span.
///
/// `low <= open, close <= high` is assumed, not enforced; the data source is
/// responsible for delivering sane bars (see [`Candle::is_sane`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Traded volume in base units.
    pub volume_from: f64,
    /// Traded volume in quote units.
    pub volume_to: f64,
    /// Bar open time, seconds since the Unix epoch.
    pub open_time: i64,
    /// Bar length in seconds.
    pub length: i64,
    #[serde(default)]
    annotations: Annotations,
}

impl Candle {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume_from: f64,
        volume_to: f64,
        open_time: i64,
        length: i64,
    ) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume_from,
            volume_to,
            open_time,
            length,
            annotations: Annotations::default(),
        }
    }

    /// `(high + low) / 2`, the price fed to moving averages.
    pub fn mid(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// `(high + low + close) / 3`
    pub fn typical(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// `(open + high + low + close) / 4`
    pub fn ohlc_avg(&self) -> f64 {
        (self.open + self.high + self.low + self.close) / 4.0
    }

    /// `high - low`. Ignores the previous close, so this is not a true range.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Exclusive end of the bar, seconds since the Unix epoch.
    pub fn close_time(&self) -> i64 {
        self.open_time + self.length
    }

    pub fn open_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.open_time, 0)
    }

    /// Basic OHLC sanity check. Not applied by the simulation itself.
    pub fn is_sane(&self) -> bool {
        self.high >= self.low
            && self.low <= self.open
            && self.low <= self.close
            && self.high >= self.open
            && self.high >= self.close
            && self.low > 0.0
    }

    pub fn annotate(&mut self, text: impl Into<String>, placement: Placement) {
        self.annotations.push(text, placement);
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

impl fmt::Display for Candle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Candle {} secs from {}, open:{}, close:{}, low:{}, high:{}",
            self.length, self.open_time, self.open, self.close, self.low, self.high
        )?;
        if !self.annotations.above.is_empty() {
            write!(f, ", above:{}", self.annotations.above.join(";"))?;
        }
        if !self.annotations.below.is_empty() {
            write!(f, ", below:{}", self.annotations.below.join(";"))?;
        }
        write!(f, ">")
    }
}
