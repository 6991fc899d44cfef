//! Streaming moving-average indicators.
//!
//! Each indicator is fed one candle at a time in chronological order and
//! keeps a fixed-capacity window of candle midpoints. `value()` is `None`
//! until the window has filled.

pub mod ema;
pub mod sma;

pub use ema::Ema;
pub use sma::Sma;

use std::collections::VecDeque;

use crate::domain::Candle;

/// Trait for streaming moving averages.
///
/// # Warm-up
/// `value()` must return `None` for the first `period() - 1` consumed
/// candles and `Some` from the `period()`-th onward.
pub trait MovingAverage: Send + Sync {
    /// Human-readable name (e.g., "sma_21", "ema_12").
    fn name(&self) -> &str;

    fn period(&self) -> usize;

    /// Push the candle's midpoint into the window.
    fn consume(&mut self, candle: &Candle);

    fn value(&self) -> Option<f64>;
}

/// Fixed-capacity FIFO of prices; the oldest value is evicted on overflow.
#[derive(Debug, Clone)]
pub struct PriceWindow {
    capacity: usize,
    values: VecDeque<f64>,
}

impl PriceWindow {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "window capacity must be >= 1");
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }
}

/// Create candles whose midpoint equals each given price (high = p + 1,
/// low = p - 1).
#[cfg(test)]
pub fn make_candles(mids: &[f64]) -> Vec<Candle> {
    mids.iter()
        .enumerate()
        .map(|(i, &p)| Candle::new(p, p + 1.0, p - 1.0, p, 0.0, 0.0, i as i64 * 60, 60))
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
