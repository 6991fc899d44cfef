//! Exponential Moving Average (EMA) over a fixed window.
//!
//! Recomputed from the current window on every call:
//! seed with the oldest value, then for each value v oldest first,
//! `ema = alpha * v + (1 - alpha) * ema`, with `alpha = 2 / (period + 1)`.
//!
//! No state is carried between calls, so the warm-up curve differs from a
//! recursive EMA seeded once at the start of the series.

use super::{MovingAverage, PriceWindow};
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct Ema {
    window: PriceWindow,
    alpha: f64,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            window: PriceWindow::new(period),
            alpha: 2.0 / (period as f64 + 1.0),
            name: format!("ema_{period}"),
        }
    }
}

impl MovingAverage for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn period(&self) -> usize {
        self.window.capacity()
    }

    fn consume(&mut self, candle: &Candle) {
        self.window.push(candle.mid());
    }

    fn value(&self) -> Option<f64> {
        if !self.window.is_full() {
            return None;
        }
        let seed = self.window.iter().next()?;
        let ema = self
            .window
            .iter()
            .fold(seed, |ema, v| self.alpha * v + (1.0 - self.alpha) * ema);
        Some(ema)
    }
}
