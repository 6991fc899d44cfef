//! Simple Moving Average (SMA).
//!
//! Arithmetic mean of the last `period` candle midpoints.

use super::{MovingAverage, PriceWindow};
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct Sma {
    window: PriceWindow,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            window: PriceWindow::new(period),
            name: format!("sma_{period}"),
        }
    }
}

impl MovingAverage for Sma {
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
        Some(self.window.iter().sum::<f64>() / self.window.capacity() as f64)
    }
}
