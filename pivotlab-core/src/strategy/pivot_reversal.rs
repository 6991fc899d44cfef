//! Pivotal reversal: trade breakouts of confirmed swing points.
//!
//! At bar `i` (once `i >= left_bars + right_bars`) the candidate pivot is
//! `candles[i - right_bars]`. It is compared with the `left_bars` bars before
//! it and the `right_bars` bars after it, up to and including bar `i`:
//!
//! - swing high: no bar in either window has a higher high,
//! - swing low: no bar in either window has a lower low.
//!
//! Both may be confirmed on the same bar. A swing low arms a long breakout;
//! a swing high arms a short breakout.
//!
//! Once armed long, a bar whose high exceeds the last swing high enters long
//! at the swing-high price with a stop at the swing-low price. Armed short is
//! the mirror image. Any active stop is checked against the bar before pivot
//! scanning.

use tracing::{debug, info};

use crate::domain::{Account, Candle, Direction, Placement, StopLoss};

use super::Strategy;

/// A confirmed swing point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pivot {
    pub price: f64,
    /// Index of the pivot candle in the series.
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct PivotReversal {
    left_bars: usize,
    right_bars: usize,
    swing_high: Option<Pivot>,
    swing_low: Option<Pivot>,
    armed_long: bool,
    armed_short: bool,
    stop: Option<StopLoss>,
}

impl PivotReversal {
    pub fn new(left_bars: usize, right_bars: usize) -> Self {
        assert!(left_bars >= 1, "left_bars must be >= 1");
        assert!(right_bars >= 1, "right_bars must be >= 1");
        Self {
            left_bars,
            right_bars,
            swing_high: None,
            swing_low: None,
            armed_long: false,
            armed_short: false,
            stop: None,
        }
    }

    pub fn default_params() -> Self {
        Self::new(4, 2)
    }

    pub fn left_bars(&self) -> usize {
        self.left_bars
    }

    pub fn right_bars(&self) -> usize {
        self.right_bars
    }

    pub fn swing_high(&self) -> Option<Pivot> {
        self.swing_high
    }

    pub fn swing_low(&self) -> Option<Pivot> {
        self.swing_low
    }

    pub fn armed_long(&self) -> bool {
        self.armed_long
    }

    pub fn armed_short(&self) -> bool {
        self.armed_short
    }

    pub fn active_stop(&self) -> Option<&StopLoss> {
        self.stop.as_ref()
    }

    /// Check the active stop against the current bar; drop it if it fired.
    fn check_stop(&mut self, candle: &Candle, account: &mut Account) {
        let fired = self
            .stop
            .as_ref()
            .is_some_and(|stop| stop.evaluate(candle, account));
        if fired {
            self.stop = None;
        }
    }

    /// Confirm swing points around `candles[index - right_bars]`.
    fn scan_pivots(&mut self, history: &mut [Candle]) {
        let index = history.len() - 1;
        let cp_index = index - self.right_bars;
        let cp = &history[cp_index];
        let left = &history[cp_index - self.left_bars..cp_index];
        let right = &history[cp_index + 1..=index];

        let is_high = left.iter().chain(right).all(|c| c.high <= cp.high);
        let is_low = left.iter().chain(right).all(|c| c.low >= cp.low);
        let (high, low) = (cp.high, cp.low);

        if is_high {
            debug!(index = cp_index, price = high, "swing high");
            self.swing_high = Some(Pivot {
                price: high,
                index: cp_index,
            });
            self.armed_short = true;
            history[cp_index].annotate("SWH", Placement::Above);
        }
        if is_low {
            debug!(index = cp_index, price = low, "swing low");
            self.swing_low = Some(Pivot {
                price: low,
                index: cp_index,
            });
            self.armed_long = true;
            history[cp_index].annotate("SWL", Placement::Below);
        }
    }

    fn try_breakouts(&mut self, history: &mut [Candle], account: &mut Account) {
        let index = history.len() - 1;

        if let (true, Some(high), Some(low)) = (self.armed_long, self.swing_high, self.swing_low) {
            if history[index].high > high.price
                && account.go_long(&mut history[index], None, Some(high.price))
            {
                info!(entry = high.price, stop = low.price, "long breakout");
                self.stop = Some(StopLoss::new(Direction::Long, low.price));
                history[low.index].annotate("STOP", Placement::Below);
                self.armed_long = false;
            }
        }

        if let (true, Some(high), Some(low)) = (self.armed_short, self.swing_high, self.swing_low) {
            if history[index].low < low.price
                && account.go_short(&mut history[index], None, Some(low.price))
            {
                info!(entry = low.price, stop = high.price, "short breakout");
                self.stop = Some(StopLoss::new(Direction::Short, high.price));
                history[high.index].annotate("STOP", Placement::Above);
                self.armed_short = false;
            }
        }
    }
}

impl Strategy for PivotReversal {
    fn name(&self) -> &str {
        "pivot_reversal"
    }

    fn first_bar(&self) -> usize {
        self.left_bars + self.right_bars
    }

    fn on_bar(&mut self, history: &mut [Candle], account: &mut Account) {
        if history.len() <= self.first_bar() {
            return;
        }
        if let Some(candle) = history.last() {
            self.check_stop(candle, account);
        }
        self.scan_pivots(history);
        self.try_breakouts(history, account);
    }
}
