//! Outside bar: trade in the close direction of an engulfing bar.
//!
//! A bar is "outside" when its high exceeds the previous high and its low
//! undercuts the previous low. A bullish outside bar goes long, a bearish one
//! goes short; a doji outside bar is ignored.

use crate::domain::{Account, Candle};

use super::Strategy;

#[derive(Debug, Clone, Default)]
pub struct OutsideBar;

impl OutsideBar {
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for OutsideBar {
    fn name(&self) -> &str {
        "outside_bar"
    }

    fn first_bar(&self) -> usize {
        1
    }

    fn on_bar(&mut self, history: &mut [Candle], account: &mut Account) {
        let [.., prev, current] = history else {
            return;
        };
        if !(current.high > prev.high && current.low < prev.low) {
            return;
        }
        if current.is_bullish() {
            account.go_long(current, None, None);
        } else if current.is_bearish() {
            account.go_short(current, None, None);
        }
    }
}
