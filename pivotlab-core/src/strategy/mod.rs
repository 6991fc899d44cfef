//! Pattern strategies: turn a candle stream into long/short decisions.
//!
//! All strategies share the same shape: they are fed the candle history one
//! bar at a time, update their own indicator or pattern state, and call
//! [`Account::go_long`] / [`Account::go_short`]. Money and position only ever
//! change inside the [`Account`].
//!
//! # Look-ahead guard
//! `on_bar` receives `candles[..=index]`, so the current bar is always the
//! last element of the slice. A strategy cannot read bars that have not yet
//! happened; earlier bars may be annotated.

pub mod factory;
pub mod ma_cross;
pub mod outside_bar;
pub mod pivot_reversal;

pub use factory::{create_strategy, FactoryError, StrategyKind};
pub use ma_cross::{MaCross, MaType};
pub use outside_bar::OutsideBar;
pub use pivot_reversal::{Pivot, PivotReversal};

use crate::domain::{Account, Candle};

/// Where a strategy run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// Number of bars handed to `on_bar`.
    pub bars_processed: usize,
    /// Index of the bar after which capital was exhausted, if any.
    pub liquidated_at: Option<usize>,
}

/// Trait for bar-by-bar trading strategies.
pub trait Strategy: Send {
    /// Registry name (e.g., "pivot_reversal").
    fn name(&self) -> &str;

    /// Index of the first bar the strategy evaluates. Earlier bars are only
    /// used as history.
    fn first_bar(&self) -> usize;

    /// Evaluate the last candle of `history` and trade through `account`.
    fn on_bar(&mut self, history: &mut [Candle], account: &mut Account);

    /// Feed every candle from `first_bar()` onward, in order, and stop after
    /// the first bar that leaves the account without funds.
    fn run(&mut self, candles: &mut [Candle], account: &mut Account) -> RunOutcome {
        let mut outcome = RunOutcome {
            bars_processed: 0,
            liquidated_at: None,
        };
        for index in self.first_bar()..candles.len() {
            self.on_bar(&mut candles[..=index], account);
            outcome.bars_processed += 1;
            if !account.funds_ok() {
                outcome.liquidated_at = Some(index);
                break;
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Goes long with the whole capital on its first bar.
    struct AllIn;

    impl Strategy for AllIn {
        fn name(&self) -> &str {
            "all_in"
        }

        fn first_bar(&self) -> usize {
            1
        }

        fn on_bar(&mut self, history: &mut [Candle], account: &mut Account) {
            let capital = account.capital();
            if let Some(candle) = history.last_mut() {
                account.go_long(candle, Some(capital), None);
            }
        }
    }

    fn candles(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| Candle::new(10.0, 11.0, 9.0, 10.0, 0.0, 0.0, i as i64 * 60, 60))
            .collect()
    }

    #[test]
    fn run_halts_after_liquidation() {
        let mut series = candles(5);
        let mut account = Account::new(1000.0, 0.5, 1);
        let outcome = AllIn.run(&mut series, &mut account);
        assert_eq!(outcome.bars_processed, 1);
        assert_eq!(outcome.liquidated_at, Some(1));
        assert_eq!(account.trades().len(), 1);
        assert!(series[0].annotations().is_empty());
        assert_eq!(series[1].annotations().below(), ["LONG(1000.0)"]);
    }

    #[test]
    fn run_on_short_series_processes_nothing() {
        let mut series = candles(1);
        let mut account = Account::new(1000.0, 0.5, 1);
        let outcome = AllIn.run(&mut series, &mut account);
        assert_eq!(outcome.bars_processed, 0);
        assert_eq!(outcome.liquidated_at, None);
    }
}
