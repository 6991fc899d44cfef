//! Moving average crossover: golden cross and death cross.
//!
//! Goes long when the fast average rises above the slow one (golden cross)
//! and short when it falls back below while golden (death cross). Nothing
//! happens until both averages have a value.

use crate::domain::{Account, Candle};
use crate::indicators::{Ema, MovingAverage, Sma};

use super::Strategy;

/// Fast-average type selector. The slow average is always simple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaType {
    /// SMA fast vs SMA slow.
    Sma,
    /// EMA fast vs SMA slow.
    Ema,
}

pub struct MaCross {
    fast: Box<dyn MovingAverage>,
    slow: Box<dyn MovingAverage>,
    ma_type: MaType,
    golden: bool,
}

impl MaCross {
    pub fn new(fast_period: usize, slow_period: usize, ma_type: MaType) -> Self {
        assert!(fast_period >= 1, "fast_period must be >= 1");
        assert!(
            slow_period > fast_period,
            "slow_period must be > fast_period"
        );

        let fast: Box<dyn MovingAverage> = match ma_type {
            MaType::Sma => Box::new(Sma::new(fast_period)),
            MaType::Ema => Box::new(Ema::new(fast_period)),
        };
        Self {
            fast,
            slow: Box::new(Sma::new(slow_period)),
            ma_type,
            golden: false,
        }
    }

    /// SMA 21 / SMA 55.
    pub fn sma_default() -> Self {
        Self::new(21, 55, MaType::Sma)
    }

    /// EMA 12 / SMA 26.
    pub fn macd_default() -> Self {
        Self::new(12, 26, MaType::Ema)
    }

    pub fn is_golden(&self) -> bool {
        self.golden
    }

    pub fn fast_value(&self) -> Option<f64> {
        self.fast.value()
    }

    pub fn slow_value(&self) -> Option<f64> {
        self.slow.value()
    }
}

impl std::fmt::Debug for MaCross {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaCross")
            .field("fast", &self.fast.name())
            .field("slow", &self.slow.name())
            .field("golden", &self.golden)
            .finish()
    }
}

impl Strategy for MaCross {
    fn name(&self) -> &str {
        match self.ma_type {
            MaType::Sma => "sma_cross",
            MaType::Ema => "macd",
        }
    }

    fn first_bar(&self) -> usize {
        0
    }

    fn on_bar(&mut self, history: &mut [Candle], account: &mut Account) {
        let Some(candle) = history.last_mut() else {
            return;
        };
        self.fast.consume(candle);
        self.slow.consume(candle);
        let (Some(fast), Some(slow)) = (self.fast.value(), self.slow.value()) else {
            return;
        };

        // The state flips even when the account refuses the entry.
        if fast > slow && !self.golden {
            self.golden = true;
            account.go_long(candle, None, None);
        } else if fast < slow && self.golden {
            self.golden = false;
            account.go_short(candle, None, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;
    use crate::indicators::make_candles;

    fn run(strategy: &mut MaCross, mids: &[f64], pyramiding: u32) -> Account {
        let mut candles = make_candles(mids);
        let mut account = Account::new(1000.0, 0.5, pyramiding);
        strategy.run(&mut candles, &mut account);
        account
    }

    #[test]
    fn no_signal_during_warmup() {
        let mut strategy = MaCross::new(2, 4, MaType::Sma);
        let account = run(&mut strategy, &[1.0, 2.0, 3.0], 1);
        assert!(account.trades().is_empty());
        assert!(strategy.slow_value().is_none());
    }

    #[test]
    fn golden_then_death_cross() {
        let mut strategy = MaCross::new(2, 4, MaType::Sma);
        // rising: fast > slow at bar 3 -> long
        // falling sharply afterwards -> short
        let account = run(
            &mut strategy,
            &[10.0, 11.0, 12.0, 13.0, 14.0, 8.0, 6.0, 4.0],
            2,
        );
        let directions: Vec<Direction> = account.trades().iter().map(|t| t.direction).collect();
        assert_eq!(directions, vec![Direction::Long, Direction::Short]);
        assert!(!strategy.is_golden());
    }

    #[test]
    fn ema_fast_line_crosses_both_ways() {
        let mut strategy = MaCross::new(2, 4, MaType::Ema);
        assert_eq!(strategy.name(), "macd");
        // bar 3: ema(12, 13) ~ 12.67 > sma 11.5 -> long
        // bar 5: ema(14, 8) = 10 < sma 11.75 -> short
        let account = run(
            &mut strategy,
            &[10.0, 11.0, 12.0, 13.0, 14.0, 8.0, 6.0, 4.0],
            2,
        );
        let trades = account.trades();
        let directions: Vec<Direction> = trades.iter().map(|t| t.direction).collect();
        assert_eq!(directions, vec![Direction::Long, Direction::Short]);
        assert_eq!(trades[0].price, 13.0);
        assert_eq!(trades[1].price, 8.0);
        assert!(!strategy.is_golden());
        assert!(strategy.fast_value().unwrap() < strategy.slow_value().unwrap());
    }

    #[test]
    fn golden_flag_set_only_once_per_cross() {
        let mut strategy = MaCross::new(2, 3, MaType::Sma);
        let account = run(&mut strategy, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0], 3);
        assert_eq!(account.trades().len(), 1);
        assert!(strategy.is_golden());
    }

    #[test]
    fn names_follow_fast_type() {
        assert_eq!(MaCross::sma_default().name(), "sma_cross");
        assert_eq!(MaCross::macd_default().name(), "macd");
    }

    #[test]
    #[should_panic(expected = "slow_period must be > fast_period")]
    fn rejects_inverted_periods() {
        MaCross::new(10, 5, MaType::Sma);
    }
}
