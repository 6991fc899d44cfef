//! Single-run driver and the read-only result of a run.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::SimulationConfig;
use crate::domain::{Candle, TradeRecord};
use crate::strategy::{create_strategy, FactoryError, Strategy};

/// Lowest low and highest high across a candle series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBounds {
    pub min: f64,
    pub max: f64,
}

impl PriceBounds {
    /// `None` for an empty series.
    pub fn of(candles: &[Candle]) -> Option<Self> {
        if candles.is_empty() {
            return None;
        }
        let (min, max) = candles
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), c| {
                (min.min(c.low), max.max(c.high))
            });
        Some(Self { min, max })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Half-open time interval `[start, end)` in seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

/// Everything a chart front-end needs to draw a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSnapshot<'a> {
    pub candles: &'a [Candle],
    pub range: Option<TimeRange>,
    pub bounds: Option<PriceBounds>,
}

/// Outcome of a simulation run.
///
/// Candles carry the annotations written during the run. The account's
/// final state is copied out so the result is plain data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub strategy: String,
    pub candles: Vec<Candle>,
    pub trades: Vec<TradeRecord>,
    pub start_capital: f64,
    pub capital: f64,
    pub position: f64,
    /// Equity as of the last trade.
    pub equity: f64,
    pub winners: usize,
    pub losers: usize,
    pub total_win: f64,
    /// Sum of losing deltas (negative or zero).
    pub total_loss: f64,
    pub bars_processed: usize,
    /// Index of the bar after which the account ran out of capital.
    pub liquidated_at: Option<usize>,
    pub price_bounds: Option<PriceBounds>,
}

impl RunResult {
    pub fn is_liquidated(&self) -> bool {
        self.liquidated_at.is_some()
    }

    /// Equity change over the run, measured at the last trade.
    pub fn total_pnl(&self) -> f64 {
        self.equity - self.start_capital
    }

    /// Capital plus the open position valued at the last close.
    pub fn closing_value(&self) -> Option<f64> {
        self.candles
            .last()
            .map(|c| self.capital + self.position * c.close)
    }

    /// Window covering the last `n` bars plus one bar of padding:
    /// `[end - (n + 1) * length, end)` where `end` is the close time of the
    /// last candle.
    pub fn visible_range(&self, n: usize) -> Option<TimeRange> {
        let last = self.candles.last()?;
        let end = last.close_time();
        Some(TimeRange {
            start: end - n as i64 * last.length - last.length,
            end,
        })
    }

    pub fn chart_snapshot(&self, n: usize) -> ChartSnapshot<'_> {
        ChartSnapshot {
            candles: &self.candles,
            range: self.visible_range(n),
            bounds: self.price_bounds,
        }
    }
}

/// Run `strategy` over `candles` with a fresh account built from `config`.
pub fn run_strategy(
    strategy: &mut dyn Strategy,
    mut candles: Vec<Candle>,
    config: &SimulationConfig,
) -> RunResult {
    let price_bounds = PriceBounds::of(&candles);
    let mut account = config.account();

    let outcome = strategy.run(&mut candles, &mut account);
    if let Some(index) = outcome.liquidated_at {
        warn!(
            strategy = strategy.name(),
            bar = index,
            "run halted: funds exhausted"
        );
    }
    info!(
        strategy = strategy.name(),
        bars = outcome.bars_processed,
        trades = account.trades().len(),
        equity = account.equity(),
        "run complete"
    );

    RunResult {
        strategy: strategy.name().to_string(),
        start_capital: account.start_capital(),
        capital: account.capital(),
        position: account.position(),
        equity: account.equity(),
        winners: account.winners(),
        losers: account.losers(),
        total_win: account.total_win(),
        total_loss: account.total_loss(),
        bars_processed: outcome.bars_processed,
        liquidated_at: outcome.liquidated_at,
        price_bounds,
        trades: account.into_trades(),
        candles,
    }
}

/// Build the configured strategy and run it.
pub fn simulate(config: &SimulationConfig, candles: Vec<Candle>) -> Result<RunResult, FactoryError> {
    let mut strategy = create_strategy(&config.strategy)?;
    Ok(run_strategy(strategy.as_mut(), candles, config))
}
