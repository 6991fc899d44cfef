//! Trade-log export and the end-of-run summary.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::domain::TradeRecord;
use crate::engine::RunResult;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("flush CSV buffer: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

// ─── Trade log ──────────────────────────────────────────────────────

/// Columns: index, direction, open_time, price, amount, equity, delta.
/// `open_time` is blank for trades with no bar attached (stop-outs).
pub fn trades_csv(trades: &[TradeRecord]) -> Result<String, ReportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "index",
        "direction",
        "open_time",
        "price",
        "amount",
        "equity",
        "delta",
    ])?;

    for (i, t) in trades.iter().enumerate() {
        wtr.write_record([
            &i.to_string(),
            t.direction.as_str(),
            &t.open_time.map(|ts| ts.to_string()).unwrap_or_default(),
            &format!("{:.6}", t.price),
            &format!("{:.6}", t.amount),
            &format!("{:.6}", t.equity),
            &format!("{:.6}", t.delta),
        ])?;
    }

    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

pub fn trades_json(trades: &[TradeRecord]) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(trades)?)
}

// ─── Summary ────────────────────────────────────────────────────────

/// End-of-run figures in printable form.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub strategy: String,
    pub candles: usize,
    pub timeframe: String,
    pub trades: Vec<TradeRecord>,
    pub position: f64,
    pub capital: f64,
    /// `None` when the run had no candles.
    pub closing_value: Option<f64>,
    pub losers: usize,
    pub winners: usize,
    pub total_loss: f64,
    pub total_win: f64,
    pub total_pnl: f64,
    pub liquidated: bool,
}

impl Summary {
    pub fn from_result(result: &RunResult, timeframe: impl fmt::Display) -> Self {
        Self {
            strategy: result.strategy.clone(),
            candles: result.candles.len(),
            timeframe: timeframe.to_string(),
            trades: result.trades.clone(),
            position: result.position,
            capital: result.capital,
            closing_value: result.closing_value(),
            losers: result.losers,
            winners: result.winners,
            total_loss: result.total_loss,
            total_win: result.total_win,
            total_pnl: result.total_pnl(),
            liquidated: result.is_liquidated(),
        }
    }

    /// One-line form used when comparing strategies.
    pub fn one_line(&self) -> String {
        format!(
            "{:<16} trades:{:4}  won:{:3}  lost:{:3}  pnl:{:10.2}{}",
            self.strategy,
            self.trades.len(),
            self.winners,
            self.losers,
            self.total_pnl,
            if self.liquidated { "  LIQUIDATED" } else { "" }
        )
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Trades:")?;
        for (i, t) in self.trades.iter().enumerate() {
            writeln!(
                f,
                "  Trade {:3}: type: {:5}, equity: {:5.2}, delta: {:3.2}",
                i,
                t.direction.as_str(),
                t.equity,
                t.delta
            )?;
        }
        writeln!(
            f,
            "Strategy performance over {} candles of {}:",
            self.candles, self.timeframe
        )?;
        writeln!(f, "  position at end: {}", self.position)?;
        writeln!(f, "  capital at end:  {}", self.capital)?;
        if let Some(value) = self.closing_value {
            writeln!(f, "  Closing all positions: {value:5.2}")?;
        }
        writeln!(f, "  Number of losing trades: {}", self.losers)?;
        writeln!(f, "  Number of winning trades:{}", self.winners)?;
        writeln!(f, "  Total capital lost in losing trades:{:5.2}", self.total_loss)?;
        writeln!(f, "  Total capital won in winning trades:{:5.2}", self.total_win)?;
        write!(f, "  Total pnl:{:5.2}", self.total_pnl)?;
        if self.liquidated {
            write!(f, "\n  Liquidated")?;
        }
        Ok(())
    }
}
