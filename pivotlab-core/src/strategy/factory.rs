//! Strategy registry: maps a strategy identifier to a constructor.
//!
//! Names are validated up front with a clear error instead of being looked
//! up dynamically.

use std::fmt;
use std::str::FromStr;

use crate::config::StrategyConfig;

use super::{MaCross, MaType, OutsideBar, PivotReversal, Strategy};

// ─── Error type ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FactoryError {
    #[error("unknown strategy: {0} (valid: {valid})", valid = StrategyKind::valid_names())]
    UnknownStrategy(String),

    #[error("invalid parameter {name}: {reason}")]
    InvalidParam { name: String, reason: String },
}

// ─── Registry ────────────────────────────────────────────────────────

/// Every registered strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    OutsideBar,
    PivotReversal,
    SmaCross,
    Macd,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::OutsideBar,
        StrategyKind::PivotReversal,
        StrategyKind::SmaCross,
        StrategyKind::Macd,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::OutsideBar => "outside_bar",
            StrategyKind::PivotReversal => "pivot_reversal",
            StrategyKind::SmaCross => "sma_cross",
            StrategyKind::Macd => "macd",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StrategyKind::OutsideBar => "trade the close direction of engulfing outside bars",
            StrategyKind::PivotReversal => "swing-point breakouts with a stop at the opposite pivot",
            StrategyKind::SmaCross => "SMA fast/slow golden and death crosses",
            StrategyKind::Macd => "EMA fast vs SMA slow crosses",
        }
    }

    fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = FactoryError;

    /// Accepts registry names and the legacy class-style names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "outside_bar" | "OutsideBarStrategy" => Ok(StrategyKind::OutsideBar),
            "pivot_reversal" | "PivotalReversalStrategy" => Ok(StrategyKind::PivotReversal),
            "sma_cross" | "SmaCrossStrategy" => Ok(StrategyKind::SmaCross),
            "macd" | "MacdStrategy" => Ok(StrategyKind::Macd),
            other => Err(FactoryError::UnknownStrategy(other.to_string())),
        }
    }
}

// ─── Factory ─────────────────────────────────────────────────────────

/// Create a strategy from a `StrategyConfig`, filling in default parameters.
///
/// Bar-count parameters must be whole numbers of at least 1 and moving
/// average periods must satisfy `fast < slow`; anything else is an
/// [`FactoryError::InvalidParam`] instead of a panic in the constructor.
pub fn create_strategy(config: &StrategyConfig) -> Result<Box<dyn Strategy>, FactoryError> {
    let kind: StrategyKind = config.kind.parse()?;
    Ok(match kind {
        StrategyKind::OutsideBar => Box::new(OutsideBar::new()),
        StrategyKind::PivotReversal => Box::new(PivotReversal::new(
            config.param_usize("left_bars", 4, 1)?,
            config.param_usize("right_bars", 2, 1)?,
        )),
        StrategyKind::SmaCross => {
            let (fast, slow) = ma_periods(config, 21, 55)?;
            Box::new(MaCross::new(fast, slow, MaType::Sma))
        }
        StrategyKind::Macd => {
            let (fast, slow) = ma_periods(config, 12, 26)?;
            Box::new(MaCross::new(fast, slow, MaType::Ema))
        }
    })
}

fn ma_periods(
    config: &StrategyConfig,
    fast_default: usize,
    slow_default: usize,
) -> Result<(usize, usize), FactoryError> {
    let fast = config.param_usize("fast_period", fast_default, 1)?;
    let slow = config.param_usize("slow_period", slow_default, 1)?;
    if slow <= fast {
        return Err(FactoryError::InvalidParam {
            name: "slow_period".into(),
            reason: format!("must exceed fast_period ({fast}), got {slow}"),
        });
    }
    Ok((fast, slow))
}
