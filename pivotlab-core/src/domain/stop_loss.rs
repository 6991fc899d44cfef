//! Stop-loss: a single pending exit watched on every bar.
//!
//! A long-protecting stop fires when a bar trades below its level; a
//! short-protecting stop fires when a bar trades above it. Firing flattens
//! the account at the stop level. The stop is single-shot: the owner drops
//! it once [`StopLoss::evaluate`] reports a trigger.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::account::Account;
use super::candle::Candle;
use super::trade::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopLoss {
    protects: Direction,
    level: f64,
}

impl StopLoss {
    pub fn new(protects: Direction, level: f64) -> Self {
        Self { protects, level }
    }

    /// Direction of the position this stop protects.
    pub fn protects(&self) -> Direction {
        self.protects
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn is_triggered_by(&self, candle: &Candle) -> bool {
        match self.protects {
            Direction::Long => candle.low < self.level,
            Direction::Short => candle.high > self.level,
        }
    }

    /// Check `candle` against the stop and, if breached, stop out `account`.
    ///
    /// The account is borrowed for the call only; the stop never owns it.
    /// Returns `true` when the stop fired and must be discarded.
    pub fn evaluate(&self, candle: &Candle, account: &mut Account) -> bool {
        if !self.is_triggered_by(candle) {
            return false;
        }
        info!(
            protects = %self.protects,
            level = self.level,
            low = candle.low,
            high = candle.high,
            "stopped out"
        );
        account.stop_out(self);
        true
    }
}
