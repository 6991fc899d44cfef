//! Account: capital, position, and the trade ledger.
//!
//! The account is the only place where money or position changes. Strategies
//! ask it to go long or short; it resolves the fill price, flattens any
//! opposite position first, sizes the new leg as a fixed fraction of current
//! capital, and appends a [`TradeRecord`].
//!
//! The equity identity `equity == capital + position * price` holds after
//! every executed trade, where `price` is that trade's execution price.

use tracing::{debug, error, warn};

use super::candle::Candle;
use super::stop_loss::StopLoss;
use super::trade::{Direction, TradeRecord};

/// Cash, position, and trade history for one simulation run.
#[derive(Debug, Clone)]
pub struct Account {
    capital: f64,
    /// Signed instrument quantity: positive long, negative short.
    position: f64,
    equity: f64,
    start_capital: f64,
    /// Fraction of current capital committed by a default-sized trade.
    position_fraction: f64,
    pyramiding: i64,
    /// Net entries since the last flip, kept in `[-(pyramiding - 1), pyramiding]`.
    long_short: i64,
    winners: usize,
    losers: usize,
    total_win: f64,
    total_loss: f64,
    trades: Vec<TradeRecord>,
}

impl Account {
    pub fn new(capital: f64, position_fraction: f64, pyramiding: u32) -> Self {
        Self {
            capital,
            position: 0.0,
            equity: capital,
            start_capital: capital,
            position_fraction,
            pyramiding: i64::from(pyramiding),
            long_short: 0,
            winners: 0,
            losers: 0,
            total_win: 0.0,
            total_loss: 0.0,
            trades: Vec::new(),
        }
    }

    /// Execute a fill in `direction`.
    ///
    /// Price defaults to the candle's close and amount to
    /// `position_fraction * capital` (capital measured after any opposite
    /// position has been closed). When a candle is given it is tagged with
    /// the direction and committed amount.
    ///
    /// Returns `None`, leaving the account untouched, when no price can be
    /// resolved because neither a price nor a candle was supplied.
    pub fn execute_trade(
        &mut self,
        candle: Option<&mut Candle>,
        direction: Direction,
        amount: Option<f64>,
        price: Option<f64>,
    ) -> Option<&TradeRecord> {
        let Some(price) = price.or_else(|| candle.as_ref().map(|c| c.close)) else {
            error!(%direction, "trade has neither an explicit price nor a candle; ignored");
            return None;
        };

        // Flatten the opposite side before opening the new leg.
        let opposite = match direction {
            Direction::Long => self.position < 0.0,
            Direction::Short => self.position > 0.0,
        };
        if opposite {
            self.capital += self.position * price;
            self.position = 0.0;
        }

        let amount = amount.unwrap_or(self.position_fraction * self.capital);
        match direction {
            Direction::Long => {
                self.capital -= amount;
                self.position += amount / price;
            }
            Direction::Short => {
                self.capital += amount;
                self.position -= amount / price;
            }
        }

        let equity = self.capital + self.position * price;
        let delta = equity - self.equity;
        if delta > 0.0 {
            self.winners += 1;
            self.total_win += delta;
        } else if delta < 0.0 {
            self.losers += 1;
            self.total_loss += delta;
        }
        self.equity = equity;

        debug!(
            %direction,
            price,
            amount,
            equity,
            delta,
            capital = self.capital,
            position = self.position,
            "trade executed"
        );

        let open_time = candle.map(|c| {
            c.annotate(format!("{direction}({amount:?})"), direction.placement());
            c.open_time
        });

        self.trades.push(TradeRecord {
            direction,
            equity,
            delta,
            price,
            amount,
            open_time,
        });
        self.trades.last()
    }

    /// Textual entry point for [`Account::execute_trade`].
    ///
    /// An unrecognised direction is logged and ignored; no state changes.
    pub fn execute_named(
        &mut self,
        candle: Option<&mut Candle>,
        direction: &str,
        amount: Option<f64>,
        price: Option<f64>,
    ) -> Option<&TradeRecord> {
        match direction.parse::<Direction>() {
            Ok(direction) => self.execute_trade(candle, direction, amount, price),
            Err(err) => {
                error!(%err, "trade rejected");
                None
            }
        }
    }

    /// Open or add to a long. Refused (returns `false`) once `pyramiding`
    /// net long entries are outstanding.
    pub fn go_long(&mut self, candle: &mut Candle, amount: Option<f64>, price: Option<f64>) -> bool {
        if self.long_short >= self.pyramiding {
            return false;
        }
        self.execute_trade(Some(candle), Direction::Long, amount, price);
        self.long_short += 1;
        true
    }

    /// Open or add to a short. Refused (returns `false`) once the net counter
    /// has reached `-(pyramiding - 1)`.
    pub fn go_short(
        &mut self,
        candle: &mut Candle,
        amount: Option<f64>,
        price: Option<f64>,
    ) -> bool {
        if self.long_short <= -(self.pyramiding - 1) {
            return false;
        }
        self.execute_trade(Some(candle), Direction::Short, amount, price);
        self.long_short -= 1;
        true
    }

    /// Flatten the whole position at the stop's level.
    ///
    /// Trades against the current position with a zero amount, so only the
    /// closing leg happens. No candle is annotated and the pyramiding counter
    /// is left as is.
    pub fn stop_out(&mut self, order: &StopLoss) {
        let direction = if self.position > 0.0 {
            Direction::Short
        } else {
            Direction::Long
        };
        self.execute_trade(None, direction, Some(0.0), Some(order.level()));
    }

    /// `false` once capital is exhausted; the run must stop trading.
    pub fn funds_ok(&self) -> bool {
        if self.capital <= 0.0 {
            warn!(capital = self.capital, "account liquidated");
            return false;
        }
        true
    }

    pub fn capital(&self) -> f64 {
        self.capital
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Equity as of the last executed trade.
    pub fn equity(&self) -> f64 {
        self.equity
    }

    /// Capital plus the position marked at `price`.
    pub fn equity_at(&self, price: f64) -> f64 {
        self.capital + self.position * price
    }

    pub fn start_capital(&self) -> f64 {
        self.start_capital
    }

    pub fn position_fraction(&self) -> f64 {
        self.position_fraction
    }

    pub fn pyramiding(&self) -> u32 {
        self.pyramiding as u32
    }

    pub fn long_short(&self) -> i64 {
        self.long_short
    }

    pub fn winners(&self) -> usize {
        self.winners
    }

    pub fn losers(&self) -> usize {
        self.losers
    }

    pub fn total_win(&self) -> f64 {
        self.total_win
    }

    /// Sum of negative deltas (itself negative or zero).
    pub fn total_loss(&self) -> f64 {
        self.total_loss
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn into_trades(self) -> Vec<TradeRecord> {
        self.trades
    }
}
