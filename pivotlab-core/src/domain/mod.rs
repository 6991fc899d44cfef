//! Domain types: candles, trade records, the account ledger, and stop orders.

pub mod account;
pub mod candle;
pub mod stop_loss;
pub mod trade;

pub use account::Account;
pub use candle::{Annotations, Candle, Placement};
pub use stop_loss::StopLoss;
pub use trade::{Direction, DirectionParseError, TradeRecord};
