//! PivotLab Core: candle backtesting with pattern strategies.
//!
//! - Domain types (candles with annotations, trade records, the account
//!   ledger, stop orders)
//! - Streaming moving averages
//! - Bar-by-bar strategies with a look-ahead guard
//! - Run driver, parallel batches, data loaders and reports

pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod report;
pub mod strategy;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything a batch worker touches is Send, and
    /// plain data is Sync as well.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Candle>();
        require_sync::<domain::Candle>();
        require_send::<domain::Account>();
        require_sync::<domain::Account>();
        require_send::<domain::TradeRecord>();
        require_sync::<domain::TradeRecord>();
        require_send::<domain::StopLoss>();
        require_sync::<domain::StopLoss>();

        require_send::<config::SimulationConfig>();
        require_sync::<config::SimulationConfig>();

        require_send::<engine::RunResult>();
        require_sync::<engine::RunResult>();
        require_send::<engine::BatchJob>();
        require_sync::<engine::BatchJob>();

        require_send::<strategy::PivotReversal>();
        require_send::<strategy::MaCross>();
        require_send::<strategy::OutsideBar>();
        require_send::<Box<dyn strategy::Strategy>>();
    }

    /// Architecture contract: strategies only ever see bars up to the one
    /// being evaluated.
    ///
    /// `on_bar` takes the history slice, not the full series plus an index.
    #[test]
    fn strategy_trait_receives_history_slice_only() {
        fn _check_trait_object_builds(
            strategy: &mut dyn strategy::Strategy,
            history: &mut [domain::Candle],
            account: &mut domain::Account,
        ) {
            strategy.on_bar(history, account)
        }
    }
}
