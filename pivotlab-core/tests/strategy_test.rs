//! End-to-end runs over the saved BTC/USD fixture.

use std::path::PathBuf;

use pivotlab_core::config::{SimulationConfig, StrategyConfig};
use pivotlab_core::data::{load_histo_json, Timeframe};
use pivotlab_core::domain::{Candle, Direction};
use pivotlab_core::engine::{run_strategy, simulate, RunResult};
use pivotlab_core::strategy::{OutsideBar, PivotReversal, StrategyKind};

fn fixture() -> Vec<Candle> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/btc_usd_1h.json");
    let tf = Timeframe::parse("1h").unwrap();
    load_histo_json(&path, tf.bar_seconds()).unwrap()
}

fn run(kind: StrategyKind) -> RunResult {
    let config = SimulationConfig::for_strategy(StrategyConfig::new(kind.as_str()));
    simulate(&config, fixture()).unwrap()
}

fn assert_ledger_consistent(result: &RunResult) {
    let mut equity = result.start_capital;
    for trade in &result.trades {
        assert!((trade.delta - (trade.equity - equity)).abs() < 1e-6);
        equity = trade.equity;
    }
    assert!((result.equity - equity).abs() < 1e-9);

    let decided = result.trades.iter().filter(|t| t.delta != 0.0).count();
    assert_eq!(result.winners + result.losers, decided);
    assert!(result.total_win >= 0.0);
    assert!(result.total_loss <= 0.0);
    assert!((result.total_win + result.total_loss - result.total_pnl()).abs() < 1e-6);
}

#[test]
fn fixture_loads_in_order() {
    let candles = fixture();
    assert_eq!(candles.len(), 160);
    assert!(candles.windows(2).all(|w| w[1].open_time - w[0].open_time == 3600));
    assert!(candles.iter().all(Candle::is_sane));
}

#[test]
fn every_strategy_keeps_a_consistent_ledger() {
    for kind in StrategyKind::ALL {
        let result = run(kind);
        assert_eq!(result.strategy, kind.as_str());
        assert_eq!(result.candles.len(), 160);
        assert_ledger_consistent(&result);
    }
}

#[test]
fn pivot_reversal_marks_swings_and_trades() {
    let result = run(StrategyKind::PivotReversal);
    let swh = result
        .candles
        .iter()
        .filter(|c| c.annotations().above().iter().any(|a| a == "SWH"))
        .count();
    let swl = result
        .candles
        .iter()
        .filter(|c| c.annotations().below().iter().any(|a| a == "SWL"))
        .count();
    assert!(swh > 0);
    assert!(swl > 0);
    assert!(!result.trades.is_empty());
    assert_eq!(result.bars_processed, 160 - 6);

    // every entry is tagged on its bar; stop-outs carry no bar
    for trade in result.trades.iter().filter(|t| t.amount > 0.0) {
        let open_time = trade.open_time.unwrap();
        let candle = result
            .candles
            .iter()
            .find(|c| c.open_time == open_time)
            .unwrap();
        let side = match trade.direction {
            Direction::Long => candle.annotations().below(),
            Direction::Short => candle.annotations().above(),
        };
        assert!(side.iter().any(|a| a.starts_with(trade.direction.as_str())));
    }
}

#[test]
fn swing_points_are_never_annotated_in_the_last_right_bars() {
    let result = run(StrategyKind::PivotReversal);
    let n = result.candles.len();
    for candle in &result.candles[n - 2..] {
        assert!(!candle.annotations().above().iter().any(|a| a == "SWH"));
        assert!(!candle.annotations().below().iter().any(|a| a == "SWL"));
    }
}

#[test]
fn outside_bar_only_trades_engulfing_bars() {
    let result = run(StrategyKind::OutsideBar);
    for trade in &result.trades {
        let i = result
            .candles
            .iter()
            .position(|c| Some(c.open_time) == trade.open_time)
            .unwrap();
        let (prev, cur) = (&result.candles[i - 1], &result.candles[i]);
        assert!(cur.high > prev.high && cur.low < prev.low);
    }
}

#[test]
fn runs_are_deterministic() {
    let a = run(StrategyKind::PivotReversal);
    let b = run(StrategyKind::PivotReversal);
    assert_eq!(a.trades, b.trades);
    assert_eq!(a.candles, b.candles);
}

#[test]
fn run_strategy_accepts_a_hand_built_strategy() {
    let config = SimulationConfig::default();
    let mut pivot = PivotReversal::new(3, 1);
    let result = run_strategy(&mut pivot, fixture(), &config);
    assert_eq!(result.bars_processed, 160 - 4);
    assert_ledger_consistent(&result);

    let mut outside = OutsideBar::new();
    let result = run_strategy(&mut outside, fixture(), &config);
    assert_eq!(result.bars_processed, 159);
}

#[test]
fn closing_value_uses_last_close() {
    let result = run(StrategyKind::PivotReversal);
    let last = result.candles.last().unwrap().close;
    let expected = result.capital + result.position * last;
    assert!((result.closing_value().unwrap() - expected).abs() < 1e-9);

    let bounds = result.price_bounds.unwrap();
    assert!(result
        .candles
        .iter()
        .all(|c| c.low >= bounds.min && c.high <= bounds.max));
}
