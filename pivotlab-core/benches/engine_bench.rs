//! Criterion benchmarks for PivotLab hot paths.
//!
//! Benchmarks:
//! 1. Full run of each registered strategy over a synthetic series
//! 2. Streaming moving averages
//! 3. Parallel batch of every strategy

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use pivotlab_core::config::{SimulationConfig, StrategyConfig};
use pivotlab_core::domain::Candle;
use pivotlab_core::engine::{run_batch, simulate, BatchJob};
use pivotlab_core::indicators::{Ema, MovingAverage, Sma};
use pivotlab_core::strategy::StrategyKind;

// ── Helpers ──────────────────────────────────────────────────────────

fn make_candles(n: usize) -> Vec<Candle> {
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0 + (i as f64 * 0.37).sin() * 3.0;
            let open = close - (i as f64 * 0.9).cos();
            let high = open.max(close) + 1.5;
            let low = open.min(close) - 1.5;
            Candle::new(open, high, low, close, 1.0, close, i as i64 * 3600, 3600)
        })
        .collect()
}

// ── 1. Strategy runs ─────────────────────────────────────────────────

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategy_run");
    for n in [1_000usize, 10_000] {
        let candles = make_candles(n);
        for kind in StrategyKind::ALL {
            let config = SimulationConfig::for_strategy(StrategyConfig::new(kind.as_str()));
            group.bench_with_input(BenchmarkId::new(kind.as_str(), n), &candles, |b, candles| {
                b.iter(|| simulate(black_box(&config), candles.clone()))
            });
        }
    }
    group.finish();
}

// ── 2. Indicators ────────────────────────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let candles = make_candles(10_000);
    let mut group = c.benchmark_group("indicators");
    group.bench_function("sma_55", |b| {
        b.iter(|| {
            let mut sma = Sma::new(55);
            for candle in &candles {
                sma.consume(candle);
            }
            black_box(sma.value())
        })
    });
    group.bench_function("ema_12", |b| {
        b.iter(|| {
            let mut ema = Ema::new(12);
            for candle in &candles {
                ema.consume(candle);
            }
            black_box(ema.value())
        })
    });
    group.finish();
}

// ── 3. Batch ─────────────────────────────────────────────────────────

fn bench_batch(c: &mut Criterion) {
    let candles = make_candles(10_000);
    c.bench_function("batch_all_strategies", |b| {
        b.iter(|| {
            let jobs: Vec<BatchJob> = StrategyKind::ALL
                .iter()
                .map(|kind| {
                    BatchJob::new(
                        kind.as_str(),
                        SimulationConfig::for_strategy(StrategyConfig::new(kind.as_str())),
                        candles.clone(),
                    )
                })
                .collect();
            black_box(run_batch(jobs))
        })
    });
}

criterion_group!(benches, bench_strategies, bench_indicators, bench_batch);
criterion_main!(benches);
