//! PivotLab CLI: run and compare pattern strategies over saved candle data.
//!
//! Commands:
//! - `run`: backtest one strategy and print the end-of-run summary
//! - `compare`: run every registered strategy on the same candles
//! - `strategies`: list registry names

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pivotlab_core::config::{SimulationConfig, StrategyConfig};
use pivotlab_core::data::{load_csv, load_histo_json, Timeframe};
use pivotlab_core::domain::Candle;
use pivotlab_core::engine::{run_batch, simulate, BatchJob};
use pivotlab_core::report::{trades_csv, trades_json, Summary};
use pivotlab_core::strategy::StrategyKind;

#[derive(Parser)]
#[command(
    name = "pivotlab",
    about = "PivotLab CLI: candle backtesting with pattern strategies"
)]
struct Cli {
    /// Log trades, pivots and stops (overrides RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Backtest one strategy over a candle file.
    Run {
        /// Saved histo response (.json) or candle CSV (.csv).
        #[arg(long)]
        candles: PathBuf,

        /// Bar length of the candle file (15m, 1h, 1D, 1W, ...).
        #[arg(long, default_value = "1h")]
        timeframe: String,

        /// Path to a TOML simulation config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Strategy name; overrides the config file.
        #[arg(long)]
        strategy: Option<String>,

        /// Maximum same-direction entries.
        #[arg(long)]
        pyramiding: Option<u32>,

        /// Pivot lookback width.
        #[arg(long)]
        left_bars: Option<usize>,

        /// Pivot confirmation width.
        #[arg(long)]
        right_bars: Option<usize>,

        /// Write the trade log here (.csv or .json).
        #[arg(long)]
        trades_out: Option<PathBuf>,

        /// Write candles, visible range and price bounds as JSON for charting.
        #[arg(long)]
        chart_out: Option<PathBuf>,

        /// Number of trailing bars in the chart's visible range.
        #[arg(long, default_value_t = 100)]
        visible_bars: usize,

        /// Print every annotated candle after the run.
        #[arg(long, default_value_t = false)]
        annotations: bool,
    },
    /// Run every registered strategy in parallel on the same candles.
    Compare {
        #[arg(long)]
        candles: PathBuf,

        #[arg(long, default_value = "1h")]
        timeframe: String,

        /// Path to a TOML simulation config; its strategy section is ignored.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List registered strategies.
    Strategies,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            candles,
            timeframe,
            config,
            strategy,
            pyramiding,
            left_bars,
            right_bars,
            trades_out,
            chart_out,
            visible_bars,
            annotations,
        } => {
            let mut sim = load_config(config.as_deref())?;
            if let Some(name) = strategy {
                sim.strategy = StrategyConfig::new(name);
            }
            if let Some(p) = pyramiding {
                sim.pyramiding = p;
            }
            if let Some(l) = left_bars {
                sim.strategy.params.insert("left_bars".into(), l as f64);
            }
            if let Some(r) = right_bars {
                sim.strategy.params.insert("right_bars".into(), r as f64);
            }
            sim.validate().context("invalid simulation settings")?;

            let tf = Timeframe::parse(&timeframe)?;
            let series = load_candles(&candles, &tf)?;
            run_cmd(
                &sim,
                series,
                &tf,
                trades_out.as_deref(),
                chart_out.as_deref(),
                visible_bars,
                annotations,
            )
        }
        Commands::Compare {
            candles,
            timeframe,
            config,
        } => {
            let sim = load_config(config.as_deref())?;
            let tf = Timeframe::parse(&timeframe)?;
            let series = load_candles(&candles, &tf)?;
            compare_cmd(&sim, series, &tf)
        }
        Commands::Strategies => {
            for kind in StrategyKind::ALL {
                let marker = if kind == StrategyKind::PivotReversal {
                    " (default)"
                } else {
                    ""
                };
                println!("{:<16} {}{marker}", kind.as_str(), kind.description());
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    match path {
        Some(path) => SimulationConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(SimulationConfig::default()),
    }
}

fn load_candles(path: &Path, tf: &Timeframe) -> Result<Vec<Candle>> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let candles = if is_csv {
        load_csv(path, tf.bar_seconds())
    } else {
        load_histo_json(path, tf.bar_seconds())
    }
    .with_context(|| format!("failed to load candles from {}", path.display()))?;
    info!(path = %path.display(), candles = candles.len(), timeframe = %tf, "loaded candles");
    Ok(candles)
}

fn run_cmd(
    sim: &SimulationConfig,
    candles: Vec<Candle>,
    tf: &Timeframe,
    trades_out: Option<&Path>,
    chart_out: Option<&Path>,
    visible_bars: usize,
    annotations: bool,
) -> Result<()> {
    let result = simulate(sim, candles)?;

    if annotations {
        for candle in result.candles.iter().filter(|c| !c.annotations().is_empty()) {
            println!("{candle}");
        }
    }

    println!("{}", Summary::from_result(&result, tf));

    if let Some(path) = trades_out {
        let body = match path.extension().and_then(|e| e.to_str()) {
            Some("csv") => trades_csv(&result.trades)?,
            Some("json") => trades_json(&result.trades)?,
            _ => bail!(
                "unsupported trade log extension for {} (use .csv or .json)",
                path.display()
            ),
        };
        std::fs::write(path, body)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Trades saved to: {}", path.display());
    }

    if let Some(path) = chart_out {
        let body = serde_json::to_string(&result.chart_snapshot(visible_bars))
            .context("failed to serialize chart data")?;
        std::fs::write(path, body)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Chart data saved to: {}", path.display());
    }

    Ok(())
}

fn compare_cmd(sim: &SimulationConfig, candles: Vec<Candle>, tf: &Timeframe) -> Result<()> {
    let jobs: Vec<BatchJob> = StrategyKind::ALL
        .iter()
        .map(|kind| {
            let config = SimulationConfig {
                strategy: StrategyConfig::new(kind.as_str()),
                ..sim.clone()
            };
            BatchJob::new(kind.as_str(), config, candles.clone())
        })
        .collect();

    println!("Comparison over {} candles of {tf}:", candles.len());
    for batch in run_batch(jobs) {
        let result = batch
            .result
            .with_context(|| format!("strategy {} failed", batch.label))?;
        println!("  {}", Summary::from_result(&result, tf).one_line());
    }
    Ok(())
}
