//! Simulation driver: runs a strategy over a candle series and collects the
//! results.
//!
//! A run is single-threaded and strictly chronological. Independent runs
//! share nothing and can be executed in parallel with [`run_batch`].

pub mod batch;
pub mod runner;

pub use batch::{run_batch, BatchJob, BatchResult};
pub use runner::{run_strategy, simulate, ChartSnapshot, PriceBounds, RunResult, TimeRange};
