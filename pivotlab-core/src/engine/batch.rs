//! Parallel execution of independent runs.

use rayon::prelude::*;
use tracing::info;

use crate::config::SimulationConfig;
use crate::domain::Candle;
use crate::strategy::FactoryError;

use super::runner::{simulate, RunResult};

/// One run in a batch. Each job owns its candles; annotations written by one
/// run never leak into another.
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub label: String,
    pub config: SimulationConfig,
    pub candles: Vec<Candle>,
}

impl BatchJob {
    pub fn new(label: impl Into<String>, config: SimulationConfig, candles: Vec<Candle>) -> Self {
        Self {
            label: label.into(),
            config,
            candles,
        }
    }
}

#[derive(Debug)]
pub struct BatchResult {
    pub label: String,
    pub result: Result<RunResult, FactoryError>,
}

/// Run every job on the rayon pool. Output order matches input order.
pub fn run_batch(jobs: Vec<BatchJob>) -> Vec<BatchResult> {
    info!(jobs = jobs.len(), "starting batch");
    jobs.into_par_iter()
        .map(|job| BatchResult {
            result: simulate(&job.config, job.candles),
            label: job.label,
        })
        .collect()
}
