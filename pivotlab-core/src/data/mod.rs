//! Candle sources: timeframe strings and saved provider responses.

pub mod histo;
pub mod timeframe;

use thiserror::Error;

pub use histo::{load_csv, load_histo_json, parse_csv, parse_histo_json};
pub use timeframe::{Timeframe, TimeUnit};

#[derive(Debug, Error)]
pub enum DataError {
    #[error("read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed candle JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed candle CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("unsupported timeframe '{0}' (expected e.g. 15m, 1h, 1D, 1W)")]
    BadTimeframe(String),

    #[error("data set contains no candles")]
    Empty,
}
