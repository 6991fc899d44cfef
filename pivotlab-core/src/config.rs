//! Serializable simulation configuration (TOML).
//!
//! ```toml
//! initial_capital = 1000.0
//! position_fraction = 0.5
//! pyramiding = 1
//!
//! [strategy]
//! kind = "pivot_reversal"
//!
//! [strategy.params]
//! left_bars = 4
//! right_bars = 2
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::domain::Account;
use crate::strategy::{create_strategy, FactoryError, StrategyKind};

/// Upper bound for bar-count parameters (window widths, periods).
pub const MAX_BAR_PARAM: usize = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Strategy(#[from] FactoryError),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Strategy selection plus numeric parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub kind: String,
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
}

impl StrategyConfig {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: f64) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    /// Extract a named f64 parameter, falling back to `default`.
    pub fn param(&self, name: &str, default: f64) -> f64 {
        self.params.get(name).copied().unwrap_or(default)
    }

    /// Extract a named whole-number parameter in `min..=MAX_BAR_PARAM`,
    /// falling back to `default` when absent.
    pub fn param_usize(&self, name: &str, default: usize, min: usize) -> Result<usize, FactoryError> {
        let Some(&value) = self.params.get(name) else {
            return Ok(default);
        };
        let invalid = |reason: String| FactoryError::InvalidParam {
            name: name.to_string(),
            reason,
        };
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(invalid(format!("expected a whole number, got {value}")));
        }
        if value < min as f64 || value > MAX_BAR_PARAM as f64 {
            return Err(invalid(format!(
                "must be in {min}..={MAX_BAR_PARAM}, got {value}"
            )));
        }
        Ok(value as usize)
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self::new(StrategyKind::PivotReversal.as_str())
    }
}

/// Everything needed to reproduce one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub initial_capital: f64,
    /// Fraction of current capital committed per default-sized trade.
    pub position_fraction: f64,
    /// Maximum same-direction entries without an opposite exit.
    pub pyramiding: u32,
    pub strategy: StrategyConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_capital: 1000.0,
            position_fraction: 0.5,
            pyramiding: 1,
            strategy: StrategyConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Default settings with the given strategy.
    pub fn for_strategy(strategy: StrategyConfig) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capital.is_nan() || self.initial_capital <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "initial_capital must be positive, got {}",
                self.initial_capital
            )));
        }
        if !(self.position_fraction > 0.0 && self.position_fraction <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "position_fraction must be in (0, 1], got {}",
                self.position_fraction
            )));
        }
        if self.pyramiding == 0 {
            return Err(ConfigError::Invalid("pyramiding must be >= 1".into()));
        }

        // Building the strategy checks the name and every parameter range.
        create_strategy(&self.strategy)?;
        Ok(())
    }

    /// Fresh account for a run under this config.
    pub fn account(&self) -> Account {
        Account::new(
            self.initial_capital,
            self.position_fraction,
            self.pyramiding,
        )
    }
}
