//! Configuration module for Returncast.
//!
//! This module provides structured configuration loading from environment
//! variables (a `.env` file is honored by the binaries), organized by
//! concern: market data and model.

mod market_data_config;
mod model_config;

pub use market_data_config::{DEFAULT_BASE_URL, MarketDataEnvConfig};
pub use model_config::{DEFAULT_MODEL_PATH, ModelEnvConfig};

use anyhow::{Context, Result};

/// Main application configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub market_data: MarketDataEnvConfig,
    pub model: ModelEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let market_data =
            MarketDataEnvConfig::from_env().context("Failed to load market data config")?;
        let model = ModelEnvConfig::from_env();

        Ok(Self { market_data, model })
    }
}
