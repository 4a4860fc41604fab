//! Market data configuration parsing from environment variables.
//!
//! Covers the provider endpoint, the bar request shape, the primary-ticker
//! cache and the HTTP client.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Market data environment configuration
#[derive(Debug, Clone)]
pub struct MarketDataEnvConfig {
    pub base_url: String,
    pub lookback_period: String,
    pub bar_interval: String,
    pub price_cache_ttl_secs: u64,
    pub http_timeout_secs: u64,
    pub http_max_retries: u32,
}

impl Default for MarketDataEnvConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            lookback_period: "10d".to_string(),
            bar_interval: "1d".to_string(),
            price_cache_ttl_secs: 3600,
            http_timeout_secs: 30,
            http_max_retries: 0,
        }
    }
}

impl MarketDataEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            base_url: env::var("MARKET_DATA_BASE_URL").unwrap_or(defaults.base_url),
            lookback_period: env::var("LOOKBACK_PERIOD").unwrap_or(defaults.lookback_period),
            bar_interval: env::var("BAR_INTERVAL").unwrap_or(defaults.bar_interval),
            price_cache_ttl_secs: parse_var("PRICE_CACHE_TTL_SECS", defaults.price_cache_ttl_secs)?,
            http_timeout_secs: parse_var("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?,
            http_max_retries: parse_var("HTTP_MAX_RETRIES", defaults.http_max_retries)?,
        })
    }

    pub fn price_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.price_cache_ttl_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid {}: '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}
