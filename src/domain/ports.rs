use crate::domain::errors::MarketDataError;
use crate::domain::market::PriceBar;
use async_trait::async_trait;

// Need async_trait for async functions in trait objects
#[async_trait]
pub trait MarketDataService: Send + Sync {
    /// Daily bars for `symbol`, oldest first, rows with missing values removed.
    ///
    /// `period` and `interval` use provider notation (`"10d"`, `"1d"`).
    async fn get_daily_bars(
        &self,
        symbol: &str,
        period: &str,
        interval: &str,
    ) -> Result<Vec<PriceBar>, MarketDataError>;
}
