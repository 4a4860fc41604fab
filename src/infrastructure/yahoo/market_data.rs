use super::common::ChartResponse;
use crate::config::MarketDataEnvConfig;
use crate::domain::errors::MarketDataError;
use crate::domain::market::PriceBar;
use crate::domain::ports::MarketDataService;
use crate::infrastructure::core::http_client_factory::{
    HttpClientFactory, build_url_with_query, encode_component,
};
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use tracing::{debug, info};

/// Daily bars from the Yahoo Finance chart endpoint. One request per call,
/// nothing cached here.
pub struct YahooMarketDataService {
    client: ClientWithMiddleware,
    base_url: String,
}

impl YahooMarketDataService {
    pub fn new(client: ClientWithMiddleware, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &MarketDataEnvConfig) -> Self {
        let client =
            HttpClientFactory::create_client(config.http_timeout(), config.http_max_retries);
        Self::new(client, config.base_url.clone())
    }

    fn chart_url(&self, symbol: &str, period: &str, interval: &str) -> String {
        build_url_with_query(
            &format!("{}/{}", self.base_url, encode_component(symbol)),
            &[("range", period), ("interval", interval)],
        )
    }
}

#[async_trait]
impl MarketDataService for YahooMarketDataService {
    async fn get_daily_bars(
        &self,
        symbol: &str,
        period: &str,
        interval: &str,
    ) -> Result<Vec<PriceBar>, MarketDataError> {
        let url = self.chart_url(symbol, period, interval);
        debug!("YahooMarketDataService: GET {}", url);

        let request_error = |reason: String| MarketDataError::Request {
            symbol: symbol.to_string(),
            reason,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| request_error(e.to_string()))?;

        // The endpoint reports unknown symbols as 404 with a regular chart
        // error body, so the body is parsed before looking at the status.
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| request_error(e.to_string()))?;

        let chart: ChartResponse = serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                MarketDataError::InvalidData {
                    symbol: symbol.to_string(),
                    reason: e.to_string(),
                }
            } else {
                request_error(format!("HTTP {}", status))
            }
        })?;

        let bars = chart.into_price_bars(symbol)?;
        info!(
            "YahooMarketDataService: {} bars for {} ({} / {})",
            bars.len(),
            symbol,
            period,
            interval
        );
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_chart_url_encodes_symbol() {
        let service = YahooMarketDataService::new(
            HttpClientFactory::create_client(Duration::from_secs(5), 0),
            "https://query1.finance.yahoo.com/v8/finance/chart/",
        );
        assert_eq!(
            service.chart_url("^TNX", "10d", "1d"),
            "https://query1.finance.yahoo.com/v8/finance/chart/%5ETNX?range=10d&interval=1d"
        );
    }
}
