use crate::domain::errors::MarketDataError;
use crate::domain::market::PriceBar;
use chrono::DateTime;
use serde::Deserialize;

// ===== Chart endpoint payload =====

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartMeta {
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteBlock>,
}

/// Column-wise OHLCV; any cell may be null.
#[derive(Debug, Default, Deserialize)]
pub struct QuoteBlock {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

impl ChartResponse {
    /// Flattens the nested payload to daily bars: first result, first quote
    /// block, rows with any missing cell dropped, sorted oldest first.
    pub fn into_price_bars(self, symbol: &str) -> Result<Vec<PriceBar>, MarketDataError> {
        if let Some(error) = self.chart.error {
            return Err(MarketDataError::Provider {
                symbol: symbol.to_string(),
                code: error.code,
                description: error.description,
            });
        }

        let Some(result) = self.chart.result.and_then(|r| r.into_iter().next()) else {
            return Ok(Vec::new());
        };
        let Some(quote) = result.indicators.quote.into_iter().next() else {
            return Ok(Vec::new());
        };

        let cell = |column: &[Option<f64>], i: usize| column.get(i).copied().flatten();

        let mut bars = Vec::with_capacity(result.timestamp.len());
        for (i, ts) in result.timestamp.iter().enumerate() {
            let Some(date) =
                DateTime::from_timestamp(ts + result.meta.gmtoffset, 0).map(|dt| dt.date_naive())
            else {
                return Err(MarketDataError::InvalidData {
                    symbol: symbol.to_string(),
                    reason: format!("timestamp {} out of range", ts),
                });
            };

            if let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = (
                cell(&quote.open, i),
                cell(&quote.high, i),
                cell(&quote.low, i),
                cell(&quote.close, i),
                cell(&quote.volume, i),
            ) {
                let bar = PriceBar {
                    date,
                    open,
                    high,
                    low,
                    close,
                    volume,
                };
                if bar.is_complete() {
                    bars.push(bar);
                }
            }
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}
