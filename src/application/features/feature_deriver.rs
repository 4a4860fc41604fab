use crate::domain::errors::PipelineError;
use crate::domain::market::price_bar::closes;
use crate::domain::market::{MACRO_SERIES, MacroSeries, MacroTransform, PriceBar, RecentBars};
use crate::domain::ml::FeatureVector;
use crate::domain::ports::MarketDataService;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Bars required to compute the price features.
pub const MIN_PRICE_BARS: usize = 3;

/// Features computed from the selected instrument's own bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceFeatures {
    pub ret_precio_apertura: f64,
    pub ret_precio_maximo: f64,
    pub ret_precio_minimo: f64,
    pub ret_volumen: f64,
}

impl PriceFeatures {
    /// Opening return is same-day; high, low and volume are lagged one day.
    pub fn from_recent(bars: &RecentBars) -> Self {
        let RecentBars {
            today,
            yesterday,
            day_before,
        } = bars;

        let raw_volume = yesterday.volume / day_before.volume - 1.0;

        Self {
            ret_precio_apertura: today.open / yesterday.open - 1.0,
            ret_precio_maximo: yesterday.high / day_before.high - 1.0,
            ret_precio_minimo: yesterday.low / day_before.low - 1.0,
            ret_volumen: log_volume_change(raw_volume),
        }
    }
}

/// `ln(1 + raw)` when defined, 0.0 otherwise (raw <= -1 or NaN).
pub fn log_volume_change(raw: f64) -> f64 {
    if raw > -1.0 { raw.ln_1p() } else { 0.0 }
}

/// Latest defined percentage change of a close series.
pub fn latest_pct_change(closes: &[f64]) -> Option<f64> {
    closes
        .windows(2)
        .map(|w| w[1] / w[0] - 1.0)
        .filter(|v| !v.is_nan())
        .last()
}

/// Latest defined day-over-day difference of a close series.
pub fn latest_difference(closes: &[f64]) -> Option<f64> {
    closes
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|v| !v.is_nan())
        .last()
}

/// Computes the full feature vector for one render.
pub struct FeatureDeriver {
    market_data: Arc<dyn MarketDataService>,
    period: String,
    interval: String,
}

impl FeatureDeriver {
    pub fn new(market_data: Arc<dyn MarketDataService>, period: &str, interval: &str) -> Self {
        Self {
            market_data,
            period: period.to_string(),
            interval: interval.to_string(),
        }
    }

    /// Derives all ten features from the primary `bars` (oldest first) plus
    /// one fresh fetch per macro series.
    pub async fn derive(
        &self,
        symbol: &str,
        bars: &[PriceBar],
    ) -> Result<FeatureVector, PipelineError> {
        let recent =
            RecentBars::from_history(bars).ok_or_else(|| PipelineError::InsufficientData {
                symbol: symbol.to_string(),
                available: bars.len(),
                required: MIN_PRICE_BARS,
            })?;

        let price = PriceFeatures::from_recent(&recent);
        let mut features = FeatureVector {
            ret_precio_apertura: price.ret_precio_apertura,
            ret_precio_maximo: price.ret_precio_maximo,
            ret_precio_minimo: price.ret_precio_minimo,
            ret_volumen: price.ret_volumen,
            ..Default::default()
        };

        for series in &MACRO_SERIES {
            let value = self.macro_value(series).await;
            features.set(series.feature, value)?;
        }

        info!(
            "FeatureDeriver: {} features ready (as of {})",
            symbol, recent.today.date
        );
        Ok(features)
    }

    /// Latest transformed value of a macro series. Any gap (fetch failure,
    /// too little history or only undefined changes) yields 0.0 and a warning.
    async fn macro_value(&self, series: &MacroSeries) -> f64 {
        let bars = match self
            .market_data
            .get_daily_bars(series.symbol, &self.period, &self.interval)
            .await
        {
            Ok(bars) => bars,
            Err(e) => {
                warn!(
                    "FeatureDeriver: {} unavailable ({}), using 0.0 for {}",
                    series.symbol, e, series.feature
                );
                return 0.0;
            }
        };

        let series_closes = closes(&bars);
        let latest = match series.transform {
            MacroTransform::PercentChange => latest_pct_change(&series_closes),
            MacroTransform::Difference => latest_difference(&series_closes),
        };
        let Some(value) = latest else {
            warn!(
                "FeatureDeriver: {} has no defined change in {} bars, using 0.0 for {}",
                series.symbol,
                bars.len(),
                series.feature
            );
            return 0.0;
        };

        debug!("FeatureDeriver: {} = {:.6} ({})", series.feature, value, series.symbol);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(day: u32, open: f64, high: f64, low: f64, volume: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            open,
            high,
            low,
            close: open,
            volume,
        }
    }

    fn recent(volumes: (f64, f64)) -> RecentBars {
        RecentBars {
            day_before: bar(2, 100.0, 200.0, 50.0, volumes.0),
            yesterday: bar(3, 100.0, 210.0, 45.0, volumes.1),
            today: bar(4, 110.0, 1.0, 1.0, 1.0),
        }
    }

    #[test]
    fn test_price_ratios() {
        let f = PriceFeatures::from_recent(&recent((1_000.0, 1_500.0)));
        assert!((f.ret_precio_apertura - 0.10).abs() < 1e-12);
        assert!((f.ret_precio_maximo - 0.05).abs() < 1e-12);
        assert!((f.ret_precio_minimo + 0.10).abs() < 1e-12);
        assert!((f.ret_volumen - 1.5f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_volume_drop_to_zero_is_neutral() {
        // raw = 0 / 1000 - 1 = -1
        let f = PriceFeatures::from_recent(&recent((1_000.0, 0.0)));
        assert_eq!(f.ret_volumen, 0.0);
    }

    #[test]
    fn test_log_volume_change_boundaries() {
        assert_eq!(log_volume_change(-1.0), 0.0);
        assert_eq!(log_volume_change(-1.5), 0.0);
        assert_eq!(log_volume_change(f64::NAN), 0.0);
        assert_eq!(log_volume_change(0.0), 0.0);
        assert!((log_volume_change(-0.5) - 0.5f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_latest_pct_change() {
        let change = latest_pct_change(&[100.0, 102.0, 99.96]).unwrap();
        assert!((change + 0.02).abs() < 1e-12);
        assert_eq!(latest_pct_change(&[100.0]), None);
        assert_eq!(latest_pct_change(&[]), None);
    }

    #[test]
    fn test_latest_pct_change_skips_undefined_values() {
        // 0/0 is NaN and dropped, so the previous change is the latest one
        let change = latest_pct_change(&[100.0, 0.0, 0.0]).unwrap();
        assert!((change + 1.0).abs() < 1e-12);
        // Only 0/0 changes: nothing defined
        assert_eq!(latest_pct_change(&[0.0, 0.0, 0.0]), None);
    }

    #[test]
    fn test_latest_difference() {
        let diff = latest_difference(&[4.10, 4.25, 4.20]).unwrap();
        assert!((diff + 0.05).abs() < 1e-12);
        assert_eq!(latest_difference(&[4.10]), None);
    }

    #[tokio::test]
    async fn test_undefined_macro_changes_fall_back_to_zero() {
        use crate::infrastructure::mock::{MockMarketDataService, bars_from_closes};

        let service = MockMarketDataService::new()
            .with_bars("^GSPC", bars_from_closes(&[0.0, 0.0, 0.0]))
            .with_bars("CL=F", bars_from_closes(&[80.0, 88.0]));
        let deriver = FeatureDeriver::new(Arc::new(service), "10d", "1d");
        let history = vec![
            bar(2, 100.0, 200.0, 50.0, 1_000.0),
            bar(3, 100.0, 210.0, 45.0, 1_000.0),
            bar(4, 110.0, 1.0, 1.0, 1.0),
        ];

        let features = deriver.derive("AAPL", &history).await.unwrap();
        assert_eq!(features.sp500, 0.0);
        assert!((features.ret_petroleo_usd - 0.10).abs() < 1e-12);
        assert_eq!(features.ret_cobre_usd, 0.0);
    }
}
