use crate::application::features::{FeatureDeriver, MIN_PRICE_BARS};
use crate::application::market_data::{BarRequest, PriceCache};
use crate::application::ml::{ModelSource, ReturnPredictor};
use crate::application::scenario::{Scenario, ScenarioAssembler};
use crate::domain::errors::PipelineError;
use crate::domain::market::PriceBar;
use crate::domain::ports::MarketDataService;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// One user action: a page render, optionally with a prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub symbol: String,
    pub predict: bool,
}

impl RenderRequest {
    pub fn render(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            predict: false,
        }
    }

    pub fn predict(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            predict: true,
        }
    }
}

/// Stage reached by a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    Idle,
    DataFetched,
    FeaturesComputed,
    ModelLoaded,
    Predicted,
    Error,
}

impl fmt::Display for RenderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelStatus {
    pub name: String,
    pub version: String,
    pub feature_order: Vec<String>,
}

impl ModelStatus {
    fn of(model: &dyn ReturnPredictor) -> Self {
        Self {
            name: model.name().to_string(),
            version: model.version().to_string(),
            feature_order: model.expected_feature_order().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Fractional next-day return of the close.
    pub expected_return: f64,
}

impl Prediction {
    pub fn percent_label(&self) -> String {
        format!("{:.2} %", self.expected_return * 100.0)
    }
}

/// Everything a render pass produced before it finished or halted.
#[derive(Debug)]
pub struct RenderOutcome {
    pub request: RenderRequest,
    pub stage: RenderStage,
    pub scenario: Option<Scenario>,
    pub model: Option<ModelStatus>,
    pub prediction: Option<Prediction>,
    pub error: Option<PipelineError>,
}

impl RenderOutcome {
    fn new(request: RenderRequest) -> Self {
        Self {
            request,
            stage: RenderStage::Idle,
            scenario: None,
            model: None,
            prediction: None,
            error: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.stage == RenderStage::Error
    }
}

/// Runs the whole fetch → derive → assemble → load → predict pipeline for a
/// single request. Owns the primary-ticker cache.
pub struct RenderHandler {
    market_data: Arc<dyn MarketDataService>,
    models: Arc<dyn ModelSource>,
    deriver: FeatureDeriver,
    assembler: ScenarioAssembler,
    cache: PriceCache,
    period: String,
    interval: String,
}

impl RenderHandler {
    pub fn new(
        market_data: Arc<dyn MarketDataService>,
        models: Arc<dyn ModelSource>,
        period: &str,
        interval: &str,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            deriver: FeatureDeriver::new(market_data.clone(), period, interval),
            market_data,
            models,
            assembler: ScenarioAssembler::new(),
            cache: PriceCache::new(cache_ttl),
            period: period.to_string(),
            interval: interval.to_string(),
        }
    }

    pub async fn handle(&mut self, request: RenderRequest) -> RenderOutcome {
        info!(
            "RenderHandler: {} (predict: {})",
            request.symbol, request.predict
        );
        let mut outcome = RenderOutcome::new(request);

        if let Err(e) = self.run(&mut outcome).await {
            warn!(
                "RenderHandler: halted after {} for {}: {}",
                outcome.stage, outcome.request.symbol, e
            );
            outcome.stage = RenderStage::Error;
            outcome.error = Some(e);
        }

        outcome
    }

    async fn run(&mut self, outcome: &mut RenderOutcome) -> Result<(), PipelineError> {
        let symbol = outcome.request.symbol.clone();

        let bars = self.primary_bars(&symbol).await;
        let Some(latest) = bars.last().filter(|_| bars.len() >= MIN_PRICE_BARS) else {
            return Err(PipelineError::InsufficientData {
                symbol,
                available: bars.len(),
                required: MIN_PRICE_BARS,
            });
        };
        let as_of = latest.date;
        outcome.stage = RenderStage::DataFetched;

        let features = self.deriver.derive(&symbol, &bars).await?;
        outcome.stage = RenderStage::FeaturesComputed;

        let scenario = self.assembler.assemble(&symbol, as_of, &features);
        outcome.scenario = Some(scenario.clone());

        let model = self.models.load()?;
        outcome.model = Some(ModelStatus::of(model.as_ref()));
        outcome.stage = RenderStage::ModelLoaded;

        if !outcome.request.predict {
            return Ok(());
        }

        let missing = scenario.missing_features();
        if !missing.is_empty() {
            return Err(PipelineError::MissingFeature { features: missing });
        }

        let row = scenario.model_row(model.expected_feature_order())?;
        let expected_return = model.predict(&row).map_err(PipelineError::Prediction)?;

        info!(
            "RenderHandler: {} expected return {:.4}%",
            symbol,
            expected_return * 100.0
        );
        outcome.prediction = Some(Prediction { expected_return });
        outcome.stage = RenderStage::Predicted;
        Ok(())
    }

    /// Primary bars, served from the cache while fresh. A failed fetch is
    /// reported as an empty history.
    async fn primary_bars(&mut self, symbol: &str) -> Vec<PriceBar> {
        let key = BarRequest::new(symbol, &self.period, &self.interval);
        if let Some(bars) = self.cache.get(&key) {
            return bars;
        }

        match self
            .market_data
            .get_daily_bars(symbol, &self.period, &self.interval)
            .await
        {
            Ok(bars) => {
                if !bars.is_empty() {
                    self.cache.insert(key, bars.clone());
                }
                bars
            }
            Err(e) => {
                warn!("RenderHandler: price fetch for {} failed: {}", symbol, e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_label_is_percent_with_two_decimals() {
        let p = Prediction {
            expected_return: 0.012_345,
        };
        assert_eq!(p.percent_label(), "1.23 %");

        let p = Prediction {
            expected_return: -0.0005,
        };
        assert_eq!(p.percent_label(), "-0.05 %");
    }

    #[test]
    fn test_request_constructors() {
        assert!(!RenderRequest::render("AAPL").predict);
        assert!(RenderRequest::predict("AAPL").predict);
    }
}
