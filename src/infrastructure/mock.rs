//! In-memory doubles for the market data and model ports. Used by the
//! integration tests and for offline runs.

use crate::application::ml::{ModelSource, ReturnPredictor};
use crate::domain::errors::{MarketDataError, ModelLoadError};
use crate::domain::market::PriceBar;
use crate::domain::ml::FEATURE_NAMES;
use crate::domain::ports::MarketDataService;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Bars built from close prices, one per day from 2025-01-02.
pub fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap_or_default();
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| PriceBar {
            date: start + chrono::Duration::days(i as i64),
            open: *close,
            high: *close,
            low: *close,
            close: *close,
            volume: 1_000_000.0,
        })
        .collect()
}

#[derive(Default)]
pub struct MockMarketDataService {
    bars: Mutex<HashMap<String, Vec<PriceBar>>>,
    failing: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
}

impl MockMarketDataService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bars(self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.set_bars(symbol, bars);
        self
    }

    pub fn with_failure(self, symbol: &str) -> Self {
        if let Ok(mut failing) = self.failing.lock() {
            failing.insert(symbol.to_string());
        }
        self
    }

    pub fn clear_failure(&self, symbol: &str) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.remove(symbol);
        }
    }

    pub fn set_bars(&self, symbol: &str, bars: Vec<PriceBar>) {
        if let Ok(mut map) = self.bars.lock() {
            map.insert(symbol.to_string(), bars);
        }
    }

    /// Symbols requested so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self, symbol: &str) -> usize {
        self.calls().iter().filter(|s| s.as_str() == symbol).count()
    }
}

#[async_trait]
impl MarketDataService for MockMarketDataService {
    async fn get_daily_bars(
        &self,
        symbol: &str,
        _period: &str,
        _interval: &str,
    ) -> Result<Vec<PriceBar>, MarketDataError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(symbol.to_string());
        }

        let failing = self
            .failing
            .lock()
            .map(|f| f.contains(symbol))
            .unwrap_or(false);
        if failing {
            return Err(MarketDataError::Request {
                symbol: symbol.to_string(),
                reason: "mock failure".to_string(),
            });
        }

        Ok(self
            .bars
            .lock()
            .ok()
            .and_then(|map| map.get(symbol).cloned())
            .unwrap_or_default())
    }
}

/// Predictor returning a fixed value and recording every row it receives.
pub struct MockPredictor {
    output: f64,
    feature_order: Vec<String>,
    rows: Mutex<Vec<Vec<f64>>>,
}

impl MockPredictor {
    pub fn new(output: f64) -> Self {
        Self::with_order(output, FEATURE_NAMES)
    }

    pub fn with_order<S: AsRef<str>>(output: f64, order: &[S]) -> Self {
        Self {
            output,
            feature_order: order.iter().map(|s| s.as_ref().to_string()).collect(),
            rows: Mutex::new(Vec::new()),
        }
    }

    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.rows.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl ReturnPredictor for MockPredictor {
    fn predict(&self, row: &[f64]) -> Result<f64, String> {
        if let Ok(mut rows) = self.rows.lock() {
            rows.push(row.to_vec());
        }
        Ok(self.output)
    }

    fn expected_feature_order(&self) -> &[String] {
        &self.feature_order
    }

    fn name(&self) -> &str {
        "Mock Predictor"
    }

    fn version(&self) -> &str {
        "mock"
    }
}

/// Model source handing out a shared predictor, or failing every load.
pub struct MockModelSource {
    predictor: Option<Arc<MockPredictor>>,
    failure: Option<String>,
    loads: AtomicUsize,
}

impl MockModelSource {
    pub fn new(predictor: Arc<MockPredictor>) -> Self {
        Self {
            predictor: Some(predictor),
            failure: None,
            loads: AtomicUsize::new(0),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            predictor: None,
            failure: Some(reason.to_string()),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ModelSource for MockModelSource {
    fn load(&self) -> Result<Arc<dyn ReturnPredictor>, ModelLoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        match &self.predictor {
            Some(predictor) => Ok(predictor.clone()),
            None => Err(ModelLoadError::InvalidBundle {
                reason: self
                    .failure
                    .clone()
                    .unwrap_or_else(|| "no model".to_string()),
            }),
        }
    }
}
