use crate::domain::errors::FeatureError;
use crate::domain::ml::FeatureVector;
use crate::domain::ml::feature_registry::SCENARIO_PRECISION;
use chrono::NaiveDate;
use serde::Serialize;

/// A market scenario: the rounded single-row feature record shown to the user
/// and handed to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    pub symbol: String,
    pub as_of: NaiveDate,
    pub features: FeatureVector,
}

impl Scenario {
    pub fn missing_features(&self) -> Vec<&'static str> {
        self.features.missing_features()
    }

    /// Feature values reordered for a model's expected schema.
    pub fn model_row<S: AsRef<str>>(&self, order: &[S]) -> Result<Vec<f64>, FeatureError> {
        self.features.reindex(order)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScenarioAssembler {
    precision: i32,
}

impl Default for ScenarioAssembler {
    fn default() -> Self {
        Self {
            precision: SCENARIO_PRECISION,
        }
    }
}

impl ScenarioAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assemble(&self, symbol: &str, as_of: NaiveDate, features: &FeatureVector) -> Scenario {
        Scenario {
            symbol: symbol.to_string(),
            as_of,
            features: features.rounded(self.precision),
        }
    }
}
