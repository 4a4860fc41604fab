use crate::domain::errors::ModelLoadError;
use std::sync::Arc;

/// Interface for pretrained return models
pub trait ReturnPredictor: Send + Sync {
    /// Predict the next-day fractional return for one row.
    /// `row` is ordered per `expected_feature_order`.
    fn predict(&self, row: &[f64]) -> Result<f64, String>;

    /// Feature names in the order the model was trained with
    fn expected_feature_order(&self) -> &[String];

    /// Get model name/type
    fn name(&self) -> &str;

    /// Get model version/id
    fn version(&self) -> &str;
}

/// Produces a ready predictor. Invoked once per render; there is no
/// process-wide model cache.
pub trait ModelSource: Send + Sync {
    fn load(&self) -> Result<Arc<dyn ReturnPredictor>, ModelLoadError>;
}
