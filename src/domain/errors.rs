use std::path::PathBuf;
use thiserror::Error;

/// Errors related to market data retrieval
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("Request for {symbol} failed: {reason}")]
    Request { symbol: String, reason: String },

    #[error("Provider error for {symbol}: {code} - {description}")]
    Provider {
        symbol: String,
        code: String,
        description: String,
    },

    #[error("Invalid market data for {symbol}: {reason}")]
    InvalidData { symbol: String, reason: String },
}

/// Errors related to the feature schema
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("Unknown feature: {name}")]
    UnknownFeature { name: String },
}

/// Errors raised while loading the persisted model bundle
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("Model file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read model file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to deserialize model bundle {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid model bundle: {reason}")]
    InvalidBundle { reason: String },
}

/// Terminal errors of a render pass. Each one halts the pass where it is
/// detected.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Not enough price data for {symbol}: {available} valid bars, need at least {required}")]
    InsufficientData {
        symbol: String,
        available: usize,
        required: usize,
    },

    #[error("Scenario has missing values ({}). Cannot predict.", .features.join(", "))]
    MissingFeature { features: Vec<&'static str> },

    #[error(transparent)]
    ModelLoad(#[from] ModelLoadError),

    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error("Prediction failed: {0}")]
    Prediction(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_formatting() {
        let error = PipelineError::InsufficientData {
            symbol: "AAPL".to_string(),
            available: 2,
            required: 3,
        };

        let msg = error.to_string();
        assert!(msg.contains("AAPL"));
        assert!(msg.contains("2 valid bars"));
        assert!(msg.contains("at least 3"));
    }

    #[test]
    fn test_missing_feature_lists_names() {
        let error = PipelineError::MissingFeature {
            features: vec!["sp500", "ret_volumen"],
        };
        assert_eq!(
            error.to_string(),
            "Scenario has missing values (sp500, ret_volumen). Cannot predict."
        );
    }

    #[test]
    fn test_model_load_error_is_shown_raw() {
        let error: PipelineError = ModelLoadError::NotFound {
            path: PathBuf::from("data/ml/missing.json"),
        }
        .into();
        assert_eq!(error.to_string(), "Model file not found: data/ml/missing.json");
    }
}
