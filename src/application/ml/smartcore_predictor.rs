use super::predictor::{ModelSource, ReturnPredictor};
use crate::domain::errors::ModelLoadError;
use crate::domain::ml::feature_registry::FEATURE_NAMES;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

pub type ForestModel = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Persisted model bundle. `model` and `n_features` (the column count the
/// forest was fitted on) are required; `feature_names` falls back to the
/// schema order when absent.
#[derive(Serialize, Deserialize)]
pub struct ModelBundle {
    pub model: ForestModel,
    pub n_features: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ModelBundle {
    pub fn new(model: ForestModel, n_features: usize) -> Self {
        Self {
            model,
            n_features,
            feature_names: None,
            name: None,
            version: None,
        }
    }

    /// Reads and deserializes a bundle from disk.
    pub fn read(path: &Path) -> Result<Self, ModelLoadError> {
        if !path.exists() {
            return Err(ModelLoadError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let buffer = std::fs::read(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_slice(&buffer).map_err(|source| ModelLoadError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
    }
}

pub struct SmartCorePredictor {
    model: ForestModel,
    feature_names: Vec<String>,
    name: String,
    version: String,
}

impl SmartCorePredictor {
    pub fn from_bundle(bundle: ModelBundle) -> Result<Self, ModelLoadError> {
        let feature_names = match bundle.feature_names {
            Some(names) => validate_feature_names(names)?,
            None => FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
        };

        if bundle.n_features != feature_names.len() {
            return Err(ModelLoadError::InvalidBundle {
                reason: format!(
                    "model was fitted on {} features, bundle lists {}",
                    bundle.n_features,
                    feature_names.len()
                ),
            });
        }

        Ok(Self {
            model: bundle.model,
            feature_names,
            name: bundle
                .name
                .unwrap_or_else(|| "SmartCore Random Forest".to_string()),
            version: bundle.version.unwrap_or_else(|| "v1.0".to_string()),
        })
    }
}

/// The model must consume every schema feature exactly once, in any order.
fn validate_feature_names(names: Vec<String>) -> Result<Vec<String>, ModelLoadError> {
    let mut seen = HashSet::new();
    for name in &names {
        if !FEATURE_NAMES.contains(&name.as_str()) {
            return Err(ModelLoadError::InvalidBundle {
                reason: format!("model expects unknown feature '{}'", name),
            });
        }
        if !seen.insert(name.as_str()) {
            return Err(ModelLoadError::InvalidBundle {
                reason: format!("feature '{}' listed twice", name),
            });
        }
    }

    let missing: Vec<&str> = FEATURE_NAMES
        .iter()
        .copied()
        .filter(|name| !seen.contains(name))
        .collect();
    if !missing.is_empty() {
        return Err(ModelLoadError::InvalidBundle {
            reason: format!("feature_names lacks {}", missing.join(", ")),
        });
    }

    Ok(names)
}

impl ReturnPredictor for SmartCorePredictor {
    fn predict(&self, row: &[f64]) -> Result<f64, String> {
        if row.len() != self.feature_names.len() {
            return Err(format!(
                "Expected {} features, got {}",
                self.feature_names.len(),
                row.len()
            ));
        }

        let input_matrix = DenseMatrix::from_2d_vec(&vec![row.to_vec()])
            .map_err(|e| format!("Matrix creation failed: {}", e))?;

        // smartcore indexes the row without bounds checks of its own
        let predictions = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.model.predict(&input_matrix)
        }))
        .map_err(|_| "Model panicked while predicting".to_string())?
        .map_err(|e| format!("Prediction failed: {}", e))?;

        predictions
            .first()
            .copied()
            .ok_or_else(|| "No prediction returned".to_string())
    }

    fn expected_feature_order(&self) -> &[String] {
        &self.feature_names
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }
}

/// Loads the bundle from a fixed path on every call.
pub struct SmartCoreModelLoader {
    model_path: PathBuf,
}

impl SmartCoreModelLoader {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
        }
    }
}

impl ModelSource for SmartCoreModelLoader {
    fn load(&self) -> Result<Arc<dyn ReturnPredictor>, ModelLoadError> {
        let result = ModelBundle::read(&self.model_path).and_then(SmartCorePredictor::from_bundle);
        match result {
            Ok(predictor) => {
                info!(
                    "Loaded model '{}' ({}) from {:?}",
                    predictor.name(),
                    predictor.version(),
                    self.model_path
                );
                Ok(Arc::new(predictor))
            }
            Err(e) => {
                error!("Failed to load model: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartcore::ensemble::random_forest_regressor::RandomForestRegressorParameters;

    fn constant_forest(target: f64) -> ForestModel {
        let x: Vec<Vec<f64>> = (0..20)
            .map(|i| (0..FEATURE_NAMES.len()).map(|j| (i * j) as f64 * 0.01).collect())
            .collect();
        let y = vec![target; x.len()];
        let x_matrix = DenseMatrix::from_2d_vec(&x).unwrap();
        let params = RandomForestRegressorParameters::default()
            .with_n_trees(3)
            .with_max_depth(3);
        RandomForestRegressor::fit(&x_matrix, &y, params).unwrap()
    }

    #[test]
    fn test_default_feature_order_is_schema() {
        let predictor = SmartCorePredictor::from_bundle(ModelBundle::new(constant_forest(0.0), 10))
            .unwrap();
        assert_eq!(predictor.expected_feature_order(), FEATURE_NAMES);
        assert_eq!(predictor.name(), "SmartCore Random Forest");
    }

    #[test]
    fn test_predicts_constant_target() {
        let predictor = SmartCorePredictor::from_bundle(ModelBundle::new(constant_forest(0.02), 10))
            .unwrap();
        let pred = predictor.predict(&[0.0; 10]).unwrap();
        assert!((pred - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_wrong_row_length() {
        let predictor = SmartCorePredictor::from_bundle(ModelBundle::new(constant_forest(0.0), 10))
            .unwrap();
        let err = predictor.predict(&[0.0; 3]).unwrap_err();
        assert!(err.contains("Expected 10 features"));
    }

    #[test]
    fn test_invalid_feature_names() {
        let mut bundle = ModelBundle::new(constant_forest(0.0), 10);
        bundle.feature_names = Some(vec!["sp500".into(), "sp500".into()]);
        assert!(matches!(
            SmartCorePredictor::from_bundle(bundle),
            Err(ModelLoadError::InvalidBundle { .. })
        ));

        let mut bundle = ModelBundle::new(constant_forest(0.0), 10);
        bundle.feature_names = Some(vec!["rsi".into()]);
        let err = SmartCorePredictor::from_bundle(bundle).err().unwrap();
        assert!(err.to_string().contains("rsi"));

        let mut bundle = ModelBundle::new(constant_forest(0.0), 10);
        bundle.feature_names = Some(Vec::new());
        assert!(SmartCorePredictor::from_bundle(bundle).is_err());
    }

    #[test]
    fn test_partial_feature_list_is_rejected() {
        let mut bundle = ModelBundle::new(constant_forest(0.0), 2);
        bundle.feature_names = Some(vec!["sp500".into(), "ret_volumen".into()]);
        let err = SmartCorePredictor::from_bundle(bundle).err().unwrap();
        assert!(err.to_string().contains("lacks"));
    }

    #[test]
    fn test_width_mismatch_is_rejected() {
        let bundle = ModelBundle::new(constant_forest(0.0), 12);
        let err = SmartCorePredictor::from_bundle(bundle).err().unwrap();
        assert!(matches!(err, ModelLoadError::InvalidBundle { .. }));
        assert!(err.to_string().contains("12"));
    }

    #[test]
    fn test_forest_reading_past_the_row_is_an_error() {
        // Only the last of 12 columns varies, so every split reads column 11
        let x: Vec<Vec<f64>> = (0..30)
            .map(|i| {
                let mut row = vec![1.0; 12];
                row[11] = i as f64;
                row
            })
            .collect();
        let y: Vec<f64> = (0..30).map(|i| i as f64 * 0.001).collect();
        let x_matrix = DenseMatrix::from_2d_vec(&x).unwrap();
        let params = RandomForestRegressorParameters::default()
            .with_n_trees(3)
            .with_max_depth(3)
            .with_m(12);
        let forest = RandomForestRegressor::fit(&x_matrix, &y, params).unwrap();

        // Declared width is wrong; the guard must turn the out-of-range
        // read into an error instead of unwinding through the caller.
        let predictor = SmartCorePredictor::from_bundle(ModelBundle::new(forest, 10)).unwrap();
        let err = predictor.predict(&[0.0; 10]).unwrap_err();
        assert!(err.contains("panicked"));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let loader = SmartCoreModelLoader::new("does/not/exist.json");
        assert!(matches!(loader.load(), Err(ModelLoadError::NotFound { .. })));
    }
}
