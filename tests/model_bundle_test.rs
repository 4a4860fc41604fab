use returncast::application::ml::smartcore_predictor::ForestModel;
use returncast::application::ml::{ModelBundle, ModelSource, SmartCoreModelLoader};
use returncast::domain::errors::ModelLoadError;
use returncast::domain::ml::FEATURE_NAMES;
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("returncast_{}_{}.json", std::process::id(), name))
}

fn constant_forest(target: f64) -> ForestModel {
    let x: Vec<Vec<f64>> = (0..30)
        .map(|i| (0..FEATURE_NAMES.len()).map(|j| ((i + j) % 7) as f64).collect())
        .collect();
    let y = vec![target; x.len()];
    let matrix = DenseMatrix::from_2d_vec(&x).unwrap();
    let params = RandomForestRegressorParameters::default()
        .with_n_trees(2)
        .with_max_depth(2);
    RandomForestRegressor::fit(&matrix, &y, params).unwrap()
}

#[test]
fn test_missing_file() {
    let loader = SmartCoreModelLoader::new(temp_path("does_not_exist"));
    assert!(matches!(loader.load(), Err(ModelLoadError::NotFound { .. })));
}

#[test]
fn test_corrupt_json() {
    let path = temp_path("corrupt");
    std::fs::write(&path, b"{ not json").unwrap();

    let result = SmartCoreModelLoader::new(path.clone()).load();
    assert!(matches!(result, Err(ModelLoadError::Corrupt { .. })));
    let _ = std::fs::remove_file(path);
}

#[test]
fn test_bundle_without_model_key() {
    let path = temp_path("no_model");
    std::fs::write(&path, br#"{"feature_names": ["sp500"]}"#).unwrap();

    let result = SmartCoreModelLoader::new(path.clone()).load();
    match result {
        Err(ModelLoadError::Corrupt { source, .. }) => {
            assert!(source.to_string().contains("model"));
        }
        other => panic!("unexpected result: {:?}", other.err()),
    }
    let _ = std::fs::remove_file(path);
}

#[test]
fn test_unknown_feature_name_rejected() {
    let path = temp_path("bad_names");
    let mut bundle = ModelBundle::new(constant_forest(0.0), 2);
    bundle.feature_names = Some(vec!["sp500".into(), "ret_oro_usd".into()]);
    std::fs::write(&path, serde_json::to_vec(&bundle).unwrap()).unwrap();

    let result = SmartCoreModelLoader::new(path.clone()).load();
    assert!(matches!(result, Err(ModelLoadError::InvalidBundle { .. })));
    let _ = std::fs::remove_file(path);
}

#[test]
fn test_subset_of_features_rejected_at_load() {
    let path = temp_path("subset");
    let mut bundle = ModelBundle::new(constant_forest(0.0), 2);
    bundle.feature_names = Some(vec!["sp500".into(), "ret_volumen".into()]);
    std::fs::write(&path, serde_json::to_vec(&bundle).unwrap()).unwrap();

    let result = SmartCoreModelLoader::new(path.clone()).load();
    match result {
        Err(ModelLoadError::InvalidBundle { reason }) => {
            assert!(reason.contains("ret_precio_apertura"));
        }
        other => panic!("unexpected result: {:?}", other.err()),
    }
    let _ = std::fs::remove_file(path);
}

#[test]
fn test_declared_width_must_match_schema() {
    let path = temp_path("width");
    let bundle = ModelBundle::new(constant_forest(0.0), 12);
    std::fs::write(&path, serde_json::to_vec(&bundle).unwrap()).unwrap();

    let result = SmartCoreModelLoader::new(path.clone()).load();
    assert!(matches!(result, Err(ModelLoadError::InvalidBundle { .. })));
    let _ = std::fs::remove_file(path);
}

#[test]
fn test_bundle_without_width_is_corrupt() {
    let path = temp_path("no_width");
    let bundle = ModelBundle::new(constant_forest(0.0), FEATURE_NAMES.len());
    let mut value = serde_json::to_value(&bundle).unwrap();
    value.as_object_mut().unwrap().remove("n_features");
    std::fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();

    let result = SmartCoreModelLoader::new(path.clone()).load();
    assert!(matches!(result, Err(ModelLoadError::Corrupt { .. })));
    let _ = std::fs::remove_file(path);
}

#[test]
fn test_valid_bundle_round_trip() {
    let path = temp_path("valid");
    let mut order: Vec<String> = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
    order.rotate_left(3);

    let mut bundle = ModelBundle::new(constant_forest(0.015), FEATURE_NAMES.len());
    bundle.feature_names = Some(order.clone());
    bundle.name = Some("Forest".to_string());
    bundle.version = Some("2025.1".to_string());
    std::fs::write(&path, serde_json::to_vec(&bundle).unwrap()).unwrap();

    let model = SmartCoreModelLoader::new(path.clone()).load().unwrap();
    assert_eq!(model.expected_feature_order(), order.as_slice());
    assert_eq!(model.name(), "Forest");
    assert_eq!(model.version(), "2025.1");

    let pred = model.predict(&[1.0; 10]).unwrap();
    assert!((pred - 0.015).abs() < 1e-12);
    let _ = std::fs::remove_file(path);
}
