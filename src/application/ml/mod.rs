pub mod predictor;
pub mod smartcore_predictor;

pub use predictor::{ModelSource, ReturnPredictor};
pub use smartcore_predictor::{ModelBundle, SmartCoreModelLoader, SmartCorePredictor};
