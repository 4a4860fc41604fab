pub mod feature_registry;

pub use feature_registry::{FEATURE_NAMES, FeatureVector, SCENARIO_PRECISION, round_to};
