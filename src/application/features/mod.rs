pub mod feature_deriver;

pub use feature_deriver::{FeatureDeriver, MIN_PRICE_BARS, PriceFeatures};
