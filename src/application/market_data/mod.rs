pub mod price_cache;

pub use price_cache::{BarRequest, PriceCache};
