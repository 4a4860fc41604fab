// Price history caching
pub mod market_data;

// Feature derivation from price and macro series
pub mod features;

// Scenario assembly (rounded model input)
pub mod scenario;

// Model loading and prediction seam
pub mod ml;

// Per-request pipeline
pub mod render;

// Worker orchestration and UI session
pub mod session;
pub mod system;
