// Market data domain (bars, instrument catalog)
pub mod market;

// Feature schema shared with the model
pub mod ml;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
