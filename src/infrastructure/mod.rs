pub mod core;
pub mod mock;
pub mod yahoo;
