pub mod card;
pub mod metrics;

pub use card::{Card, Tone};
