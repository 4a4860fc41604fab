pub mod assembler;

pub use assembler::{Scenario, ScenarioAssembler};
