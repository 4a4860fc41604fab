pub mod handler;

pub use handler::{
    ModelStatus, Prediction, RenderHandler, RenderOutcome, RenderRequest, RenderStage,
};
