//! Forecasting workflow core
//!
//! [`Trainer`] fits and records a single model, [`Pipeline`] drives a
//! request end to end and finalizes its tracking run.

pub mod pipeline;
pub mod plots;
pub mod trainer;

pub use pipeline::Pipeline;
pub use plots::ForecastPlot;
pub use trainer::{parse_model_kind, Trainer, TrainingRun, SAMPLE_ROWS};

pub use workflow_api::{WorkflowConfig, WorkflowConfigBuilder, DEFAULT_MODELS_DIR};
pub use workflow_spi::{Result, TrainOutcome, TrainRequest, WorkflowError};
