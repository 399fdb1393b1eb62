//! Workflow Service Provider Interface
//!
//! Types shared by the trainer, the pipeline driver and the CLI.

pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use error::{Result, WorkflowError};
pub use model::{TrainOutcome, TrainRequest};
