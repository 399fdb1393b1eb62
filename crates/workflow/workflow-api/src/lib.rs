//! Workflow API
//!
//! Configuration of the trainer and pipeline driver.

pub mod config;

pub use config::{WorkflowConfig, WorkflowConfigBuilder, DEFAULT_MODELS_DIR};
