//! Error types for the training workflow.

mod workflow_error;

pub use workflow_error::{Result, WorkflowError};
