//! Forecasting Workflow Facade
//!
//! Unified re-exports for the workflow module.
//!
//! # Example
//!
//! ```rust,no_run
//! use workflow_facade::{Pipeline, TrainRequest, WorkflowConfig};
//!
//! let config = WorkflowConfig::from_env().unwrap();
//! let mut pipeline = Pipeline::from_config(config);
//! let metrics = pipeline
//!     .run(&TrainRequest::new("air_passengers", "Prophet"))
//!     .unwrap();
//! println!("{}", metrics);
//! ```

// Re-export everything from SPI
pub use workflow_spi::*;

// Re-export everything from API
pub use workflow_api::*;

// Re-export everything from Core
pub use workflow_core::*;
