//! Experiment Tracking Core
//!
//! Implementations of the tracking backend contract and the experiment
//! recorder:
//!
//! - [`FileStore`]: experiments and runs as directories of plain files
//! - [`InMemoryStore`]: process-local store for tests
//! - [`ExperimentRecorder`]: run lifecycle plus metric, parameter, table,
//!   figure and file logging

pub mod file_store;
pub mod memory_store;
pub mod recorder;

pub use file_store::FileStore;
pub use memory_store::InMemoryStore;
pub use recorder::ExperimentRecorder;

// Re-export SPI types
pub use tracking_spi::{Figure, Result, RunContext, RunStatus, Table, TrackingBackend, TrackingError};

// Re-export API types
pub use tracking_api::{TrackingConfig, TrackingConfigBuilder};
