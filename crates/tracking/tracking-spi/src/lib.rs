//! Experiment Tracking Service Provider Interface
//!
//! Defines the run context passed between recorder operations, the records
//! a run accumulates, the error type and the backend contract.
//!
//! - [`TrackingBackend`]: persistence of experiments, runs and their records
//! - [`Figure`]: anything that can render itself to an image file
//! - [`RunContext`]: explicit handle to one run, in place of global state

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{Figure, TrackingBackend};
pub use error::{Result, TrackingError};
pub use model::{RunContext, RunStatus, Table};
