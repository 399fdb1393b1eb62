//! Algorithm Service Provider Interface
//!
//! Defines core traits, error types and shared model types for the
//! forecasting algorithms used by the experiment workflow.
//!
//! - [`Predictor`]: value-only fit/predict contract (ARIMA family)
//! - [`Forecaster`]: timestamp-aware contract every model kind implements
//! - [`TsError`]: standardized error type for all algorithm operations
//! - [`ModelKind`], [`HyperparameterSet`], [`MetricsReport`]: data passed
//!   between the factory, the search and the evaluator

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{Forecaster, Predictor};
pub use error::{Result, TsError};
pub use model::{HyperparameterSet, MetricsReport, ModelKind};

/// Timestamp type used for the feature column of every series.
pub type Timestamp = chrono::NaiveDateTime;
