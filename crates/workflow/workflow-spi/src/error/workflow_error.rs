//! Workflow error type.

use algorithm_spi::TsError;
use data_spi::DatasetError;
use thiserror::Error;
use tracking_spi::TrackingError;
use tuning_spi::TuningError;

/// Errors raised while training and recording a model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkflowError {
    /// Model kind outside the supported set
    #[error("Model '{0}' is not supported (expected Prophet or ARIMA)")]
    UnsupportedModel(String),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Model(#[from] TsError),

    #[error(transparent)]
    Tuning(#[from] TuningError),

    #[error(transparent)]
    Tracking(#[from] TrackingError),

    /// Filesystem failure outside the tracking store
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A configuration value could not be read
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<std::io::Error> for WorkflowError {
    fn from(err: std::io::Error) -> Self {
        WorkflowError::Io(err.to_string())
    }
}

/// Result type for workflow operations.
pub type Result<T> = std::result::Result<T, WorkflowError>;
