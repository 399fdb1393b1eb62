//! Dataset error types.

use thiserror::Error;

/// Dataset loading errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DatasetError {
    /// Identifier outside the enumerated dataset set
    #[error("Dataset '{0}' is not supported (expected one of air_passengers, sunspots, covid_us)")]
    UnsupportedDataset(String),

    /// Remote retrieval failed
    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    /// Malformed CSV content
    #[error("CSV error: {0}")]
    Csv(String),

    /// A cell could not be interpreted
    #[error("Parse error at row {row}: {message}")]
    Parse { row: usize, message: String },

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(String),

    /// The source produced no rows
    #[error("Dataset '{0}' contains no rows")]
    Empty(String),
}

impl From<std::io::Error> for DatasetError {
    fn from(err: std::io::Error) -> Self {
        DatasetError::Io(err.to_string())
    }
}

/// Result type for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;
