//! Tracking error types.

use thiserror::Error;

/// Experiment tracking errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackingError {
    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(String),

    /// Metadata could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A running context was supplied but reuse was not allowed
    #[error("Run {run_id} is already active")]
    RunAlreadyActive { run_id: String },

    /// The context does not refer to a running run
    #[error("Run {run_id} is not active")]
    RunNotActive { run_id: String },

    #[error("Experiment not found: {0}")]
    ExperimentNotFound(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    /// A figure failed to render
    #[error("Render error: {0}")]
    Render(String),

    /// A table could not be built or written
    #[error("CSV error: {0}")]
    Csv(String),
}

impl From<std::io::Error> for TrackingError {
    fn from(err: std::io::Error) -> Self {
        TrackingError::Io(err.to_string())
    }
}

/// Result type for tracking operations.
pub type Result<T> = std::result::Result<T, TrackingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_state_display() {
        let err = TrackingError::RunAlreadyActive {
            run_id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Run abc is already active");

        let err = TrackingError::RunNotActive {
            run_id: "abc".to_string(),
        };
        assert!(err.to_string().contains("not active"));
    }

    #[test]
    fn test_not_found_display() {
        assert!(TrackingError::ExperimentNotFound("7".into())
            .to_string()
            .contains('7'));
        assert!(TrackingError::RunNotFound("r-1".into())
            .to_string()
            .contains("r-1"));
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(TrackingError::from(io), TrackingError::Io(msg) if msg.contains("denied")));
    }
}
