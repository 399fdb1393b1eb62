//! Error types for experiment tracking.

mod tracking_error;

pub use tracking_error::{Result, TrackingError};
