//! Dataset Service Provider Interface
//!
//! Defines the dataset table, the enumerated dataset identifiers, the error
//! type and the remote source contract used by the dataset loader.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::RemoteSource;
pub use error::{DatasetError, Result};
pub use model::{
    format_timestamp, parse_timestamp, Dataset, DatasetId, SourceColumns, Timestamp,
};
