//! Data models for forecasting datasets.

mod dataset;
mod dataset_id;
mod utils;

pub use dataset::{Dataset, Timestamp};
pub use dataset_id::{DatasetId, SourceColumns};
pub use utils::{format_timestamp, parse_timestamp};
