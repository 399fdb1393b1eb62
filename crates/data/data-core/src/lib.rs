//! Dataset Loader Core
//!
//! Implementations for the dataset loader: the blocking HTTP source and the
//! cache-first [`DatasetLoader`].

pub mod http;
pub mod loader;

pub use http::HttpSource;
pub use loader::{parse_table, write_table, DatasetLoader};
