//! Dataset Loader API
//!
//! Configuration types and builders for the dataset loader.

pub mod config;

pub use config::{DataConfig, DataConfigBuilder, DEFAULT_PROCESSED_DIR, DEFAULT_USER_AGENT};
