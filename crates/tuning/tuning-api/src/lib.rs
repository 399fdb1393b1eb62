//! Hyperparameter Tuning API
//!
//! Configuration types and builders for the randomized search.

pub mod config;

pub use config::{SearchConfig, SearchConfigBuilder, DEFAULT_CV_SPLITS, DEFAULT_TRIALS};
