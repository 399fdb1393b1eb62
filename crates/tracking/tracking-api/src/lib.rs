//! Experiment Tracking API
//!
//! Configuration types and builders for the experiment recorder.

pub mod config;

pub use config::{TrackingConfig, TrackingConfigBuilder, DEFAULT_EXPERIMENT, DEFAULT_TRACKING_DIR};
