//! Experiment Tracking Facade
//!
//! Unified re-exports for the tracking module.
//!
//! This facade provides a single entry point for experiment tracking:
//! - `tracking_spi` - Run context, tables, errors and the backend contract
//! - `tracking_api` - Configuration types and builders
//! - `tracking_core` - File and in-memory stores, the experiment recorder

// Re-export everything from SPI
pub use tracking_spi::*;

// Re-export everything from API
pub use tracking_api::*;

// Re-export everything from Core
pub use tracking_core::*;
