//! Dataset Loader Facade
//!
//! Unified re-exports for the data module.
//!
//! This facade provides a single entry point for all dataset functionality:
//! - `data_spi` - Dataset table, identifiers, errors and the source contract
//! - `data_api` - Configuration types and builders
//! - `data_core` - Implementations (HTTP source, cache-first loader)
//!
//! # Example
//!
//! ```rust,no_run
//! use data_facade::{DataConfig, DatasetLoader};
//!
//! let loader = DatasetLoader::from_config(DataConfig::default());
//! let dataset = loader.fetch_dataset("sunspots").unwrap();
//! println!("Got {} observations", dataset.len());
//! ```

// Re-export everything from SPI
pub use data_spi::*;

// Re-export everything from API
pub use data_api::*;

// Re-export everything from Core
pub use data_core::*;
