//! Hyperparameter Tuning Facade
//!
//! Unified re-exports for the tuning module.
//!
//! # Example
//!
//! ```rust
//! use tuning_facade::{optimize_arima_order, SearchConfig};
//!
//! let y: Vec<f64> = (0..40).map(|i| 10.0 + i as f64 + (i % 3) as f64).collect();
//! let result = optimize_arima_order(&y, &SearchConfig::new(3).with_seed(1)).unwrap();
//! assert_eq!(result.trials.len(), 3);
//! ```

// Re-export everything from SPI
pub use tuning_spi::*;

// Re-export everything from API
pub use tuning_api::*;

// Re-export everything from Core
pub use tuning_core::*;
