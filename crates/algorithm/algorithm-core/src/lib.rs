//! Algorithm Core Implementations
//!
//! Forecasting models used by the experiment workflow, organized by category:
//!
//! - [`additive`]: Prophet-style trend + seasonality model
//! - [`regression`]: ARIMA and stepwise AutoARIMA
//! - [`factory`]: builds untrained models from a kind and parameters
//! - [`utils`]: metrics and the evaluator, stationarity tests, linear algebra
//!
//! ## Example
//!
//! ```rust
//! use algorithm_core::prelude::*;
//!
//! let data: Vec<f64> = (1..=20).map(|x| x as f64).collect();
//! let mut model = Arima::new(1, 1, 0).unwrap();
//! model.fit(&data).unwrap();
//! let forecast = model.predict(3).unwrap();
//! assert_eq!(forecast.len(), 3);
//! ```

pub mod additive;
pub mod factory;
pub mod regression;
pub mod utils;

// Re-export from SPI
pub use algorithm_spi::{Forecaster, Predictor, Result, TsError};

// Re-export implementations for convenience
pub use additive::{IntervalForecast, Prophet, ProphetParams};
pub use factory::{ForecastModel, ModelFactory};
pub use regression::{Arima, AutoArima, AutoArimaConfig};
pub use utils::metrics::evaluate_forecast;

/// Prelude module for convenient imports
pub mod prelude {
    pub use algorithm_spi::{Forecaster, Predictor};
    // Models
    pub use crate::additive::{Prophet, ProphetParams};
    pub use crate::factory::{ForecastModel, ModelFactory};
    pub use crate::regression::{Arima, AutoArima};
    // Evaluation
    pub use crate::utils::metrics::evaluate_forecast;
    // Shared types
    pub use algorithm_spi::{HyperparameterSet, MetricsReport, ModelKind, Result, TsError};
}
