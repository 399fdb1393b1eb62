//! Autoregressive models for time series forecasting
//!
//! ## Algorithms
//!
//! - **ARIMA**: AutoRegressive Integrated Moving Average with a fixed order
//! - **AutoARIMA**: ARIMA with KPSS-selected differencing and a stepwise
//!   AIC search over `(p, q)`

pub mod arima;
pub mod auto_arima;

pub use arima::Arima;
pub use auto_arima::{AutoArima, AutoArimaConfig};
