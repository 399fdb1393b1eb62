//! Utility functions for time series analysis
//!
//! - [`metrics`]: accuracy metrics and the forecast evaluator
//! - [`stationarity`]: KPSS test and differencing
//! - [`linalg`]: penalized least squares solver

pub mod linalg;
pub mod metrics;
pub mod stationarity;
