//! Additive decomposition models
//!
//! - [`Prophet`]: piecewise-linear trend with changepoints plus Fourier
//!   seasonalities, fit by penalized least squares

pub mod features;
pub mod prophet;

pub use features::Seasonality;
pub use prophet::{IntervalForecast, Prophet, ProphetParams};
