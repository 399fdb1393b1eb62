//! Contract traits for algorithm implementations
//!
//! - [`Predictor`]: value-only fit/predict over a bare sequence
//! - [`Forecaster`]: timestamp-aware fit/predict used by the workflow

mod predictor;

pub use predictor::{Forecaster, Predictor};
