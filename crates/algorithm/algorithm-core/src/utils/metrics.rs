//! Forecast accuracy metrics
//!
//! Provides standard metrics for evaluating time series forecasts, and the
//! [`evaluate_forecast`] evaluator used once per training run.

use algorithm_spi::{MetricsReport, Result, TsError};

/// Mean Absolute Error (MAE)
///
/// Average of absolute differences between predictions and actual values.
/// Lower is better. Same scale as the data. NaN on empty or mismatched input.
///
/// # Example
///
/// ```rust
/// use algorithm_core::utils::metrics::mae;
///
/// let actual = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// let predicted = vec![1.1, 2.2, 2.9, 4.1, 5.0];
/// let error = mae(&actual, &predicted);
/// assert!(error < 0.2);
/// ```
pub fn mae(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum();

    sum / actual.len() as f64
}

/// Mean Squared Error (MSE)
///
/// Average of squared differences. Penalizes large errors more heavily.
/// Lower is better. NaN on empty or mismatched input.
pub fn mse(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    sum / actual.len() as f64
}

/// Root Mean Squared Error (RMSE)
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    mse(actual, predicted).sqrt()
}

/// Compute the accuracy report for one set of predictions.
///
/// Mismatched lengths fail with [`TsError::LengthMismatch`] and empty input
/// with [`TsError::InsufficientData`]; the individual metric functions would
/// otherwise silently return NaN.
pub fn evaluate_forecast(y_true: &[f64], y_pred: &[f64]) -> Result<MetricsReport> {
    if y_true.len() != y_pred.len() {
        return Err(TsError::LengthMismatch {
            expected: y_true.len(),
            actual: y_pred.len(),
        });
    }
    if y_true.is_empty() {
        return Err(TsError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }

    let mse = mse(y_true, y_pred);
    Ok(MetricsReport {
        mse,
        mae: mae(y_true, y_pred),
        rmse: mse.sqrt(),
    })
}
