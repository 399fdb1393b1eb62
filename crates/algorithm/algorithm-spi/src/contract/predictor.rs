//! Predictor traits for time series algorithms
//!
//! Defines the trait interfaces the forecasting models implement.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::Timestamp;

/// Value-only time series predictor
///
/// Follows the fit-predict pattern over a bare sequence of observations.
/// The ARIMA family implements this directly; it is what the order search
/// drives when it scores candidate `(p, d, q)` triples.
///
/// # Example
///
/// ```rust,ignore
/// use algorithm_spi::Predictor;
///
/// fn forecast<P: Predictor>(predictor: &mut P, data: &[f64], horizon: usize) -> algorithm_spi::Result<Vec<f64>> {
///     predictor.fit(data)?;
///     predictor.predict(horizon)
/// }
/// ```
pub trait Predictor {
    /// Fit the model to historical data
    fn fit(&mut self, data: &[f64]) -> Result<()>;

    /// Predict `steps` values past the end of the fitted history
    fn predict(&self, steps: usize) -> Result<Vec<f64>>;

    /// One-step-ahead predictions over the fitted history
    ///
    /// The returned vector has the same length as the data passed to
    /// [`Predictor::fit`].
    fn fitted_values(&self) -> Result<Vec<f64>>;

    /// Check if the model has been fitted
    fn is_fitted(&self) -> bool;
}

/// Timestamp-aware forecaster
///
/// Every model kind the factory can build implements this trait so the
/// trainer and the cross-validation loop can drive them uniformly.
pub trait Forecaster {
    /// Fit the model on `(ds, y)` pairs
    ///
    /// `ds` and `y` must have equal length and `ds` must be ascending.
    fn fit_series(&mut self, ds: &[Timestamp], y: &[f64]) -> Result<()>;

    /// Predict the values at the given timestamps
    fn predict_at(&self, ds: &[Timestamp]) -> Result<Vec<f64>>;

    /// Predictions over the fitted history (in-sample)
    fn predict_in_sample(&self) -> Result<Vec<f64>>;

    /// Check if the model has been fitted
    fn is_fitted(&self) -> bool;

    /// Parameters worth recording alongside the fitted model
    fn describe(&self) -> BTreeMap<String, String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TsError;

    /// Mean predictor used to exercise the trait contract
    struct MockMeanPredictor {
        mean: Option<f64>,
        len: usize,
        min_data_points: usize,
    }

    impl MockMeanPredictor {
        fn new(min_data_points: usize) -> Self {
            Self {
                mean: None,
                len: 0,
                min_data_points,
            }
        }
    }

    impl Predictor for MockMeanPredictor {
        fn fit(&mut self, data: &[f64]) -> Result<()> {
            if data.len() < self.min_data_points {
                return Err(TsError::InsufficientData {
                    required: self.min_data_points,
                    actual: data.len(),
                });
            }
            self.mean = Some(data.iter().sum::<f64>() / data.len() as f64);
            self.len = data.len();
            Ok(())
        }

        fn predict(&self, steps: usize) -> Result<Vec<f64>> {
            self.mean.map(|m| vec![m; steps]).ok_or(TsError::NotFitted)
        }

        fn fitted_values(&self) -> Result<Vec<f64>> {
            self.mean.map(|m| vec![m; self.len]).ok_or(TsError::NotFitted)
        }

        fn is_fitted(&self) -> bool {
            self.mean.is_some()
        }
    }

    #[test]
    fn test_predictor_fit_predict() {
        let mut predictor = MockMeanPredictor::new(3);
        assert!(!predictor.is_fitted());
        assert_eq!(predictor.predict(2), Err(TsError::NotFitted));

        predictor.fit(&[1.0, 2.0, 3.0]).unwrap();
        assert!(predictor.is_fitted());
        assert_eq!(predictor.predict(2).unwrap(), vec![2.0, 2.0]);
        assert_eq!(predictor.fitted_values().unwrap().len(), 3);
    }

    #[test]
    fn test_predictor_insufficient_data() {
        let mut predictor = MockMeanPredictor::new(5);
        assert!(matches!(
            predictor.fit(&[1.0]),
            Err(TsError::InsufficientData { required: 5, actual: 1 })
        ));
    }

    #[test]
    fn test_predictor_is_object_safe() {
        let boxed: Box<dyn Predictor> = Box::new(MockMeanPredictor::new(1));
        assert!(!boxed.is_fitted());
    }

    #[test]
    fn test_forecaster_is_object_safe() {
        fn accepts(_: Option<&dyn Forecaster>) {}
        accepts(None);
    }
}
