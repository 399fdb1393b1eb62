//! ARIMA (AutoRegressive Integrated Moving Average) implementation
//!
//! The model combines three components:
//!
//! - **AR (AutoRegressive)**: Uses past values to predict future values
//! - **I (Integrated)**: Differencing to achieve stationarity
//! - **MA (Moving Average)**: Uses past forecast errors
//!
//! ## Parameters
//!
//! - `p`: Order of the autoregressive part (0-10)
//! - `d`: Degree of differencing (0-2)
//! - `q`: Order of the moving average part (0-10)
//!
//! ## Example
//!
//! ```rust
//! use algorithm_core::regression::Arima;
//! use algorithm_spi::Predictor;
//!
//! let data: Vec<f64> = (1..=20).map(|x| x as f64).collect();
//! let mut model = Arima::new(1, 1, 0).unwrap();
//! model.fit(&data).unwrap();
//! let forecast = model.predict(3).unwrap();
//! assert_eq!(forecast.len(), 3);
//! ```

use algorithm_spi::{Predictor, Result, TsError};
use serde::{Deserialize, Serialize};

use crate::utils::stationarity::difference;

/// Largest accepted AR order.
pub const MAX_AR_ORDER: usize = 10;
/// Largest accepted differencing order.
pub const MAX_DIFF_ORDER: usize = 2;
/// Largest accepted MA order.
pub const MAX_MA_ORDER: usize = 10;

const SIGMA2_FLOOR: f64 = 1e-12;

/// ARIMA model for time series forecasting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arima {
    /// AR order (p)
    p: usize,
    /// Differencing order (d)
    d: usize,
    /// MA order (q)
    q: usize,
    /// AR coefficients
    ar_coeffs: Vec<f64>,
    /// MA coefficients
    ma_coeffs: Vec<f64>,
    /// Mean of the differenced series
    constant: f64,
    /// Original data (for undifferencing)
    original_data: Vec<f64>,
    /// Differenced data
    differenced_data: Vec<f64>,
    /// One-step innovations on the differenced scale
    residuals: Vec<f64>,
    /// Innovation variance
    sigma2: f64,
    fitted: bool,
}

impl Arima {
    /// Create a new unfitted ARIMA model with the given orders.
    ///
    /// Fails with [`TsError::InvalidParameter`] when an order exceeds its
    /// limit. Whether the data supports the order is only checked by `fit`.
    pub fn new(p: usize, d: usize, q: usize) -> Result<Self> {
        if p > MAX_AR_ORDER {
            return Err(TsError::InvalidParameter {
                name: "p".to_string(),
                reason: format!("AR order must be <= {}", MAX_AR_ORDER),
            });
        }
        if d > MAX_DIFF_ORDER {
            return Err(TsError::InvalidParameter {
                name: "d".to_string(),
                reason: format!("Differencing order must be <= {}", MAX_DIFF_ORDER),
            });
        }
        if q > MAX_MA_ORDER {
            return Err(TsError::InvalidParameter {
                name: "q".to_string(),
                reason: format!("MA order must be <= {}", MAX_MA_ORDER),
            });
        }

        Ok(Self {
            p,
            d,
            q,
            ar_coeffs: vec![0.0; p],
            ma_coeffs: vec![0.0; q],
            constant: 0.0,
            original_data: Vec::new(),
            differenced_data: Vec::new(),
            residuals: Vec::new(),
            sigma2: 0.0,
            fitted: false,
        })
    }

    /// Minimum number of observations `fit` accepts.
    pub fn min_observations(&self) -> usize {
        self.p + self.d + self.q + 10
    }

    /// Reverse differencing starting from the end of the fitted history.
    ///
    /// Each level is integrated from the last value of the series at that
    /// differencing level, innermost level first.
    fn undifference(&self, forecasts: &[f64]) -> Vec<f64> {
        let mut result = forecasts.to_vec();
        for level in (0..self.d).rev() {
            let anchor = difference(&self.original_data, level);
            let mut last = anchor.last().copied().unwrap_or(0.0);
            for value in result.iter_mut() {
                last += *value;
                *value = last;
            }
        }
        result
    }

    /// Estimate AR coefficients from the Yule-Walker equations
    /// (Levinson-Durbin recursion).
    fn estimate_ar_coefficients(&self, data: &[f64]) -> Vec<f64> {
        let mut coeffs = vec![0.0; self.p];
        if self.p == 0 {
            return coeffs;
        }

        let n = data.len();
        let mean: f64 = data.iter().sum::<f64>() / n as f64;
        let centered: Vec<f64> = data.iter().map(|x| x - mean).collect();

        let mut autocov = vec![0.0; self.p + 1];
        for (k, slot) in autocov.iter_mut().enumerate() {
            *slot = (k..n).map(|i| centered[i] * centered[i - k]).sum::<f64>() / n as f64;
        }

        if autocov[0] <= 1e-10 {
            return coeffs;
        }

        let mut error = autocov[0];
        for k in 1..=self.p {
            let mut acc = autocov[k];
            for j in 1..k {
                acc -= coeffs[j - 1] * autocov[k - j];
            }
            let reflection = (acc / error).clamp(-0.99, 0.99);

            let previous = coeffs.clone();
            coeffs[k - 1] = reflection;
            for j in 1..k {
                coeffs[j - 1] = previous[j - 1] - reflection * previous[k - j - 1];
            }

            error *= 1.0 - reflection * reflection;
            if error <= 1e-12 {
                break;
            }
        }

        coeffs
    }

    /// Estimate MA coefficients from the autocorrelation of AR residuals
    fn estimate_ma_coefficients(&self, residuals: &[f64]) -> Vec<f64> {
        if self.q == 0 || residuals.is_empty() {
            return vec![0.0; self.q];
        }

        let n = residuals.len();
        let mean: f64 = residuals.iter().sum::<f64>() / n as f64;
        let centered: Vec<f64> = residuals.iter().map(|x| x - mean).collect();

        let mut coeffs = vec![0.0; self.q];
        let var: f64 = centered.iter().map(|x| x * x).sum::<f64>() / n as f64;

        if var > 1e-10 {
            for (k, coeff) in coeffs.iter_mut().enumerate() {
                let sum: f64 = ((k + 1)..n)
                    .map(|i| centered[i] * centered[i - k - 1])
                    .sum();
                // Bound coefficients for stability
                *coeff = ((sum / n as f64) / var).clamp(-0.99, 0.99);
            }
        }

        coeffs
    }

    /// One-step innovations of the differenced series.
    ///
    /// Lags before the start of the series contribute at the mean and
    /// unknown past errors are zero.
    fn innovations(&self, ar: &[f64], ma: &[f64]) -> Result<Vec<f64>> {
        let w = &self.differenced_data;
        let mut errors = vec![0.0; w.len()];
        for i in 0..w.len() {
            let mut prediction = self.constant;
            for (j, phi) in ar.iter().enumerate() {
                if i > j {
                    prediction += phi * (w[i - j - 1] - self.constant);
                }
            }
            for (j, theta) in ma.iter().enumerate() {
                if i > j {
                    prediction += theta * errors[i - j - 1];
                }
            }
            let error = w[i] - prediction;
            if !error.is_finite() {
                return Err(TsError::NumericalError(format!(
                    "non-finite innovation at index {}",
                    i
                )));
            }
            errors[i] = error;
        }
        Ok(errors)
    }

    /// Model orders as `(p, d, q)`
    pub fn order(&self) -> (usize, usize, usize) {
        (self.p, self.d, self.q)
    }

    /// Get AR coefficients
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coeffs
    }

    /// Get MA coefficients
    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coeffs
    }

    /// Innovation variance of the fitted model
    pub fn sigma2(&self) -> Result<f64> {
        if !self.fitted {
            return Err(TsError::NotFitted);
        }
        Ok(self.sigma2)
    }

    /// Akaike information criterion on the differenced scale
    ///
    /// `n_eff * ln(sigma2) + 2 * (p + q + 1)` with `n_eff = n - d - p`.
    pub fn aic(&self) -> Result<f64> {
        if !self.fitted {
            return Err(TsError::NotFitted);
        }
        let n_eff = self.differenced_data.len().saturating_sub(self.p) as f64;
        Ok(n_eff * self.sigma2.ln() + 2.0 * (self.p + self.q + 1) as f64)
    }

    /// In-sample residuals on the original scale
    pub fn residuals(&self) -> Result<Vec<f64>> {
        let fitted = self.fitted_values()?;
        Ok(self
            .original_data
            .iter()
            .zip(fitted.iter())
            .map(|(y, f)| y - f)
            .collect())
    }
}

fn binomial(n: usize, k: usize) -> f64 {
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

impl Predictor for Arima {
    fn fit(&mut self, data: &[f64]) -> Result<()> {
        let min_required = self.min_observations();
        if data.len() < min_required {
            return Err(TsError::InsufficientData {
                required: min_required,
                actual: data.len(),
            });
        }

        if data.iter().any(|x| !x.is_finite()) {
            return Err(TsError::InvalidData(
                "Data contains NaN or infinite values".to_string(),
            ));
        }

        self.fitted = false;
        self.original_data = data.to_vec();
        self.differenced_data = difference(data, self.d);
        let n = self.differenced_data.len();
        self.constant = self.differenced_data.iter().sum::<f64>() / n as f64;

        self.ar_coeffs = self.estimate_ar_coefficients(&self.differenced_data);
        let ar_residuals = self.innovations(&self.ar_coeffs, &[])?;
        self.ma_coeffs = self.estimate_ma_coefficients(&ar_residuals[self.p..]);
        self.residuals = self.innovations(&self.ar_coeffs, &self.ma_coeffs)?;

        let tail = &self.residuals[self.p..];
        let sigma2 = tail.iter().map(|e| e * e).sum::<f64>() / tail.len().max(1) as f64;
        if !sigma2.is_finite() {
            return Err(TsError::NumericalError(
                "innovation variance is not finite".to_string(),
            ));
        }
        self.sigma2 = sigma2.max(SIGMA2_FLOOR);

        self.fitted = true;
        Ok(())
    }

    fn predict(&self, steps: usize) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(TsError::NotFitted);
        }

        if steps == 0 {
            return Ok(Vec::new());
        }

        let n = self.differenced_data.len();
        let mut extended = self.differenced_data.clone();
        let mut extended_residuals = self.residuals.clone();

        for _ in 0..steps {
            let mut forecast = self.constant;

            for (j, phi) in self.ar_coeffs.iter().enumerate() {
                let idx = extended.len() - j - 1;
                forecast += phi * (extended[idx] - self.constant);
            }

            for (j, theta) in self.ma_coeffs.iter().enumerate() {
                if extended_residuals.len() > j {
                    let idx = extended_residuals.len() - j - 1;
                    forecast += theta * extended_residuals[idx];
                }
            }

            extended.push(forecast);
            // Future innovations have zero expectation
            extended_residuals.push(0.0);
        }

        Ok(self.undifference(&extended[n..]))
    }

    /// One-step-ahead in-sample predictions, one per observation.
    ///
    /// The first `d` observations have no differenced counterpart and are
    /// predicted naively from the previous value.
    fn fitted_values(&self) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(TsError::NotFitted);
        }

        let y = &self.original_data;
        let mut fitted = Vec::with_capacity(y.len());
        for t in 0..y.len() {
            if t < self.d {
                fitted.push(if t == 0 { y[0] } else { y[t - 1] });
                continue;
            }
            let i = t - self.d;
            let mut value = self.differenced_data[i] - self.residuals[i];
            for k in 1..=self.d {
                let sign = if k % 2 == 1 { 1.0 } else { -1.0 };
                value += sign * binomial(self.d, k) * y[t - k];
            }
            fitted.push(value);
        }
        Ok(fitted)
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}
