//! Prophet-style additive forecaster
//!
//! Decomposes a series as `y(t) = g(t) + s(t) + ε` where `g` is a
//! piecewise-linear trend with potential changepoints in the first 80% of
//! the history and `s` is a sum of Fourier seasonalities. Coefficients are
//! the MAP estimate under Gaussian priors, which reduces to a ridge
//! regression on scaled data with one penalty per coefficient group.
//!
//! ## Example
//!
//! ```rust
//! use algorithm_core::additive::{Prophet, ProphetParams};
//! use algorithm_spi::Forecaster;
//! use chrono::NaiveDate;
//!
//! let ds: Vec<_> = (0..36)
//!     .map(|m| {
//!         NaiveDate::from_ymd_opt(2000 + m / 12, (m % 12) as u32 + 1, 1)
//!             .unwrap()
//!             .and_hms_opt(0, 0, 0)
//!             .unwrap()
//!     })
//!     .collect();
//! let y: Vec<f64> = (0..36).map(|i| 100.0 + i as f64).collect();
//!
//! let mut model = Prophet::new(ProphetParams::default()).unwrap();
//! model.fit_series(&ds, &y).unwrap();
//! assert_eq!(model.predict_in_sample().unwrap().len(), 36);
//! ```

use std::collections::BTreeMap;

use algorithm_spi::{Forecaster, HyperparameterSet, Result, Timestamp, TsError};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

use super::features::{changepoint_grid, days_since_epoch, design_row, Seasonality};
use crate::utils::linalg::ridge_solve;

/// Prior scale of the base growth rate and offset.
const TREND_PRIOR_SCALE: f64 = 5.0;
/// Observation noise assumed for the first MAP pass (scaled units).
const INITIAL_SIGMA: f64 = 0.05;
const SIGMA_FLOOR: f64 = 1e-3;

/// Hyperparameters of the additive model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProphetParams {
    /// Prior scale of trend changes; larger values give a more flexible trend
    pub changepoint_prior_scale: f64,
    /// Prior scale of the Fourier coefficients
    pub seasonality_prior_scale: f64,
    /// Width of the prediction interval, in `(0, 1)`
    pub interval_width: f64,
    /// `None` selects the seasonality from the history
    pub yearly_seasonality: Option<bool>,
    pub weekly_seasonality: Option<bool>,
    pub daily_seasonality: Option<bool>,
    pub n_changepoints: usize,
    /// Fraction of the history eligible for changepoints
    pub changepoint_range: f64,
}

impl Default for ProphetParams {
    fn default() -> Self {
        Self {
            changepoint_prior_scale: 0.05,
            seasonality_prior_scale: 10.0,
            interval_width: 0.80,
            yearly_seasonality: None,
            weekly_seasonality: None,
            daily_seasonality: None,
            n_changepoints: 25,
            changepoint_range: 0.8,
        }
    }
}

impl ProphetParams {
    /// Read parameters from a hyperparameter set, defaulting absent entries.
    pub fn from_hyperparameters(set: &HyperparameterSet) -> Result<Self> {
        let defaults = Self::default();
        let params = Self {
            changepoint_prior_scale: set
                .get_or("changepoint_prior_scale", defaults.changepoint_prior_scale),
            seasonality_prior_scale: set
                .get_or("seasonality_prior_scale", defaults.seasonality_prior_scale),
            interval_width: set.get_or("interval_width", defaults.interval_width),
            yearly_seasonality: set.get_flag("yearly_seasonality"),
            weekly_seasonality: set.get_flag("weekly_seasonality"),
            daily_seasonality: set.get_flag("daily_seasonality"),
            n_changepoints: set
                .get_usize("n_changepoints")?
                .unwrap_or(defaults.n_changepoints),
            changepoint_range: set.get_or("changepoint_range", defaults.changepoint_range),
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("changepoint_prior_scale", self.changepoint_prior_scale),
            ("seasonality_prior_scale", self.seasonality_prior_scale),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TsError::InvalidParameter {
                    name: name.to_string(),
                    reason: format!("must be positive, got {}", value),
                });
            }
        }
        if !(self.interval_width > 0.0 && self.interval_width < 1.0) {
            return Err(TsError::InvalidParameter {
                name: "interval_width".to_string(),
                reason: format!("must be in (0, 1), got {}", self.interval_width),
            });
        }
        if !(self.changepoint_range > 0.0 && self.changepoint_range <= 1.0) {
            return Err(TsError::InvalidParameter {
                name: "changepoint_range".to_string(),
                reason: format!("must be in (0, 1], got {}", self.changepoint_range),
            });
        }
        Ok(())
    }
}

/// Point forecast with its uncertainty band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalForecast {
    pub yhat: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct FittedState {
    /// Day offset of the first observation
    t0: f64,
    /// History span in days
    t_scale: f64,
    y_scale: f64,
    changepoints: Vec<f64>,
    seasonalities: Vec<Seasonality>,
    coefficients: Vec<f64>,
    /// Residual standard deviation in original units
    sigma: f64,
    history_ds: Vec<Timestamp>,
}

/// Additive trend + seasonality forecaster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prophet {
    params: ProphetParams,
    state: Option<FittedState>,
}

impl Prophet {
    pub fn new(params: ProphetParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            state: None,
        })
    }

    pub fn params(&self) -> &ProphetParams {
        &self.params
    }

    /// Seasonal components in use after fitting
    pub fn seasonalities(&self) -> Vec<&str> {
        self.state
            .as_ref()
            .map(|s| s.seasonalities.iter().map(|x| x.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Changepoint locations on the scaled time axis, after fitting
    pub fn changepoints(&self) -> &[f64] {
        self.state
            .as_ref()
            .map(|s| s.changepoints.as_slice())
            .unwrap_or(&[])
    }

    fn resolve_seasonalities(&self, days: &[f64]) -> Vec<Seasonality> {
        let span = days[days.len() - 1] - days[0];
        let min_spacing = days
            .windows(2)
            .map(|w| w[1] - w[0])
            .filter(|d| *d > 0.0)
            .fold(f64::INFINITY, f64::min);

        let mut result = Vec::new();
        if self.params.yearly_seasonality.unwrap_or(span >= 730.0) {
            result.push(Seasonality::yearly());
        }
        if self
            .params
            .weekly_seasonality
            .unwrap_or(span >= 14.0 && min_spacing < 7.0)
        {
            result.push(Seasonality::weekly());
        }
        if self
            .params
            .daily_seasonality
            .unwrap_or(span >= 2.0 && min_spacing < 1.0)
        {
            result.push(Seasonality::daily());
        }
        result
    }

    fn penalties(&self, sigma2: f64, n_changepoints: usize, n_seasonal: usize) -> Vec<f64> {
        let mut penalties = Vec::with_capacity(2 + n_changepoints + n_seasonal);
        penalties.extend([sigma2 / TREND_PRIOR_SCALE.powi(2); 2]);
        penalties.extend(
            std::iter::repeat(sigma2 / self.params.changepoint_prior_scale.powi(2))
                .take(n_changepoints),
        );
        penalties.extend(
            std::iter::repeat(sigma2 / self.params.seasonality_prior_scale.powi(2))
                .take(n_seasonal),
        );
        penalties
    }

    fn state(&self) -> Result<&FittedState> {
        self.state.as_ref().ok_or(TsError::NotFitted)
    }

    fn predict_scaled(state: &FittedState, ds: &[Timestamp]) -> Vec<f64> {
        ds.iter()
            .map(|ts| {
                let days = days_since_epoch(ts);
                let t = (days - state.t0) / state.t_scale;
                let row = design_row(t, days, &state.changepoints, &state.seasonalities);
                row.iter()
                    .zip(state.coefficients.iter())
                    .map(|(x, b)| x * b)
                    .sum::<f64>()
                    * state.y_scale
            })
            .collect()
    }

    /// Predictions with a symmetric uncertainty band of width `interval_width`.
    pub fn predict_interval(&self, ds: &[Timestamp]) -> Result<IntervalForecast> {
        let state = self.state()?;
        let yhat = Self::predict_scaled(state, ds);
        let normal = Normal::new(0.0, 1.0).map_err(|e| {
            TsError::NumericalError(format!("Failed to create normal distribution: {}", e))
        })?;
        let z = normal.inverse_cdf(0.5 + self.params.interval_width / 2.0);
        let half = z * state.sigma;
        Ok(IntervalForecast {
            lower: yhat.iter().map(|v| v - half).collect(),
            upper: yhat.iter().map(|v| v + half).collect(),
            yhat,
        })
    }
}

impl Forecaster for Prophet {
    fn fit_series(&mut self, ds: &[Timestamp], y: &[f64]) -> Result<()> {
        if ds.len() != y.len() {
            return Err(TsError::LengthMismatch {
                expected: ds.len(),
                actual: y.len(),
            });
        }
        if y.len() < 2 {
            return Err(TsError::InsufficientData {
                required: 2,
                actual: y.len(),
            });
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(TsError::InvalidData(
                "Data contains NaN or infinite values".to_string(),
            ));
        }
        if ds.windows(2).any(|w| w[1] < w[0]) {
            return Err(TsError::InvalidData(
                "timestamps must be in ascending order".to_string(),
            ));
        }

        self.state = None;
        let days: Vec<f64> = ds.iter().map(days_since_epoch).collect();
        let t0 = days[0];
        let t_scale = days[days.len() - 1] - t0;
        if t_scale <= 0.0 {
            return Err(TsError::InvalidData(
                "history must span more than one timestamp".to_string(),
            ));
        }

        let y_abs_max = y.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        let y_scale = if y_abs_max > 0.0 { y_abs_max } else { 1.0 };
        let y_scaled: Vec<f64> = y.iter().map(|v| v / y_scale).collect();
        let t_scaled: Vec<f64> = days.iter().map(|d| (d - t0) / t_scale).collect();

        let changepoints = changepoint_grid(
            &t_scaled,
            self.params.n_changepoints,
            self.params.changepoint_range,
        );
        let seasonalities = self.resolve_seasonalities(&days);
        let n_seasonal: usize = seasonalities.iter().map(Seasonality::width).sum();

        let design: Vec<Vec<f64>> = t_scaled
            .iter()
            .zip(days.iter())
            .map(|(t, d)| design_row(*t, *d, &changepoints, &seasonalities))
            .collect();

        // Second pass re-weights the priors with the observed noise level
        let mut sigma2 = INITIAL_SIGMA.powi(2);
        let mut coefficients = Vec::new();
        for _ in 0..2 {
            let penalties = self.penalties(sigma2, changepoints.len(), n_seasonal);
            coefficients = ridge_solve(&design, &y_scaled, &penalties)?;
            let sse: f64 = design
                .iter()
                .zip(y_scaled.iter())
                .map(|(row, target)| {
                    let fit: f64 = row.iter().zip(coefficients.iter()).map(|(x, b)| x * b).sum();
                    (target - fit).powi(2)
                })
                .sum();
            sigma2 = (sse / y.len() as f64).max(SIGMA_FLOOR.powi(2));
        }

        debug!(
            changepoints = changepoints.len(),
            seasonalities = seasonalities.len(),
            sigma = sigma2.sqrt() * y_scale,
            "additive model fitted"
        );

        self.state = Some(FittedState {
            t0,
            t_scale,
            y_scale,
            changepoints,
            seasonalities,
            coefficients,
            sigma: sigma2.sqrt() * y_scale,
            history_ds: ds.to_vec(),
        });
        Ok(())
    }

    fn predict_at(&self, ds: &[Timestamp]) -> Result<Vec<f64>> {
        Ok(Self::predict_scaled(self.state()?, ds))
    }

    fn predict_in_sample(&self) -> Result<Vec<f64>> {
        let state = self.state()?;
        Ok(Self::predict_scaled(state, &state.history_ds))
    }

    fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    fn describe(&self) -> BTreeMap<String, String> {
        let toggle = |name: &str, value: Option<bool>| match (&self.state, value) {
            (Some(state), _) => state.seasonalities.iter().any(|s| s.name == name).to_string(),
            (None, Some(v)) => v.to_string(),
            (None, None) => "auto".to_string(),
        };

        BTreeMap::from([
            (
                "changepoint_prior_scale".to_string(),
                self.params.changepoint_prior_scale.to_string(),
            ),
            (
                "seasonality_prior_scale".to_string(),
                self.params.seasonality_prior_scale.to_string(),
            ),
            (
                "interval_width".to_string(),
                self.params.interval_width.to_string(),
            ),
            (
                "n_changepoints".to_string(),
                self.params.n_changepoints.to_string(),
            ),
            (
                "yearly_seasonality".to_string(),
                toggle("yearly", self.params.yearly_seasonality),
            ),
            (
                "weekly_seasonality".to_string(),
                toggle("weekly", self.params.weekly_seasonality),
            ),
            (
                "daily_seasonality".to_string(),
                toggle("daily", self.params.daily_seasonality),
            ),
        ])
    }
}
