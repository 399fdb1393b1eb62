//! Automatic ARIMA order selection
//!
//! The differencing order is chosen with repeated KPSS tests, then `(p, q)`
//! is chosen by a stepwise AIC search around a starting order. The search is
//! non-seasonal.

use std::collections::BTreeSet;

use algorithm_spi::{Predictor, Result, TsError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::arima::Arima;
use crate::utils::stationarity::ndiffs;

/// Bounds of the stepwise search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoArimaConfig {
    pub start_p: usize,
    pub start_q: usize,
    pub max_p: usize,
    pub max_q: usize,
    pub max_d: usize,
    /// Upper bound on the number of candidate fits
    pub max_iterations: usize,
}

impl Default for AutoArimaConfig {
    fn default() -> Self {
        Self {
            start_p: 1,
            start_q: 1,
            max_p: 5,
            max_q: 5,
            max_d: 2,
            max_iterations: 100,
        }
    }
}

/// ARIMA model whose order is selected at fit time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoArima {
    config: AutoArimaConfig,
    selected: Option<Arima>,
}

impl AutoArima {
    pub fn new() -> Self {
        Self::with_config(AutoArimaConfig::default())
    }

    pub fn with_config(config: AutoArimaConfig) -> Self {
        Self {
            config,
            selected: None,
        }
    }

    pub fn config(&self) -> &AutoArimaConfig {
        &self.config
    }

    /// Selected `(p, d, q)` order, once fitted
    pub fn order(&self) -> Option<(usize, usize, usize)> {
        self.selected.as_ref().map(Arima::order)
    }

    /// Seasonal `(P, D, Q, m)` order; always zero for the non-seasonal search
    pub fn seasonal_order(&self) -> (usize, usize, usize, usize) {
        (0, 0, 0, 0)
    }

    /// The fitted model chosen by the search
    pub fn selected_model(&self) -> Option<&Arima> {
        self.selected.as_ref()
    }

    fn fit_candidate(data: &[f64], p: usize, d: usize, q: usize) -> Option<(f64, Arima)> {
        let mut model = Arima::new(p, d, q).ok()?;
        match model.fit(data).and_then(|_| model.aic()) {
            Ok(aic) if aic.is_finite() => Some((aic, model)),
            Ok(_) => None,
            Err(e) => {
                debug!(p, d, q, error = %e, "candidate order failed");
                None
            }
        }
    }

    fn neighbours(&self, p: usize, q: usize) -> Vec<(usize, usize)> {
        let mut result = Vec::new();
        for dp in [-1i64, 0, 1] {
            for dq in [-1i64, 0, 1] {
                if dp == 0 && dq == 0 {
                    continue;
                }
                let np = p as i64 + dp;
                let nq = q as i64 + dq;
                if np >= 0
                    && nq >= 0
                    && np as usize <= self.config.max_p
                    && nq as usize <= self.config.max_q
                {
                    result.push((np as usize, nq as usize));
                }
            }
        }
        result
    }
}

impl Default for AutoArima {
    fn default() -> Self {
        Self::new()
    }
}

impl Predictor for AutoArima {
    fn fit(&mut self, data: &[f64]) -> Result<()> {
        if data.iter().any(|x| !x.is_finite()) {
            return Err(TsError::InvalidData(
                "Data contains NaN or infinite values".to_string(),
            ));
        }

        self.selected = None;
        let d = ndiffs(data, self.config.max_d.min(super::arima::MAX_DIFF_ORDER));

        let start = (
            self.config.start_p.min(self.config.max_p),
            self.config.start_q.min(self.config.max_q),
        );
        let mut visited = BTreeSet::new();
        let mut best: Option<(f64, Arima)> = None;
        let mut iterations = 0;

        let mut consider = |p: usize, q: usize, best: &mut Option<(f64, Arima)>| -> bool {
            if !visited.insert((p, q)) || iterations >= self.config.max_iterations {
                return false;
            }
            iterations += 1;
            match Self::fit_candidate(data, p, d, q) {
                Some((aic, model)) => {
                    debug!(p, d, q, aic, "candidate order");
                    let improves = best.as_ref().map_or(true, |(b, _)| aic < *b);
                    if improves {
                        *best = Some((aic, model));
                    }
                    improves
                }
                None => false,
            }
        };

        for (p, q) in [start, (0, 0), (1.min(self.config.max_p), 0), (0, 1.min(self.config.max_q))] {
            consider(p, q, &mut best);
        }

        loop {
            let (p, q) = match &best {
                Some((_, model)) => {
                    let (p, _, q) = model.order();
                    (p, q)
                }
                None => break,
            };
            let mut improved = false;
            for (np, nq) in self.neighbours(p, q) {
                if consider(np, nq, &mut best) {
                    improved = true;
                    break;
                }
            }
            if !improved {
                break;
            }
        }

        match best {
            Some((aic, model)) => {
                debug!(order = ?model.order(), aic, "selected order");
                self.selected = Some(model);
                Ok(())
            }
            None => {
                let required = Arima::new(0, d, 0)?.min_observations();
                if data.len() < required {
                    Err(TsError::InsufficientData {
                        required,
                        actual: data.len(),
                    })
                } else {
                    Err(TsError::NumericalError(
                        "no candidate order could be fitted".to_string(),
                    ))
                }
            }
        }
    }

    fn predict(&self, steps: usize) -> Result<Vec<f64>> {
        self.selected.as_ref().ok_or(TsError::NotFitted)?.predict(steps)
    }

    fn fitted_values(&self) -> Result<Vec<f64>> {
        self.selected.as_ref().ok_or(TsError::NotFitted)?.fitted_values()
    }

    fn is_fitted(&self) -> bool {
        self.selected.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::metrics::rmse;

    #[test]
    fn test_default_config() {
        let config = AutoArimaConfig::default();
        assert_eq!((config.start_p, config.start_q), (1, 1));
        assert_eq!((config.max_p, config.max_q, config.max_d), (5, 5, 2));
    }

    #[test]
    fn test_not_fitted() {
        let model = AutoArima::new();
        assert!(!model.is_fitted());
        assert_eq!(model.order(), None);
        assert_eq!(model.predict(2).unwrap_err(), TsError::NotFitted);
    }

    #[test]
    fn test_linear_trend_selects_one_difference() {
        let data: Vec<f64> = (0..24).map(|i| 112.0 + 4.0 * i as f64).collect();
        let mut model = AutoArima::new();
        model.fit(&data).unwrap();

        let (p, d, q) = model.order().unwrap();
        assert_eq!(d, 1);
        assert!(p <= 5 && q <= 5);
        assert_eq!(model.seasonal_order(), (0, 0, 0, 0));

        let fitted = model.fitted_values().unwrap();
        assert_eq!(fitted.len(), data.len());
        assert!(rmse(&data, &fitted) < 0.05 * (data[23] - data[0]));
    }

    #[test]
    fn test_neighbours_stay_in_bounds() {
        let model = AutoArima::new();
        let around_origin = model.neighbours(0, 0);
        assert_eq!(around_origin.len(), 3);
        let around_corner = model.neighbours(5, 5);
        assert!(around_corner.iter().all(|(p, q)| *p <= 5 && *q <= 5));
        assert_eq!(model.neighbours(2, 2).len(), 8);
    }

    #[test]
    fn test_too_short_series_fails() {
        let mut model = AutoArima::new();
        assert!(matches!(
            model.fit(&[1.0, 2.0, 3.0]),
            Err(TsError::InsufficientData { .. })
        ));
        assert!(!model.is_fitted());
    }

    #[test]
    fn test_noisy_series_fits_and_forecasts() {
        let data: Vec<f64> = (0..120)
            .map(|i| 50.0 + 10.0 * (i as f64 * std::f64::consts::PI / 6.0).sin() + (i % 5) as f64)
            .collect();
        let mut model = AutoArima::new();
        model.fit(&data).unwrap();
        let forecast = model.predict(12).unwrap();
        assert_eq!(forecast.len(), 12);
        assert!(forecast.iter().all(|v| v.is_finite()));
    }
}
