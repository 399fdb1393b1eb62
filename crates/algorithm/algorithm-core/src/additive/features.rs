//! Regressor construction for the additive model: time scaling,
//! changepoint hinges and Fourier seasonal terms.

use std::f64::consts::PI;

use algorithm_spi::Timestamp;
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Fractional days since the Unix epoch.
pub fn days_since_epoch(ts: &Timestamp) -> f64 {
    ts.and_utc().timestamp() as f64 / SECONDS_PER_DAY
}

/// A periodic component modelled by a truncated Fourier series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seasonality {
    pub name: String,
    /// Period length in days
    pub period: f64,
    /// Number of sine/cosine pairs
    pub fourier_order: usize,
}

impl Seasonality {
    pub fn yearly() -> Self {
        Self::new("yearly", 365.25, 10)
    }

    pub fn weekly() -> Self {
        Self::new("weekly", 7.0, 3)
    }

    pub fn daily() -> Self {
        Self::new("daily", 1.0, 4)
    }

    pub fn new(name: &str, period: f64, fourier_order: usize) -> Self {
        Self {
            name: name.to_string(),
            period,
            fourier_order,
        }
    }

    /// Number of design columns this component contributes.
    pub fn width(&self) -> usize {
        2 * self.fourier_order
    }

    /// `sin(2πkt/P), cos(2πkt/P)` for `k = 1..=order`, appended to `row`.
    pub fn push_terms(&self, days: f64, row: &mut Vec<f64>) {
        for k in 1..=self.fourier_order {
            let angle = 2.0 * PI * k as f64 * days / self.period;
            row.push(angle.sin());
            row.push(angle.cos());
        }
    }
}

/// Potential changepoint locations on the scaled time axis.
///
/// Changepoints sit at evenly spaced observations within the first
/// `range` fraction of the history. Short histories get fewer of them.
pub fn changepoint_grid(t_scaled: &[f64], n_changepoints: usize, range: f64) -> Vec<f64> {
    let hist_size = (t_scaled.len() as f64 * range).floor() as usize;
    let count = n_changepoints.min(hist_size.saturating_sub(1));
    if count == 0 {
        return Vec::new();
    }

    let last = (hist_size - 1) as f64;
    (1..=count)
        .map(|i| {
            let idx = (last * i as f64 / count as f64).round() as usize;
            t_scaled[idx]
        })
        .collect()
}

/// One design row: intercept, slope, changepoint hinges, then seasonal terms.
pub fn design_row(t: f64, days: f64, changepoints: &[f64], seasonalities: &[Seasonality]) -> Vec<f64> {
    let width = 2
        + changepoints.len()
        + seasonalities.iter().map(Seasonality::width).sum::<usize>();
    let mut row = Vec::with_capacity(width);
    row.push(1.0);
    row.push(t);
    row.extend(changepoints.iter().map(|s| (t - s).max(0.0)));
    for seasonality in seasonalities {
        seasonality.push_terms(days, &mut row);
    }
    row
}
