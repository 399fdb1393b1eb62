//! Forecast accuracy report.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Accuracy metrics computed once per training run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Mean squared error
    pub mse: f64,
    /// Mean absolute error
    pub mae: f64,
    /// Root mean squared error
    pub rmse: f64,
}

impl MetricsReport {
    /// Metrics keyed by name, as sent to the tracking backend.
    pub fn as_map(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("mse".to_string(), self.mse),
            ("mae".to_string(), self.mae),
            ("rmse".to_string(), self.rmse),
        ])
    }
}

impl fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mse={:.6} mae={:.6} rmse={:.6}",
            self.mse, self.mae, self.rmse
        )
    }
}
