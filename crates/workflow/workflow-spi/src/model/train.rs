use std::path::PathBuf;

use algorithm_spi::MetricsReport;
use serde::{Deserialize, Serialize};
use tracking_spi::RunContext;

/// Parameters of one training run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainRequest {
    /// Dataset identifier, case-insensitive
    pub dataset: String,
    /// Model kind as typed by the user, parsed before anything else runs
    pub model: String,
    /// Run the hyperparameter search first (additive model only)
    pub optimize: bool,
    /// Search budget
    pub n_trials: usize,
}

impl TrainRequest {
    pub fn new(dataset: &str, model: &str) -> Self {
        Self {
            dataset: dataset.to_string(),
            model: model.to_string(),
            optimize: true,
            n_trials: 20,
        }
    }

    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    pub fn with_trials(mut self, n_trials: usize) -> Self {
        self.n_trials = n_trials;
        self
    }
}

/// Result of a successful training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainOutcome {
    pub metrics: MetricsReport,
    /// Context of the run the results were recorded in
    pub run: RunContext,
    /// Where the fitted model was written
    pub model_path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = TrainRequest::new("air_passengers", "Prophet");
        assert!(request.optimize);
        assert_eq!(request.n_trials, 20);

        let request = request.with_optimize(false).with_trials(3);
        assert!(!request.optimize);
        assert_eq!(request.n_trials, 3);
    }
}
