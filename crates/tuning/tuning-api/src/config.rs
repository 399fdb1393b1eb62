//! Search configuration types.

use serde::{Deserialize, Serialize};

/// Default number of trials per search.
pub const DEFAULT_TRIALS: usize = 20;
/// Default number of forward-chaining cross-validation folds.
pub const DEFAULT_CV_SPLITS: usize = 3;

/// Configuration for a randomized hyperparameter search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of parameter sets evaluated
    pub n_trials: usize,
    /// Cross-validation folds (additive model search only)
    pub cv_splits: usize,
    /// Sampler seed; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            n_trials: DEFAULT_TRIALS,
            cv_splits: DEFAULT_CV_SPLITS,
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn new(n_trials: usize) -> Self {
        Self {
            n_trials,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Builder for SearchConfig.
#[derive(Debug, Default)]
pub struct SearchConfigBuilder {
    n_trials: Option<usize>,
    cv_splits: Option<usize>,
    seed: Option<u64>,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_trials(mut self, n: usize) -> Self {
        self.n_trials = Some(n);
        self
    }

    pub fn cv_splits(mut self, k: usize) -> Self {
        self.cv_splits = Some(k);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the configuration.
    ///
    /// The trial budget is checked by the search itself.
    pub fn build(self) -> Result<SearchConfig, &'static str> {
        let cv_splits = self.cv_splits.unwrap_or(DEFAULT_CV_SPLITS);
        if cv_splits < 2 {
            return Err("cv_splits must be >= 2");
        }
        Ok(SearchConfig {
            n_trials: self.n_trials.unwrap_or(DEFAULT_TRIALS),
            cv_splits,
            seed: self.seed,
        })
    }
}
