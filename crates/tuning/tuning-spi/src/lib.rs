//! Hyperparameter Tuning Service Provider Interface
//!
//! Defines the search space, trial outcome and objective contracts shared by
//! the random search and the model-specific objectives.

use algorithm_spi::{HyperparameterSet, ModelKind, TsError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Tuning errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuningError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Insufficient data: required {required}, got {got}")]
    InsufficientData { required: usize, got: usize },

    #[error("Trial {trial} failed: {reason}")]
    TrialFailed { trial: usize, reason: String },

    #[error(transparent)]
    Model(#[from] TsError),
}

pub type Result<T> = std::result::Result<T, TuningError>;

// ============================================================================
// Search Space
// ============================================================================

/// Sampling distribution of one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Distribution {
    /// Continuous, uniform in `[low, high]`.
    Uniform { low: f64, high: f64 },
    /// Continuous, uniform in log space over `[low, high]`.
    LogUniform { low: f64, high: f64 },
    /// Integer, uniform over `low..=high`.
    IntUniform { low: i64, high: i64 },
}

impl Distribution {
    /// Whether `value` could have been drawn from this distribution.
    pub fn contains(&self, value: f64) -> bool {
        match *self {
            Distribution::Uniform { low, high } | Distribution::LogUniform { low, high } => {
                value >= low && value <= high
            }
            Distribution::IntUniform { low, high } => {
                value.fract() == 0.0 && value >= low as f64 && value <= high as f64
            }
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        match *self {
            Distribution::Uniform { low, high } if !(low.is_finite() && high.is_finite()) => {
                Err(format!("bounds must be finite, got [{}, {}]", low, high))
            }
            Distribution::LogUniform { low, .. } if !(low > 0.0) => {
                Err(format!("log-uniform lower bound must be > 0, got {}", low))
            }
            Distribution::Uniform { low, high } | Distribution::LogUniform { low, high }
                if low > high =>
            {
                Err(format!("empty range [{}, {}]", low, high))
            }
            Distribution::IntUniform { low, high } if low > high => {
                Err(format!("empty range {}..={}", low, high))
            }
            _ => Ok(()),
        }
    }
}

/// A named parameter and how to sample it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub distribution: Distribution,
}

impl ParamSpec {
    pub fn uniform(name: &str, low: f64, high: f64) -> Self {
        Self {
            name: name.to_string(),
            distribution: Distribution::Uniform { low, high },
        }
    }

    pub fn log_uniform(name: &str, low: f64, high: f64) -> Self {
        Self {
            name: name.to_string(),
            distribution: Distribution::LogUniform { low, high },
        }
    }

    pub fn int_uniform(name: &str, low: i64, high: i64) -> Self {
        Self {
            name: name.to_string(),
            distribution: Distribution::IntUniform { low, high },
        }
    }
}

/// Parameters searched for one model kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSpace {
    kind: ModelKind,
    params: Vec<ParamSpec>,
}

impl SearchSpace {
    pub fn new(kind: ModelKind, params: Vec<ParamSpec>) -> Self {
        Self { kind, params }
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Check that every parameter has a usable range.
    pub fn validate(&self) -> Result<()> {
        if self.params.is_empty() {
            return Err(TuningError::InvalidConfig("search space is empty".into()));
        }
        for spec in &self.params {
            spec.distribution
                .validate()
                .map_err(|reason| TuningError::InvalidConfig(format!("{}: {}", spec.name, reason)))?;
        }
        Ok(())
    }

    /// Whether every parameter of the space is present in `set` and in range.
    pub fn contains(&self, set: &HyperparameterSet) -> bool {
        set.kind() == self.kind
            && self
                .params
                .iter()
                .all(|spec| set.get(&spec.name).is_some_and(|v| spec.distribution.contains(v)))
    }
}

// ============================================================================
// Trials
// ============================================================================

/// Result of evaluating one parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrialOutcome {
    /// Objective value (lower is better).
    Success(f64),
    /// The model could not be fit or scored.
    Failed(String),
}

impl TrialOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TrialOutcome::Success(_))
    }
}

/// How failed trials affect the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Score the trial as +∞ and keep searching.
    ScoreAsInfinity,
    /// Stop at the first failure and return it as an error.
    Abort,
}

/// One evaluated parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    /// Zero-based trial number.
    pub number: usize,
    pub params: HyperparameterSet,
    pub outcome: TrialOutcome,
}

impl Trial {
    /// Score used for ranking; failed and NaN-scored trials rank last.
    pub fn score(&self) -> f64 {
        match self.outcome {
            TrialOutcome::Success(score) if !score.is_nan() => score,
            _ => f64::INFINITY,
        }
    }
}

/// Outcome of a complete search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Best parameters found.
    pub best_params: HyperparameterSet,
    /// Score of `best_params` (+∞ when every trial failed).
    pub best_score: f64,
    /// Every trial in the order it ran.
    pub trials: Vec<Trial>,
}

impl SearchResult {
    pub fn evaluations(&self) -> usize {
        self.trials.len()
    }

    pub fn failed_trials(&self) -> usize {
        self.trials.iter().filter(|t| !t.outcome.is_success()).count()
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Index ranges of one train/test fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSplit {
    pub train_start: usize,
    pub train_end: usize,
    pub test_start: usize,
    pub test_end: usize,
}

/// Trait for validation strategy implementation.
pub trait Validator: Send + Sync {
    /// Generate validation splits.
    fn splits(&self, data_len: usize) -> Result<Vec<ValidationSplit>>;
}

// ============================================================================
// Core Traits
// ============================================================================

/// Function minimized by the search.
pub trait Objective {
    /// Parameters the search samples.
    fn space(&self) -> &SearchSpace;

    /// Score one sampled parameter set.
    fn evaluate(&self, params: &HyperparameterSet) -> TrialOutcome;

    /// How failures of [`Objective::evaluate`] are aggregated.
    fn failure_policy(&self) -> FailurePolicy;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_contains() {
        let uniform = Distribution::Uniform { low: 0.7, high: 0.95 };
        assert!(uniform.contains(0.8));
        assert!(!uniform.contains(0.96));

        let ints = Distribution::IntUniform { low: 0, high: 5 };
        assert!(ints.contains(5.0));
        assert!(!ints.contains(2.5));
        assert!(!ints.contains(-1.0));
    }

    #[test]
    fn test_space_validation() {
        let ok = SearchSpace::new(
            ModelKind::Prophet,
            vec![ParamSpec::log_uniform("changepoint_prior_scale", 0.001, 0.5)],
        );
        assert!(ok.validate().is_ok());

        let zero_log = SearchSpace::new(
            ModelKind::Prophet,
            vec![ParamSpec::log_uniform("changepoint_prior_scale", 0.0, 0.5)],
        );
        assert!(matches!(zero_log.validate(), Err(TuningError::InvalidConfig(_))));

        let reversed = SearchSpace::new(ModelKind::Arima, vec![ParamSpec::int_uniform("p", 5, 0)]);
        assert!(reversed.validate().is_err());

        let empty = SearchSpace::new(ModelKind::Arima, vec![]);
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_space_contains() {
        let space = SearchSpace::new(
            ModelKind::Arima,
            vec![ParamSpec::int_uniform("p", 0, 5), ParamSpec::int_uniform("d", 0, 2)],
        );
        let inside = HyperparameterSet::new(ModelKind::Arima).with("p", 3.0).with("d", 1.0);
        let missing = HyperparameterSet::new(ModelKind::Arima).with("p", 3.0);
        let wrong_kind = HyperparameterSet::new(ModelKind::Prophet).with("p", 3.0).with("d", 1.0);
        assert!(space.contains(&inside));
        assert!(!space.contains(&missing));
        assert!(!space.contains(&wrong_kind));
    }

    #[test]
    fn test_failed_trial_scores_infinity() {
        let trial = Trial {
            number: 0,
            params: HyperparameterSet::new(ModelKind::Arima),
            outcome: TrialOutcome::Failed("singular".into()),
        };
        assert_eq!(trial.score(), f64::INFINITY);
    }

    #[test]
    fn test_model_error_conversion() {
        let err: TuningError = TsError::NotFitted.into();
        assert_eq!(err.to_string(), TsError::NotFitted.to_string());
    }
}
