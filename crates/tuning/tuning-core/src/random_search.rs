//! Seeded random search.

use algorithm_spi::HyperparameterSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};
use tuning_api::SearchConfig;
use tuning_spi::{
    Distribution, FailurePolicy, Objective, Result, SearchResult, SearchSpace, Trial,
    TrialOutcome, TuningError,
};

/// Draw one parameter set from `space`.
pub fn sample_space<R: Rng + ?Sized>(space: &SearchSpace, rng: &mut R) -> HyperparameterSet {
    let mut set = HyperparameterSet::new(space.kind());
    for spec in space.params() {
        let value = match spec.distribution {
            Distribution::Uniform { low, high } => rng.gen_range(low..=high),
            Distribution::LogUniform { low, high } => rng
                .gen_range(low.ln()..=high.ln())
                .exp()
                .clamp(low, high),
            Distribution::IntUniform { low, high } => rng.gen_range(low..=high) as f64,
        };
        set.insert(&spec.name, value);
    }
    set
}

/// Minimizes an [`Objective`] over a fixed number of independently sampled
/// trials.
#[derive(Debug, Clone)]
pub struct RandomSearch {
    n_trials: usize,
    seed: Option<u64>,
}

impl RandomSearch {
    pub fn new(n_trials: usize) -> Self {
        Self {
            n_trials,
            seed: None,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            n_trials: config.n_trials,
            seed: config.seed,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn n_trials(&self) -> usize {
        self.n_trials
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Run the search.
    ///
    /// Under [`FailurePolicy::Abort`] the first failed trial ends the search
    /// with [`TuningError::TrialFailed`]. Under
    /// [`FailurePolicy::ScoreAsInfinity`] failures score +∞; if every trial
    /// fails the first trial is returned.
    pub fn run(&self, objective: &dyn Objective) -> Result<SearchResult> {
        if self.n_trials == 0 {
            return Err(TuningError::InvalidConfig(
                "trial budget must be at least 1".into(),
            ));
        }
        let space = objective.space();
        space.validate()?;

        let policy = objective.failure_policy();
        info!(
            kind = %space.kind(),
            trials = self.n_trials,
            seed = ?self.seed,
            ?policy,
            "starting random search"
        );

        let mut rng = self.rng();
        let mut trials: Vec<Trial> = Vec::with_capacity(self.n_trials);
        let mut best_idx = 0;

        for number in 0..self.n_trials {
            let params = sample_space(space, &mut rng);
            let outcome = objective.evaluate(&params);

            if let TrialOutcome::Failed(reason) = &outcome {
                match policy {
                    FailurePolicy::Abort => {
                        return Err(TuningError::TrialFailed {
                            trial: number,
                            reason: reason.clone(),
                        });
                    }
                    FailurePolicy::ScoreAsInfinity => {
                        warn!(trial = number, %reason, "trial failed, scored as infinity");
                    }
                }
            }

            let trial = Trial {
                number,
                params,
                outcome,
            };
            debug!(trial = number, score = trial.score(), "trial evaluated");

            if let Some(best) = trials.get(best_idx) {
                if trial.score() < best.score() {
                    best_idx = trials.len();
                }
            }
            trials.push(trial);
        }

        let best = &trials[best_idx];
        let result = SearchResult {
            best_params: best.params.clone(),
            best_score: best.score(),
            trials,
        };
        info!(
            best_trial = best_idx,
            best_score = result.best_score,
            failed = result.failed_trials(),
            "random search finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algorithm_spi::ModelKind;
    use std::cell::Cell;
    use tuning_spi::ParamSpec;

    struct Quadratic {
        space: SearchSpace,
        calls: Cell<usize>,
    }

    impl Quadratic {
        fn new() -> Self {
            Self {
                space: SearchSpace::new(
                    ModelKind::Prophet,
                    vec![
                        ParamSpec::uniform("x", -1.0, 1.0),
                        ParamSpec::log_uniform("scale", 0.001, 0.5),
                    ],
                ),
                calls: Cell::new(0),
            }
        }
    }

    impl Objective for Quadratic {
        fn space(&self) -> &SearchSpace {
            &self.space
        }

        fn evaluate(&self, params: &HyperparameterSet) -> TrialOutcome {
            self.calls.set(self.calls.get() + 1);
            TrialOutcome::Success(params.get_or("x", 0.0).powi(2))
        }

        fn failure_policy(&self) -> FailurePolicy {
            FailurePolicy::Abort
        }
    }

    #[test]
    fn test_seeded_search_is_reproducible() {
        let objective = Quadratic::new();
        let a = RandomSearch::new(10).with_seed(7).run(&objective).unwrap();
        let b = RandomSearch::new(10).with_seed(7).run(&objective).unwrap();
        assert_eq!(a, b);
        assert_eq!(objective.calls.get(), 20);
    }

    #[test]
    fn test_best_is_minimum() {
        let objective = Quadratic::new();
        let result = RandomSearch::new(25).with_seed(1).run(&objective).unwrap();
        let min = result
            .trials
            .iter()
            .map(Trial::score)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(result.best_score, min);
        assert!(objective.space().contains(&result.best_params));
    }

    #[test]
    fn test_samples_stay_in_bounds() {
        let space = SearchSpace::new(
            ModelKind::Arima,
            vec![
                ParamSpec::int_uniform("p", 0, 5),
                ParamSpec::log_uniform("s", 0.001, 0.5),
                ParamSpec::uniform("w", 0.7, 0.95),
            ],
        );
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            assert!(space.contains(&sample_space(&space, &mut rng)));
        }
    }

    #[test]
    fn test_zero_budget_rejected() {
        let objective = Quadratic::new();
        assert!(matches!(
            RandomSearch::new(0).run(&objective),
            Err(TuningError::InvalidConfig(_))
        ));
        assert_eq!(objective.calls.get(), 0);
    }

    #[test]
    fn test_from_config() {
        let search = RandomSearch::from_config(&SearchConfig::new(4).with_seed(9));
        assert_eq!(search.n_trials(), 4);
        assert_eq!(search.seed, Some(9));
    }
}
