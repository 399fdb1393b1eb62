//! Forecasting objectives for the random search.
//!
//! - [`ProphetObjective`]: mean held-out MSE over forward-chaining folds
//! - [`ArimaObjective`]: in-sample MSE of a fixed-order ARIMA fit

use algorithm_core::utils::metrics::mse;
use algorithm_core::{Arima, ModelFactory};
use algorithm_spi::{
    Forecaster, HyperparameterSet, ModelKind, Predictor, Timestamp, TsError,
};
use tuning_api::SearchConfig;
use tuning_spi::{
    FailurePolicy, Objective, ParamSpec, Result, SearchResult, SearchSpace, TrialOutcome,
    ValidationSplit, Validator,
};

use crate::random_search::RandomSearch;
use crate::validation::TimeSeriesSplit;

/// Integer bounds of the ARIMA order search.
pub const ARIMA_P_RANGE: (i64, i64) = (0, 5);
pub const ARIMA_D_RANGE: (i64, i64) = (0, 2);
pub const ARIMA_Q_RANGE: (i64, i64) = (0, 5);

/// Parameters sampled by the additive model search.
pub fn prophet_search_space() -> SearchSpace {
    SearchSpace::new(
        ModelKind::Prophet,
        vec![
            ParamSpec::log_uniform("changepoint_prior_scale", 0.001, 0.5),
            ParamSpec::uniform("interval_width", 0.7, 0.95),
        ],
    )
}

/// Orders sampled by the ARIMA search.
pub fn arima_search_space() -> SearchSpace {
    SearchSpace::new(
        ModelKind::Arima,
        vec![
            ParamSpec::int_uniform("p", ARIMA_P_RANGE.0, ARIMA_P_RANGE.1),
            ParamSpec::int_uniform("d", ARIMA_D_RANGE.0, ARIMA_D_RANGE.1),
            ParamSpec::int_uniform("q", ARIMA_Q_RANGE.0, ARIMA_Q_RANGE.1),
        ],
    )
}

fn score(value: f64) -> TrialOutcome {
    if value.is_finite() {
        TrialOutcome::Success(value)
    } else {
        TrialOutcome::Failed(format!("non-finite score {}", value))
    }
}

/// Cross-validated additive model objective.
///
/// Each fold fits with yearly seasonality on and weekly and daily
/// seasonality off.
pub struct ProphetObjective<'a> {
    ds: &'a [Timestamp],
    y: &'a [f64],
    splits: Vec<ValidationSplit>,
    space: SearchSpace,
}

impl<'a> ProphetObjective<'a> {
    pub fn new(ds: &'a [Timestamp], y: &'a [f64], cv_splits: usize) -> Result<Self> {
        if ds.len() != y.len() {
            return Err(TsError::LengthMismatch {
                expected: ds.len(),
                actual: y.len(),
            }
            .into());
        }
        let splits = TimeSeriesSplit::new(cv_splits).splits(y.len())?;
        Ok(Self {
            ds,
            y,
            splits,
            space: prophet_search_space(),
        })
    }

    pub fn splits(&self) -> &[ValidationSplit] {
        &self.splits
    }

    fn fold_mse(&self, params: &HyperparameterSet, split: &ValidationSplit) -> algorithm_spi::Result<f64> {
        let mut model = ModelFactory::build(ModelKind::Prophet, params)?;
        model.fit_series(
            &self.ds[split.train_start..split.train_end],
            &self.y[split.train_start..split.train_end],
        )?;
        let predicted = model.predict_at(&self.ds[split.test_start..split.test_end])?;
        Ok(mse(&self.y[split.test_start..split.test_end], &predicted))
    }
}

impl Objective for ProphetObjective<'_> {
    fn space(&self) -> &SearchSpace {
        &self.space
    }

    fn evaluate(&self, params: &HyperparameterSet) -> TrialOutcome {
        let fold_params = params
            .clone()
            .with("yearly_seasonality", 1.0)
            .with("weekly_seasonality", 0.0)
            .with("daily_seasonality", 0.0);

        let mut total = 0.0;
        for split in &self.splits {
            match self.fold_mse(&fold_params, split) {
                Ok(fold) => total += fold,
                Err(e) => return TrialOutcome::Failed(e.to_string()),
            }
        }
        score(total / self.splits.len() as f64)
    }

    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Abort
    }
}

/// In-sample ARIMA order objective.
pub struct ArimaObjective<'a> {
    y: &'a [f64],
    space: SearchSpace,
}

impl<'a> ArimaObjective<'a> {
    pub fn new(y: &'a [f64]) -> Self {
        Self {
            y,
            space: arima_search_space(),
        }
    }

    fn in_sample_mse(&self, params: &HyperparameterSet) -> algorithm_spi::Result<f64> {
        let order = |name: &str| -> algorithm_spi::Result<usize> {
            params.get_usize(name)?.ok_or_else(|| TsError::InvalidParameter {
                name: name.to_string(),
                reason: "missing from sampled order".to_string(),
            })
        };
        let mut model = Arima::new(order("p")?, order("d")?, order("q")?)?;
        model.fit(self.y)?;
        let fitted = model.fitted_values()?;
        Ok(mse(self.y, &fitted))
    }
}

impl Objective for ArimaObjective<'_> {
    fn space(&self) -> &SearchSpace {
        &self.space
    }

    fn evaluate(&self, params: &HyperparameterSet) -> TrialOutcome {
        match self.in_sample_mse(params) {
            Ok(value) => score(value),
            Err(e) => TrialOutcome::Failed(e.to_string()),
        }
    }

    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::ScoreAsInfinity
    }
}

/// Search `changepoint_prior_scale` and `interval_width` for the additive
/// model by cross-validated MSE.
pub fn optimize_prophet_params(
    ds: &[Timestamp],
    y: &[f64],
    config: &SearchConfig,
) -> Result<SearchResult> {
    let objective = ProphetObjective::new(ds, y, config.cv_splits)?;
    RandomSearch::from_config(config).run(&objective)
}

/// Search the ARIMA `(p, d, q)` order by in-sample MSE.
pub fn optimize_arima_order(y: &[f64], config: &SearchConfig) -> Result<SearchResult> {
    RandomSearch::from_config(config).run(&ArimaObjective::new(y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tuning_spi::TuningError;

    fn monthly(n: i32) -> Vec<Timestamp> {
        (0..n)
            .map(|m| {
                NaiveDate::from_ymd_opt(2000 + m / 12, (m % 12) as u32 + 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            })
            .collect()
    }

    fn seasonal(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let t = i as f64;
                200.0 + 1.5 * t + 20.0 * (t * std::f64::consts::PI / 6.0).sin()
            })
            .collect()
    }

    #[test]
    fn test_prophet_objective_scores_finite() {
        let ds = monthly(72);
        let y = seasonal(72);
        let objective = ProphetObjective::new(&ds, &y, 3).unwrap();
        assert_eq!(objective.splits().len(), 3);

        let params = HyperparameterSet::new(ModelKind::Prophet)
            .with("changepoint_prior_scale", 0.05)
            .with("interval_width", 0.8);
        match objective.evaluate(&params) {
            TrialOutcome::Success(mse) => assert!(mse.is_finite() && mse >= 0.0),
            TrialOutcome::Failed(reason) => panic!("trial failed: {}", reason),
        }
    }

    #[test]
    fn test_prophet_objective_length_mismatch() {
        let ds = monthly(10);
        let y = seasonal(9);
        assert!(matches!(
            ProphetObjective::new(&ds, &y, 3),
            Err(TuningError::Model(TsError::LengthMismatch { .. }))
        ));
    }

    #[test]
    fn test_arima_objective_scores_valid_order() {
        let y = seasonal(60);
        let objective = ArimaObjective::new(&y);
        let params = HyperparameterSet::new(ModelKind::Arima)
            .with("p", 1.0)
            .with("d", 1.0)
            .with("q", 0.0);
        assert!(objective.evaluate(&params).is_success());
        assert_eq!(objective.failure_policy(), FailurePolicy::ScoreAsInfinity);
    }

    #[test]
    fn test_arima_objective_reports_failure() {
        let y = vec![1.0, 2.0, 3.0];
        let objective = ArimaObjective::new(&y);
        let params = HyperparameterSet::new(ModelKind::Arima)
            .with("p", 1.0)
            .with("d", 0.0)
            .with("q", 0.0);
        assert!(matches!(objective.evaluate(&params), TrialOutcome::Failed(_)));
    }

    #[test]
    fn test_optimize_arima_order_in_bounds() {
        let y = seasonal(60);
        let result = optimize_arima_order(&y, &SearchConfig::new(5).with_seed(11)).unwrap();
        assert_eq!(result.evaluations(), 5);
        assert!(arima_search_space().contains(&result.best_params));
    }
}
