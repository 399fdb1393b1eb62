//! Integration tests for the tuning facade

use algorithm_spi::{HyperparameterSet, ModelKind, Timestamp};
use chrono::NaiveDate;
use tuning_facade::{
    arima_search_space, optimize_arima_order, optimize_prophet_params, prophet_search_space,
    ArimaObjective, FailurePolicy, Objective, ProphetObjective, RandomSearch, SearchConfig,
    TrialOutcome, TuningError,
};

fn monthly_dates(n: i32) -> Vec<Timestamp> {
    (0..n)
        .map(|m| {
            NaiveDate::from_ymd_opt(1990 + m / 12, (m % 12) as u32 + 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        })
        .collect()
}

fn airline_like(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            120.0 + 2.0 * t + 25.0 * (t * std::f64::consts::PI / 6.0).sin()
        })
        .collect()
}

#[test]
fn test_budget_of_one_runs_one_trial_in_bounds() {
    let ds = monthly_dates(48);
    let y = airline_like(48);
    let config = SearchConfig::new(1).with_seed(5);

    let prophet = optimize_prophet_params(&ds, &y, &config).unwrap();
    assert_eq!(prophet.trials.len(), 1);
    assert!(prophet_search_space().contains(&prophet.best_params));
    assert_eq!(prophet.best_params.kind(), ModelKind::Prophet);

    let arima = optimize_arima_order(&y, &config).unwrap();
    assert_eq!(arima.trials.len(), 1);
    assert!(arima_search_space().contains(&arima.best_params));
}

#[test]
fn test_all_failing_arima_returns_first_trial() {
    let y = vec![5.0, 6.0, 7.0, 8.0];
    let result = optimize_arima_order(&y, &SearchConfig::new(6).with_seed(2)).unwrap();

    assert_eq!(result.trials.len(), 6);
    assert_eq!(result.failed_trials(), 6);
    assert_eq!(result.best_score, f64::INFINITY);
    assert_eq!(result.best_params, result.trials[0].params);
}

#[test]
fn test_abort_policy_propagates_first_failure() {
    let ds = monthly_dates(36);
    let mut y = airline_like(36);
    y[0] = f64::NAN;

    let err = optimize_prophet_params(&ds, &y, &SearchConfig::new(5).with_seed(3)).unwrap_err();
    match err {
        TuningError::TrialFailed { trial, reason } => {
            assert_eq!(trial, 0);
            assert!(reason.contains("NaN"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_zero_budget_is_invalid_config() {
    let y = airline_like(30);
    assert!(matches!(
        optimize_arima_order(&y, &SearchConfig::new(0)),
        Err(TuningError::InvalidConfig(_))
    ));
}

#[test]
fn test_prophet_search_needs_enough_rows_for_folds() {
    let ds = monthly_dates(3);
    let y = airline_like(3);
    assert!(matches!(
        optimize_prophet_params(&ds, &y, &SearchConfig::new(2)),
        Err(TuningError::InsufficientData { required: 4, got: 3 })
    ));
}

#[test]
fn test_same_seed_same_history() {
    let y = airline_like(40);
    let config = SearchConfig::new(4).with_seed(99);
    let a = optimize_arima_order(&y, &config).unwrap();
    let b = optimize_arima_order(&y, &config).unwrap();
    let orders = |r: &tuning_facade::SearchResult| -> Vec<HyperparameterSet> {
        r.trials.iter().map(|t| t.params.clone()).collect()
    };
    assert_eq!(orders(&a), orders(&b));
}

#[test]
fn test_objective_policies() {
    let ds = monthly_dates(24);
    let y = airline_like(24);
    assert_eq!(
        ProphetObjective::new(&ds, &y, 3).unwrap().failure_policy(),
        FailurePolicy::Abort
    );
    assert_eq!(ArimaObjective::new(&y).failure_policy(), FailurePolicy::ScoreAsInfinity);
}

#[test]
fn test_best_trial_has_lowest_score() {
    let y = airline_like(60);
    let result = RandomSearch::new(8)
        .with_seed(4)
        .run(&ArimaObjective::new(&y))
        .unwrap();
    for trial in &result.trials {
        assert!(result.best_score <= trial.score());
        if let TrialOutcome::Success(score) = trial.outcome {
            assert!(score >= 0.0);
        }
    }
}
