//! End-to-end tests for algorithm crate
//!
//! Tests complete forecasting workflows using only this crate's API.

use algorithm_core::prelude::*;
use algorithm_core::utils::metrics::{mae, rmse};
use algorithm_spi::Timestamp;
use chrono::NaiveDate;

fn monthly_dates(n: i32) -> Vec<Timestamp> {
    (0..n)
        .map(|m| {
            NaiveDate::from_ymd_opt(1949 + m / 12, (m % 12) as u32 + 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        })
        .collect()
}

fn trend_data() -> Vec<f64> {
    (0..100).map(|i| 50.0 + 0.5 * i as f64).collect()
}

fn seasonal_data(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            100.0 + t * 0.8 + 15.0 * (t * std::f64::consts::PI / 6.0).sin()
        })
        .collect()
}

#[test]
fn e2e_arima_forecast_workflow() {
    let data = trend_data();
    let train = &data[..80];
    let test = &data[80..];

    let mut model = Arima::new(1, 1, 0).unwrap();
    assert!(!model.is_fitted());

    model.fit(train).unwrap();
    assert!(model.is_fitted());

    let predictions = model.predict(test.len()).unwrap();
    assert_eq!(predictions.len(), test.len());

    let error = mae(test, &predictions);
    assert!(error < 1e-6, "ARIMA MAE {} too high for linear trend", error);
}

#[test]
fn e2e_auto_arima_in_sample_workflow() {
    let y: Vec<f64> = (0..24).map(|i| 120.0 + 5.0 * i as f64).collect();
    let ds = monthly_dates(24);

    let mut model = ModelFactory::default_for(ModelKind::Arima).unwrap();
    model.fit_series(&ds, &y).unwrap();

    let fitted = model.predict_in_sample().unwrap();
    let report = evaluate_forecast(&y, &fitted).unwrap();
    let range = y[23] - y[0];
    assert!(report.rmse < 0.05 * range, "rmse {} too high", report.rmse);
}

#[test]
fn e2e_prophet_holdout_workflow() {
    let data = seasonal_data(120);
    let ds = monthly_dates(120);

    let mut model = ModelFactory::default_for(ModelKind::Prophet).unwrap();
    model.fit_series(&ds[..96], &data[..96]).unwrap();

    let predictions = model.predict_at(&ds[96..]).unwrap();
    assert_eq!(predictions.len(), 24);

    let error = rmse(&data[96..], &predictions);
    assert!(error < 10.0, "additive model RMSE {} too high", error);
}

#[test]
fn e2e_model_comparison_workflow() {
    let data = seasonal_data(72);
    let ds = monthly_dates(72);

    let candidates = vec![
        HyperparameterSet::new(ModelKind::Prophet),
        HyperparameterSet::new(ModelKind::Prophet).with("changepoint_prior_scale", 0.3),
        HyperparameterSet::new(ModelKind::Arima),
        HyperparameterSet::new(ModelKind::Arima)
            .with("p", 2.0)
            .with("d", 1.0)
            .with("q", 1.0),
    ];

    for params in candidates {
        let mut model = ModelFactory::build(params.kind(), &params).unwrap();
        model.fit_series(&ds, &data).unwrap();
        let fitted = model.predict_in_sample().unwrap();
        let report = evaluate_forecast(&data, &fitted).unwrap();
        assert!(report.rmse.is_finite(), "{} produced invalid RMSE", params.kind());
        assert!(!model.describe().is_empty());
    }
}

#[test]
fn e2e_persisted_model_workflow() {
    let data = seasonal_data(48);
    let ds = monthly_dates(48);

    let mut model = ModelFactory::default_for(ModelKind::Arima).unwrap();
    model.fit_series(&ds, &data).unwrap();

    let restored = ForecastModel::from_json(&model.to_json().unwrap()).unwrap();
    assert!(restored.is_fitted());
    assert_eq!(restored.describe(), model.describe());
}

#[test]
fn e2e_metrics_workflow() {
    let actual: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
    let predicted: Vec<f64> = actual.iter().map(|x| x + 1.0).collect();

    let report = evaluate_forecast(&actual, &predicted).unwrap();
    assert!((report.mae - 1.0).abs() < 1e-12);
    assert!((report.mse - 1.0).abs() < 1e-12);
    assert!((report.rmse - 1.0).abs() < 1e-12);

    assert!(matches!(
        evaluate_forecast(&actual, &predicted[..19]),
        Err(TsError::LengthMismatch { .. })
    ));
}
