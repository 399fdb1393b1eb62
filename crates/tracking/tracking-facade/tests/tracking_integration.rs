//! Integration tests for the tracking facade

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracking_facade::{
    ExperimentRecorder, FileStore, Figure, Result, RunStatus, Table, TrackingBackend,
    TrackingConfigBuilder, TrackingError,
};

struct SquareImage;

impl Figure for SquareImage {
    fn render(&self, path: &Path) -> Result<()> {
        fs::write(path, [0x89, b'P', b'N', b'G'])?;
        Ok(())
    }
}

fn sample_table(rows: usize) -> Table {
    let mut table = Table::new(["ds"]);
    for i in 0..rows {
        table.push_row([format!("1949-{:02}-01", i % 12 + 1)]).unwrap();
    }
    table
}

#[test]
fn test_full_run_on_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = TrackingConfigBuilder::new()
        .tracking_dir(dir.path().join("mlruns"))
        .staging_dir(dir.path().join("staging"))
        .build()
        .unwrap();
    let mut recorder = ExperimentRecorder::from_config(&config);

    let ctx = recorder
        .open_run(&config.experiment, "air_passengers_Prophet", None, true)
        .unwrap();
    recorder
        .log_metrics(
            &ctx,
            &BTreeMap::from([("mse".to_string(), 4.0), ("rmse".to_string(), 2.0)]),
        )
        .unwrap();
    recorder
        .log_params(
            &ctx,
            &BTreeMap::from([("changepoint_prior_scale".to_string(), "0.05".to_string())]),
            "prophet_params",
        )
        .unwrap();
    recorder.log_table(&ctx, &sample_table(10), "X_sample.csv").unwrap();
    recorder.log_figure(&ctx, SquareImage, "forecast_plot.png").unwrap();

    let model = dir.path().join("air_passengers_prophet_model.json");
    fs::write(&model, "{\"model\":\"prophet\"}").unwrap();
    recorder.log_file(&ctx, &model, Some("prophet_model.json")).unwrap();

    let ctx = recorder.finish_run(ctx, RunStatus::Finished).unwrap();

    let store = recorder.backend();
    assert_eq!(store.run_status(&ctx.run_id).unwrap(), RunStatus::Finished);
    assert_eq!(store.metrics(&ctx.run_id).unwrap()["rmse"], 2.0);
    assert_eq!(
        store.params(&ctx.run_id).unwrap()["prophet_params_changepoint_prior_scale"],
        "0.05"
    );
    assert_eq!(
        store.artifacts(&ctx.run_id).unwrap(),
        vec![
            "X_sample.csv".to_string(),
            "forecast_plot.png".to_string(),
            "prophet_model.json/air_passengers_prophet_model.json".to_string(),
        ]
    );

    let csv = fs::read_to_string(Path::new(&ctx.artifact_uri).join("X_sample.csv")).unwrap();
    assert_eq!(csv.lines().count(), 11);
    assert_eq!(fs::read_dir(dir.path().join("staging")).unwrap().count(), 0);
}

#[test]
fn test_run_meta_is_json() {
    let dir = tempfile::tempdir().unwrap();
    let mut recorder = ExperimentRecorder::new(FileStore::new(dir.path()));
    let ctx = recorder.open_run("Forecasting", "sunspots_ARIMA", None, false).unwrap();
    let ctx = recorder.finish_run(ctx, RunStatus::Failed).unwrap();

    let meta_path = dir
        .path()
        .join(&ctx.experiment_id)
        .join(&ctx.run_id)
        .join("meta.json");
    let meta: serde_json::Value = serde_json::from_str(&fs::read_to_string(meta_path).unwrap()).unwrap();
    assert_eq!(meta["status"], "failed");
    assert_eq!(meta["run_name"], "sunspots_ARIMA");
    assert!(meta["end_time"].is_i64());
}

#[test]
fn test_reuse_semantics_on_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut recorder = ExperimentRecorder::new(FileStore::new(dir.path()));
    let ctx = recorder.open_run("Forecasting", "covid_us_Prophet", None, true).unwrap();

    let same = recorder
        .open_run("Forecasting", "covid_us_Prophet", Some(ctx.clone()), true)
        .unwrap();
    assert_eq!(same.run_id, ctx.run_id);

    let err = recorder
        .open_run("Forecasting", "covid_us_Prophet", Some(ctx.clone()), false)
        .unwrap_err();
    assert_eq!(err, TrackingError::RunAlreadyActive { run_id: ctx.run_id });
}

#[test]
fn test_runs_share_experiment_across_recorders() {
    let dir = tempfile::tempdir().unwrap();
    let first = ExperimentRecorder::new(FileStore::new(dir.path()))
        .open_run("Forecasting", "a", None, false)
        .unwrap();
    let second = ExperimentRecorder::new(FileStore::new(dir.path()))
        .open_run("Forecasting", "b", None, false)
        .unwrap();
    assert_eq!(first.experiment_id, second.experiment_id);
    assert_ne!(first.run_id, second.run_id);
}
