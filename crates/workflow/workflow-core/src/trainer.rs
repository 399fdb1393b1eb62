//! Trainer
//!
//! Fits one model on a whole dataset and records the run: parameters,
//! in-sample metrics, the persisted model, data samples and a
//! forecast-vs-actual chart.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use algorithm_core::{evaluate_forecast, ForecastModel, IntervalForecast, ModelFactory};
use algorithm_spi::{Forecaster, HyperparameterSet, ModelKind};
use data_core::{DatasetLoader, HttpSource};
use chrono::NaiveTime;
use data_spi::{format_timestamp, Dataset, RemoteSource};
use tracing::{info, warn};
use tracking_core::{ExperimentRecorder, FileStore};
use tracking_spi::{RunContext, Table, TrackingBackend, TrackingError};
use tuning_api::SearchConfig;
use tuning_core::{optimize_arima_order, optimize_prophet_params, SearchResult};
use workflow_api::WorkflowConfig;
use workflow_spi::{Result, TrainOutcome, TrainRequest, WorkflowError};

use crate::plots::ForecastPlot;

/// Rows of input and target logged as samples.
pub const SAMPLE_ROWS: usize = 10;

/// Column types of the normalized table, with the source column names.
pub fn dataset_schema(dataset: &Dataset) -> BTreeMap<String, String> {
    let time_type = if dataset.timestamps().iter().all(|ts| ts.time() == NaiveTime::default()) {
        "date"
    } else {
        "datetime"
    };
    BTreeMap::from([
        ("ds".to_string(), time_type.to_string()),
        ("ds_source".to_string(), dataset.time_column().to_string()),
        ("y".to_string(), "float64".to_string()),
        ("y_source".to_string(), dataset.value_column().to_string()),
    ])
}

/// Parse a model kind, mapping failures to [`WorkflowError::UnsupportedModel`].
pub fn parse_model_kind(raw: &str) -> Result<ModelKind> {
    raw.parse()
        .map_err(|_| WorkflowError::UnsupportedModel(raw.to_string()))
}

/// A dataset loaded and a run opened, ready for fitting.
#[derive(Debug, Clone)]
pub struct TrainingRun {
    pub kind: ModelKind,
    pub dataset: Dataset,
    pub run: RunContext,
}

struct FittedModel {
    model: ForecastModel,
    params: BTreeMap<String, String>,
    params_prefix: &'static str,
    label: &'static str,
}

/// Trains and records forecasting models.
pub struct Trainer<S: RemoteSource = HttpSource, B: TrackingBackend = FileStore> {
    config: WorkflowConfig,
    loader: DatasetLoader<S>,
    recorder: ExperimentRecorder<B>,
}

impl Trainer<HttpSource, FileStore> {
    /// Trainer that downloads over HTTP and records to the file store.
    pub fn from_config(config: WorkflowConfig) -> Self {
        let loader = DatasetLoader::from_config(config.data.clone());
        let recorder = ExperimentRecorder::from_config(&config.tracking);
        Self::new(config, loader, recorder)
    }
}

impl<S: RemoteSource, B: TrackingBackend> Trainer<S, B> {
    pub fn new(config: WorkflowConfig, loader: DatasetLoader<S>, recorder: ExperimentRecorder<B>) -> Self {
        Self {
            config,
            loader,
            recorder,
        }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn loader(&self) -> &DatasetLoader<S> {
        &self.loader
    }

    pub fn recorder(&self) -> &ExperimentRecorder<B> {
        &self.recorder
    }

    pub fn recorder_mut(&mut self) -> &mut ExperimentRecorder<B> {
        &mut self.recorder
    }

    /// Train and record in one call; the run is left open.
    pub fn train(&mut self, request: &TrainRequest, active: Option<RunContext>) -> Result<TrainOutcome> {
        let run = self.start(request, active)?;
        self.fit_and_record(&run, request)
    }

    /// Parse the model kind, load the dataset and open the run.
    ///
    /// The model kind is checked before anything is fetched.
    pub fn start(&mut self, request: &TrainRequest, active: Option<RunContext>) -> Result<TrainingRun> {
        let kind = parse_model_kind(&request.model)?;
        let dataset = self.loader.fetch_dataset(&request.dataset)?;

        let run_name = format!("{}_{}", dataset.name(), kind);
        let run = self
            .recorder
            .open_run(&self.config.tracking.experiment, &run_name, active, true)?;

        Ok(TrainingRun { kind, dataset, run })
    }

    /// Fit on the full series, predict in-sample and record everything.
    pub fn fit_and_record(&mut self, run: &TrainingRun, request: &TrainRequest) -> Result<TrainOutcome> {
        let fitted = match run.kind {
            ModelKind::Prophet => self.fit_prophet(run, request)?,
            ModelKind::Arima => self.fit_auto_arima(run, request)?,
        };
        let predicted = fitted.model.predict_in_sample()?;
        let interval = match &fitted.model {
            ForecastModel::Prophet(m) => Some(m.predict_interval(run.dataset.timestamps())?),
            _ => None,
        };

        let model_path = self.persist(&fitted.model, run.dataset.name(), fitted.label)?;
        let artifact_dir = format!("{}_model.json", fitted.label);
        self.recorder
            .log_file(&run.run, &model_path, Some(&artifact_dir))?;
        self.recorder
            .log_params(&run.run, &fitted.params, fitted.params_prefix)?;

        let metrics = evaluate_forecast(run.dataset.values(), &predicted)?;
        self.recorder.log_metrics(&run.run, &metrics.as_map())?;

        self.log_samples(run)?;
        if let Some(interval) = &interval {
            self.log_interval(run, interval)?;
        }
        self.log_plot(run, &predicted, interval.as_ref())?;

        info!(dataset = run.dataset.name(), model = %run.kind, %metrics, "training finished");
        Ok(TrainOutcome {
            metrics,
            run: run.run.clone(),
            model_path,
        })
    }

    /// Run only the hyperparameter search for a request.
    pub fn tune(&self, request: &TrainRequest) -> Result<SearchResult> {
        let kind = parse_model_kind(&request.model)?;
        let dataset = self.loader.fetch_dataset(&request.dataset)?;
        let search = self.search_config(request);
        let result = match kind {
            ModelKind::Prophet => optimize_prophet_params(dataset.timestamps(), dataset.values(), &search)?,
            ModelKind::Arima => optimize_arima_order(dataset.values(), &search)?,
        };
        Ok(result)
    }

    fn search_config(&self, request: &TrainRequest) -> SearchConfig {
        SearchConfig {
            n_trials: request.n_trials,
            ..self.config.search.clone()
        }
    }

    fn fit_prophet(&self, run: &TrainingRun, request: &TrainRequest) -> Result<FittedModel> {
        info!(dataset = run.dataset.name(), "training additive model");
        let ds = run.dataset.timestamps();
        let y = run.dataset.values();

        let params = if request.optimize {
            let result = optimize_prophet_params(ds, y, &self.search_config(request))?;
            info!(
                best_score = result.best_score,
                params = ?result.best_params.to_string_map(),
                "optimal hyperparameters found"
            );
            result.best_params
        } else {
            HyperparameterSet::new(ModelKind::Prophet)
        };

        let mut model = ModelFactory::build(ModelKind::Prophet, &params)?;
        model.fit_series(ds, y)?;
        Ok(FittedModel {
            model,
            params: params.to_string_map(),
            params_prefix: "prophet_params",
            label: "prophet",
        })
    }

    fn fit_auto_arima(&self, run: &TrainingRun, request: &TrainRequest) -> Result<FittedModel> {
        info!(dataset = run.dataset.name(), "training AutoARIMA");
        if request.optimize {
            warn!("optimize has no effect for ARIMA, the order is selected by AutoARIMA");
        }

        let mut model = ModelFactory::default_for(ModelKind::Arima)?;
        model.fit_series(run.dataset.timestamps(), run.dataset.values())?;
        let params = model.describe();
        Ok(FittedModel {
            model,
            params,
            params_prefix: "autoarima_params",
            label: "autoarima",
        })
    }

    fn persist(&self, model: &ForecastModel, dataset: &str, label: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.config.models_dir)?;
        let path = self.config.model_path(dataset, label);
        fs::write(&path, model.to_json()?)?;
        info!(path = %path.display(), "model saved");
        Ok(path)
    }

    fn log_samples(&mut self, run: &TrainingRun) -> Result<()> {
        let head = run.dataset.head(SAMPLE_ROWS);

        let mut inputs = Table::new(["ds"]);
        let mut targets = Table::new(["y"]);
        for (ts, value) in &head {
            inputs.push_row([format_timestamp(ts)])?;
            targets.push_row([value.to_string()])?;
        }
        self.recorder.log_table(&run.run, &inputs, "X_sample.csv")?;
        self.recorder.log_table(&run.run, &targets, "y_sample.csv")?;

        self.recorder
            .log_params(&run.run, &dataset_schema(&run.dataset), "dataset_schema")?;
        Ok(())
    }

    /// In-sample prediction interval as `forecast_interval.csv`.
    fn log_interval(&mut self, run: &TrainingRun, interval: &IntervalForecast) -> Result<()> {
        let mut table = Table::new(["ds", "yhat", "yhat_lower", "yhat_upper"]);
        let rows = run
            .dataset
            .timestamps()
            .iter()
            .zip(&interval.yhat)
            .zip(interval.lower.iter().zip(&interval.upper));
        for ((ts, yhat), (lower, upper)) in rows {
            table.push_row([
                format_timestamp(ts),
                yhat.to_string(),
                lower.to_string(),
                upper.to_string(),
            ])?;
        }
        self.recorder
            .log_table(&run.run, &table, "forecast_interval.csv")?;
        Ok(())
    }

    fn log_plot(
        &mut self,
        run: &TrainingRun,
        predicted: &[f64],
        interval: Option<&IntervalForecast>,
    ) -> Result<()> {
        let title = format!("{} - {} Forecast", run.dataset.name(), run.kind);
        let mut plot = ForecastPlot::new(&title, run.dataset.timestamps(), run.dataset.values(), predicted);
        if let Some(interval) = interval {
            plot = plot.with_band(&interval.lower, &interval.upper);
        }
        match self.recorder.log_figure(&run.run, plot, "forecast_plot.png") {
            Err(TrackingError::Render(reason)) => {
                warn!(%reason, "forecast plot could not be rendered, skipping");
                Ok(())
            }
            other => Ok(other?),
        }
    }
}
