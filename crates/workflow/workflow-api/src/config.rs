//! Workflow configuration.
//!
//! Values come from defaults, overridden by the process environment. The
//! binary loads an optional `.env` file into the environment at startup.
//!
//! | Variable                | Field                    |
//! |-------------------------|--------------------------|
//! | `FORECAST_DATA_DIR`     | `data.processed_dir`     |
//! | `FORECAST_MODELS_DIR`   | `models_dir`             |
//! | `FORECAST_TRACKING_DIR` | `tracking.tracking_dir`  |
//! | `FORECAST_EXPERIMENT`   | `tracking.experiment`    |
//! | `FORECAST_CV_SPLITS`    | `search.cv_splits`       |
//! | `FORECAST_SEED`         | `search.seed`            |

use std::path::{Path, PathBuf};
use std::str::FromStr;

use data_api::DataConfig;
use serde::{Deserialize, Serialize};
use tracking_api::TrackingConfig;
use tuning_api::SearchConfig;
use workflow_spi::{Result, WorkflowError};

/// Default directory for persisted models.
pub const DEFAULT_MODELS_DIR: &str = "models";

/// Configuration of the whole training workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub data: DataConfig,
    pub models_dir: PathBuf,
    pub tracking: TrackingConfig,
    /// Search settings; the trial budget is taken from each request
    pub search: SearchConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            models_dir: PathBuf::from(DEFAULT_MODELS_DIR),
            tracking: TrackingConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

fn parse_var<T: FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| WorkflowError::Config(format!("{}='{}' is not a valid value", name, raw)))
}

impl WorkflowConfig {
    /// Read the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from a variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(dir) = lookup("FORECAST_DATA_DIR") {
            config.data.processed_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("FORECAST_MODELS_DIR") {
            config.models_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("FORECAST_TRACKING_DIR") {
            config.tracking.tracking_dir = PathBuf::from(dir);
        }
        if let Some(name) = lookup("FORECAST_EXPERIMENT") {
            config.tracking.experiment = name;
        }
        if let Some(raw) = lookup("FORECAST_CV_SPLITS") {
            config.search.cv_splits = parse_var("FORECAST_CV_SPLITS", &raw)?;
        }
        if let Some(raw) = lookup("FORECAST_SEED") {
            config.search.seed = Some(parse_var("FORECAST_SEED", &raw)?);
        }
        config.validate()?;
        Ok(config)
    }

    /// Every directory rooted under `root`; used by tests and sandboxes.
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let mut config = Self::default();
        config.data.processed_dir = root.join("data/processed");
        config.models_dir = root.join(DEFAULT_MODELS_DIR);
        config.tracking.tracking_dir = root.join("mlruns");
        config
    }

    /// Path of the persisted model for a dataset and model label.
    pub fn model_path(&self, dataset: &str, label: &str) -> PathBuf {
        self.models_dir.join(format!("{}_{}_model.json", dataset, label))
    }

    pub fn validate(&self) -> Result<()> {
        if self.search.cv_splits < 2 {
            return Err(WorkflowError::Config("cv_splits must be >= 2".into()));
        }
        if self.tracking.experiment.trim().is_empty() {
            return Err(WorkflowError::Config("experiment must not be empty".into()));
        }
        Ok(())
    }
}

/// Builder for WorkflowConfig.
#[derive(Debug, Default)]
pub struct WorkflowConfigBuilder {
    config: WorkflowConfig,
}

impl WorkflowConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(mut self, data: DataConfig) -> Self {
        self.config.data = data;
        self
    }

    pub fn models_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.models_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn tracking(mut self, tracking: TrackingConfig) -> Self {
        self.config.tracking = tracking;
        self
    }

    pub fn search(mut self, search: SearchConfig) -> Self {
        self.config.search = search;
        self
    }

    pub fn build(self) -> Result<WorkflowConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
