//! Tracking configuration types.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default root of the file store.
pub const DEFAULT_TRACKING_DIR: &str = "mlruns";
/// Experiment that training runs are grouped under.
pub const DEFAULT_EXPERIMENT: &str = "Forecasting";

/// Configuration for the experiment recorder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Root directory of the file store
    pub tracking_dir: PathBuf,
    /// Experiment name runs are opened in
    pub experiment: String,
    /// Directory for scoped temporary artifact files; system temp dir if unset
    pub staging_dir: Option<PathBuf>,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            tracking_dir: PathBuf::from(DEFAULT_TRACKING_DIR),
            experiment: DEFAULT_EXPERIMENT.to_string(),
            staging_dir: None,
        }
    }
}

impl TrackingConfig {
    /// Create a configuration rooted at `tracking_dir`.
    pub fn new(tracking_dir: impl AsRef<Path>) -> Self {
        Self {
            tracking_dir: tracking_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }
}

/// Builder for TrackingConfig.
#[derive(Debug, Default)]
pub struct TrackingConfigBuilder {
    tracking_dir: Option<PathBuf>,
    experiment: Option<String>,
    staging_dir: Option<PathBuf>,
}

impl TrackingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracking_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.tracking_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn experiment(mut self, name: &str) -> Self {
        self.experiment = Some(name.to_string());
        self
    }

    pub fn staging_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.staging_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<TrackingConfig, &'static str> {
        let defaults = TrackingConfig::default();
        let tracking_dir = self.tracking_dir.unwrap_or(defaults.tracking_dir);
        if tracking_dir.as_os_str().is_empty() {
            return Err("tracking_dir must not be empty");
        }
        let experiment = self.experiment.unwrap_or(defaults.experiment);
        if experiment.trim().is_empty() {
            return Err("experiment must not be empty");
        }
        Ok(TrackingConfig {
            tracking_dir,
            experiment,
            staging_dir: self.staging_dir,
        })
    }
}
