//! Tracking backend contract.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;
use crate::model::{RunContext, RunStatus};

/// Storage for experiments, runs and the records logged to them.
///
/// Experiments are looked up by name; runs by the id the backend assigns
/// when the run starts.
pub trait TrackingBackend {
    /// Short backend name for logging.
    fn name(&self) -> &str;

    /// Id of the experiment called `name`, creating it if needed.
    fn get_or_create_experiment(&mut self, name: &str) -> Result<String>;

    /// Start a new run in `experiment_id`; the returned context is running.
    fn start_run(&mut self, experiment_id: &str, run_name: &str) -> Result<RunContext>;

    /// Current status of a run.
    fn run_status(&self, run_id: &str) -> Result<RunStatus>;

    /// Move a run to its final status.
    fn set_run_status(&mut self, run_id: &str, status: RunStatus) -> Result<()>;

    /// Record a metric value, replacing any earlier value under `key`.
    fn log_metric(&mut self, run_id: &str, key: &str, value: f64) -> Result<()>;

    /// Record a parameter value.
    fn log_param(&mut self, run_id: &str, key: &str, value: &str) -> Result<()>;

    /// Copy a local file into the run's artifacts, optionally under a
    /// sub-directory.
    fn log_artifact(
        &mut self,
        run_id: &str,
        local_path: &Path,
        artifact_dir: Option<&str>,
    ) -> Result<()>;

    /// Latest value of every metric logged to a run.
    fn metrics(&self, run_id: &str) -> Result<BTreeMap<String, f64>>;

    /// Every parameter logged to a run.
    fn params(&self, run_id: &str) -> Result<BTreeMap<String, String>>;

    /// Relative artifact paths of a run, `/`-separated and sorted.
    fn artifacts(&self, run_id: &str) -> Result<Vec<String>>;
}
