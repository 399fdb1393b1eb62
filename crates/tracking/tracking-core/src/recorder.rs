//! Experiment recorder
//!
//! Pushes parameters, metrics, tables, figures and files to a
//! [`TrackingBackend`]. Every operation takes the [`RunContext`] it acts on;
//! the recorder itself holds no notion of an active run.
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use tracking_core::{ExperimentRecorder, InMemoryStore};
//! use tracking_spi::RunStatus;
//!
//! let mut recorder = ExperimentRecorder::new(InMemoryStore::new());
//! let ctx = recorder.open_run("Forecasting", "demo", None, true).unwrap();
//! recorder
//!     .log_metrics(&ctx, &BTreeMap::from([("rmse".to_string(), 1.0)]))
//!     .unwrap();
//! let ctx = recorder.finish_run(ctx, RunStatus::Finished).unwrap();
//! assert_eq!(ctx.status, RunStatus::Finished);
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info, warn};
use tracking_api::TrackingConfig;
use tracking_spi::{Figure, Result, RunContext, RunStatus, Table, TrackingBackend, TrackingError};

use crate::file_store::FileStore;

fn csv_error(err: csv::Error) -> TrackingError {
    TrackingError::Csv(err.to_string())
}

/// Records experiment runs on a tracking backend.
#[derive(Debug)]
pub struct ExperimentRecorder<B: TrackingBackend = FileStore> {
    backend: B,
    staging_dir: Option<PathBuf>,
}

impl ExperimentRecorder<FileStore> {
    /// Recorder backed by the file store at `config.tracking_dir`.
    pub fn from_config(config: &TrackingConfig) -> Self {
        Self {
            backend: FileStore::from_config(config),
            staging_dir: config.staging_dir.clone(),
        }
    }
}

impl<B: TrackingBackend> ExperimentRecorder<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            staging_dir: None,
        }
    }

    /// Create scoped temporary files under `dir` instead of the system
    /// temp directory.
    pub fn with_staging_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.staging_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Open a run named `run_name` in `experiment`.
    ///
    /// A supplied context that is still running is returned unchanged when
    /// `reuse_if_active` is set and rejected with
    /// [`TrackingError::RunAlreadyActive`] otherwise. Finished contexts and
    /// contexts unknown to the backend are ignored and a new run is started.
    pub fn open_run(
        &mut self,
        experiment: &str,
        run_name: &str,
        active: Option<RunContext>,
        reuse_if_active: bool,
    ) -> Result<RunContext> {
        if let Some(ctx) = active {
            let status = match self.backend.run_status(&ctx.run_id) {
                Ok(status) => Some(status),
                Err(TrackingError::RunNotFound(_)) => {
                    debug!(run_id = %ctx.run_id, "supplied run is unknown to the backend");
                    None
                }
                Err(err) => return Err(err),
            };
            if status == Some(RunStatus::Running) {
                if !reuse_if_active {
                    return Err(TrackingError::RunAlreadyActive { run_id: ctx.run_id });
                }
                warn!(run_id = %ctx.run_id, "active run exists, reusing it");
                return Ok(RunContext {
                    status: RunStatus::Running,
                    ..ctx
                });
            }
        }

        let experiment_id = self.backend.get_or_create_experiment(experiment)?;
        let ctx = self.backend.start_run(&experiment_id, run_name)?;
        info!(
            run_id = %ctx.run_id,
            run_name,
            experiment,
            backend = self.backend.name(),
            "new run started"
        );
        Ok(ctx)
    }

    fn ensure_running(&self, ctx: &RunContext) -> Result<()> {
        if !ctx.is_running() {
            return Err(TrackingError::RunNotActive {
                run_id: ctx.run_id.clone(),
            });
        }
        Ok(())
    }

    pub fn log_metrics(&mut self, ctx: &RunContext, metrics: &BTreeMap<String, f64>) -> Result<()> {
        self.ensure_running(ctx)?;
        for (key, value) in metrics {
            self.backend.log_metric(&ctx.run_id, key, *value)?;
        }
        debug!(run_id = %ctx.run_id, count = metrics.len(), "metrics logged");
        Ok(())
    }

    /// Log each entry as parameter `{prefix}_{key}`.
    pub fn log_params(
        &mut self,
        ctx: &RunContext,
        params: &BTreeMap<String, String>,
        prefix: &str,
    ) -> Result<()> {
        self.ensure_running(ctx)?;
        for (key, value) in params {
            self.backend
                .log_param(&ctx.run_id, &format!("{}_{}", prefix, key), value)?;
        }
        debug!(run_id = %ctx.run_id, prefix, count = params.len(), "params logged");
        Ok(())
    }

    /// Log `table` as CSV artifact `artifact_name`.
    pub fn log_table(&mut self, ctx: &RunContext, table: &Table, artifact_name: &str) -> Result<()> {
        self.ensure_running(ctx)?;
        let staging = self.staging()?;
        let path = staged_path(&staging, artifact_name)?;

        let mut writer = csv::Writer::from_path(&path).map_err(csv_error)?;
        writer.write_record(table.headers()).map_err(csv_error)?;
        for row in table.rows() {
            writer.write_record(row).map_err(csv_error)?;
        }
        writer.flush()?;
        drop(writer);

        self.backend.log_artifact(&ctx.run_id, &path, None)?;
        staging.close()?;
        debug!(run_id = %ctx.run_id, artifact = artifact_name, rows = table.len(), "table logged");
        Ok(())
    }

    /// Render `figure` to PNG artifact `artifact_name`; the figure is
    /// consumed.
    pub fn log_figure<F: Figure>(
        &mut self,
        ctx: &RunContext,
        figure: F,
        artifact_name: &str,
    ) -> Result<()> {
        self.ensure_running(ctx)?;
        let staging = self.staging()?;
        let path = staged_path(&staging, artifact_name)?;

        figure.render(&path)?;
        drop(figure);

        self.backend.log_artifact(&ctx.run_id, &path, None)?;
        staging.close()?;
        debug!(run_id = %ctx.run_id, artifact = artifact_name, "figure logged");
        Ok(())
    }

    /// Copy an existing file into the run's artifacts.
    pub fn log_file(
        &mut self,
        ctx: &RunContext,
        local_path: &Path,
        artifact_dir: Option<&str>,
    ) -> Result<()> {
        self.ensure_running(ctx)?;
        self.backend.log_artifact(&ctx.run_id, local_path, artifact_dir)?;
        debug!(run_id = %ctx.run_id, path = %local_path.display(), "file logged");
        Ok(())
    }

    /// Mark the run finished or failed and return the updated context.
    pub fn finish_run(&mut self, ctx: RunContext, status: RunStatus) -> Result<RunContext> {
        self.ensure_running(&ctx)?;
        self.backend.set_run_status(&ctx.run_id, status)?;
        info!(run_id = %ctx.run_id, %status, "run ended");
        Ok(RunContext { status, ..ctx })
    }

    fn staging(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("forecastflow-");
        let dir = match &self.staging_dir {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };
        Ok(dir)
    }
}

/// Path for `artifact_name` inside the scoped directory; the name must be a
/// bare file name.
fn staged_path(staging: &TempDir, artifact_name: &str) -> Result<PathBuf> {
    let is_plain =
        Path::new(artifact_name).file_name().and_then(|n| n.to_str()) == Some(artifact_name);
    if !is_plain {
        return Err(TrackingError::Io(format!(
            "artifact name '{}' must be a file name",
            artifact_name
        )));
    }
    Ok(staging.path().join(artifact_name))
}
