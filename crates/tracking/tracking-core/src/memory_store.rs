//! In-memory tracking store for tests.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use tracking_spi::{Result, RunContext, RunStatus, TrackingBackend, TrackingError};

use crate::file_store::check_key;

#[derive(Debug, Clone)]
struct MemoryRun {
    status: RunStatus,
    metrics: BTreeMap<String, f64>,
    params: BTreeMap<String, String>,
    artifacts: BTreeMap<String, Vec<u8>>,
}

/// Tracking store that keeps everything in process memory.
///
/// Artifacts are read into memory when logged, so the source file may be
/// removed afterwards.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    experiments: BTreeMap<String, String>,
    runs: HashMap<String, MemoryRun>,
    next_exp_id: u64,
    next_run_id: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn experiment_count(&self) -> usize {
        self.experiments.len()
    }

    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Contents of a logged artifact.
    pub fn artifact(&self, run_id: &str, path: &str) -> Option<&[u8]> {
        self.runs
            .get(run_id)
            .and_then(|run| run.artifacts.get(path))
            .map(Vec::as_slice)
    }

    fn run(&self, run_id: &str) -> Result<&MemoryRun> {
        self.runs
            .get(run_id)
            .ok_or_else(|| TrackingError::RunNotFound(run_id.to_string()))
    }

    fn run_mut(&mut self, run_id: &str) -> Result<&mut MemoryRun> {
        self.runs
            .get_mut(run_id)
            .ok_or_else(|| TrackingError::RunNotFound(run_id.to_string()))
    }
}

impl TrackingBackend for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get_or_create_experiment(&mut self, name: &str) -> Result<String> {
        if let Some((id, _)) = self.experiments.iter().find(|(_, n)| n.as_str() == name) {
            return Ok(id.clone());
        }
        let id = self.next_exp_id.to_string();
        self.next_exp_id += 1;
        self.experiments.insert(id.clone(), name.to_string());
        Ok(id)
    }

    fn start_run(&mut self, experiment_id: &str, run_name: &str) -> Result<RunContext> {
        let experiment_name = self
            .experiments
            .get(experiment_id)
            .cloned()
            .ok_or_else(|| TrackingError::ExperimentNotFound(experiment_id.to_string()))?;

        let run_id = format!("run-{}", self.next_run_id);
        self.next_run_id += 1;
        self.runs.insert(
            run_id.clone(),
            MemoryRun {
                status: RunStatus::Running,
                metrics: BTreeMap::new(),
                params: BTreeMap::new(),
                artifacts: BTreeMap::new(),
            },
        );

        Ok(RunContext {
            experiment_id: experiment_id.to_string(),
            experiment_name,
            artifact_uri: format!("memory://{}/artifacts", run_id),
            run_id,
            run_name: run_name.to_string(),
            status: RunStatus::Running,
        })
    }

    fn run_status(&self, run_id: &str) -> Result<RunStatus> {
        Ok(self.run(run_id)?.status)
    }

    fn set_run_status(&mut self, run_id: &str, status: RunStatus) -> Result<()> {
        let run = self.run_mut(run_id)?;
        if run.status.is_terminal() {
            return Err(TrackingError::RunNotActive {
                run_id: run_id.to_string(),
            });
        }
        run.status = status;
        Ok(())
    }

    fn log_metric(&mut self, run_id: &str, key: &str, value: f64) -> Result<()> {
        check_key("metric", key)?;
        self.run_mut(run_id)?.metrics.insert(key.to_string(), value);
        Ok(())
    }

    fn log_param(&mut self, run_id: &str, key: &str, value: &str) -> Result<()> {
        check_key("param", key)?;
        self.run_mut(run_id)?
            .params
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn log_artifact(
        &mut self,
        run_id: &str,
        local_path: &Path,
        artifact_dir: Option<&str>,
    ) -> Result<()> {
        let file_name = local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| TrackingError::Io(format!("'{}' is not a file", local_path.display())))?;
        let key = match artifact_dir.map(|d| d.trim_matches('/')) {
            Some(dir) if !dir.is_empty() => format!("{}/{}", dir, file_name),
            _ => file_name,
        };
        let bytes = fs::read(local_path)?;
        self.run_mut(run_id)?.artifacts.insert(key, bytes);
        Ok(())
    }

    fn metrics(&self, run_id: &str) -> Result<BTreeMap<String, f64>> {
        Ok(self.run(run_id)?.metrics.clone())
    }

    fn params(&self, run_id: &str) -> Result<BTreeMap<String, String>> {
        Ok(self.run(run_id)?.params.clone())
    }

    fn artifacts(&self, run_id: &str) -> Result<Vec<String>> {
        Ok(self.run(run_id)?.artifacts.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let mut store = InMemoryStore::new();
        let exp = store.get_or_create_experiment("Forecasting").unwrap();
        assert_eq!(exp, "0");
        assert_eq!(store.get_or_create_experiment("Forecasting").unwrap(), "0");

        let a = store.start_run(&exp, "a").unwrap();
        let b = store.start_run(&exp, "b").unwrap();
        assert_eq!(a.run_id, "run-0");
        assert_eq!(b.run_id, "run-1");
        assert_eq!(store.experiment_count(), 1);
        assert_eq!(store.run_count(), 2);
    }

    #[test]
    fn test_artifact_survives_source_removal() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("y_sample.csv");
        fs::write(&local, "y\n1\n").unwrap();

        let mut store = InMemoryStore::new();
        let exp = store.get_or_create_experiment("Forecasting").unwrap();
        let ctx = store.start_run(&exp, "run").unwrap();
        store.log_artifact(&ctx.run_id, &local, Some("tables/")).unwrap();
        fs::remove_file(&local).unwrap();

        assert_eq!(
            store.artifact(&ctx.run_id, "tables/y_sample.csv"),
            Some(&b"y\n1\n"[..])
        );
    }

    #[test]
    fn test_missing_run() {
        let mut store = InMemoryStore::new();
        assert!(matches!(
            store.log_metric("run-9", "mse", 1.0),
            Err(TrackingError::RunNotFound(_))
        ));
    }
}
