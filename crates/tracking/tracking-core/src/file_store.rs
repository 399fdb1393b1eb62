//! File-backed tracking store
//!
//! Layout under the root directory:
//!
//! ```text
//! {root}/{experiment_id}/meta.json
//! {root}/{experiment_id}/{run_id}/meta.json
//! {root}/{experiment_id}/{run_id}/metrics/{key}     "<millis> <value> 0" per line
//! {root}/{experiment_id}/{run_id}/params/{key}      raw value
//! {root}/{experiment_id}/{run_id}/artifacts/...
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracking_api::TrackingConfig;
use tracking_spi::{Result, RunContext, RunStatus, TrackingBackend, TrackingError};

const META_FILE: &str = "meta.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ExperimentMeta {
    experiment_id: String,
    name: String,
    creation_time: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RunMeta {
    run_id: String,
    run_name: String,
    experiment_id: String,
    status: RunStatus,
    start_time: i64,
    end_time: Option<i64>,
    artifact_uri: String,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| TrackingError::Serialization(e.to_string()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| TrackingError::Serialization(e.to_string()))?;
    fs::write(path, text)?;
    Ok(())
}

/// Reject keys that would escape their directory.
pub(crate) fn check_key(kind: &str, key: &str) -> Result<()> {
    let bad = key.is_empty()
        || key == "."
        || key.contains("..")
        || key.contains('/')
        || key.contains('\\');
    if bad {
        return Err(TrackingError::Io(format!("invalid {} name '{}'", kind, key)));
    }
    Ok(())
}

fn list_files(dir: &Path, prefix: &str, out: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let rel = if prefix.is_empty() {
            name
        } else {
            format!("{}/{}", prefix, name)
        };
        if entry.file_type()?.is_dir() {
            list_files(&entry.path(), &rel, out)?;
        } else {
            out.push(rel);
        }
    }
    Ok(())
}

/// Tracking store persisted as plain files.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn from_config(config: &TrackingConfig) -> Self {
        Self::new(&config.tracking_dir)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn experiments(&self) -> Result<Vec<ExperimentMeta>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut found = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let meta = entry?.path().join(META_FILE);
            if meta.is_file() {
                found.push(read_json::<ExperimentMeta>(&meta)?);
            }
        }
        Ok(found)
    }

    fn run_dir(&self, run_id: &str) -> Result<PathBuf> {
        check_key("run", run_id)?;
        for experiment in self.experiments()? {
            let dir = self.root.join(&experiment.experiment_id).join(run_id);
            if dir.join(META_FILE).is_file() {
                return Ok(dir);
            }
        }
        Err(TrackingError::RunNotFound(run_id.to_string()))
    }

    fn run_meta(&self, run_id: &str) -> Result<(PathBuf, RunMeta)> {
        let dir = self.run_dir(run_id)?;
        let meta = read_json(&dir.join(META_FILE))?;
        Ok((dir, meta))
    }

    fn read_dir_values(dir: &Path) -> Result<BTreeMap<String, String>> {
        let mut values = BTreeMap::new();
        if !dir.exists() {
            return Ok(values);
        }
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let key = entry.file_name().to_string_lossy().into_owned();
            values.insert(key, fs::read_to_string(entry.path())?);
        }
        Ok(values)
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::from_config(&TrackingConfig::default())
    }
}

impl TrackingBackend for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    fn get_or_create_experiment(&mut self, name: &str) -> Result<String> {
        let experiments = self.experiments()?;
        if let Some(existing) = experiments.iter().find(|e| e.name == name) {
            return Ok(existing.experiment_id.clone());
        }

        let next = experiments
            .iter()
            .filter_map(|e| e.experiment_id.parse::<u64>().ok())
            .max()
            .map_or(0, |id| id + 1);
        let meta = ExperimentMeta {
            experiment_id: next.to_string(),
            name: name.to_string(),
            creation_time: Utc::now().timestamp_millis(),
        };
        let dir = self.root.join(&meta.experiment_id);
        fs::create_dir_all(&dir)?;
        write_json(&dir.join(META_FILE), &meta)?;
        Ok(meta.experiment_id)
    }

    fn start_run(&mut self, experiment_id: &str, run_name: &str) -> Result<RunContext> {
        let experiment = self
            .experiments()?
            .into_iter()
            .find(|e| e.experiment_id == experiment_id)
            .ok_or_else(|| TrackingError::ExperimentNotFound(experiment_id.to_string()))?;

        let run_id = format!("{:032x}", rand::random::<u128>());
        let dir = self.root.join(experiment_id).join(&run_id);
        for sub in ["metrics", "params", "artifacts"] {
            fs::create_dir_all(dir.join(sub))?;
        }

        let meta = RunMeta {
            run_id: run_id.clone(),
            run_name: run_name.to_string(),
            experiment_id: experiment_id.to_string(),
            status: RunStatus::Running,
            start_time: Utc::now().timestamp_millis(),
            end_time: None,
            artifact_uri: dir.join("artifacts").display().to_string(),
        };
        write_json(&dir.join(META_FILE), &meta)?;

        Ok(RunContext {
            experiment_id: experiment_id.to_string(),
            experiment_name: experiment.name,
            run_id,
            run_name: run_name.to_string(),
            status: RunStatus::Running,
            artifact_uri: meta.artifact_uri,
        })
    }

    fn run_status(&self, run_id: &str) -> Result<RunStatus> {
        Ok(self.run_meta(run_id)?.1.status)
    }

    fn set_run_status(&mut self, run_id: &str, status: RunStatus) -> Result<()> {
        let (dir, mut meta) = self.run_meta(run_id)?;
        if meta.status.is_terminal() {
            return Err(TrackingError::RunNotActive {
                run_id: run_id.to_string(),
            });
        }
        meta.status = status;
        if status.is_terminal() {
            meta.end_time = Some(Utc::now().timestamp_millis());
        }
        write_json(&dir.join(META_FILE), &meta)
    }

    fn log_metric(&mut self, run_id: &str, key: &str, value: f64) -> Result<()> {
        check_key("metric", key)?;
        let dir = self.run_dir(run_id)?.join("metrics");
        fs::create_dir_all(&dir)?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(key))?;
        writeln!(file, "{} {} 0", Utc::now().timestamp_millis(), value)?;
        Ok(())
    }

    fn log_param(&mut self, run_id: &str, key: &str, value: &str) -> Result<()> {
        check_key("param", key)?;
        let dir = self.run_dir(run_id)?.join("params");
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(key), value)?;
        Ok(())
    }

    fn log_artifact(
        &mut self,
        run_id: &str,
        local_path: &Path,
        artifact_dir: Option<&str>,
    ) -> Result<()> {
        let file_name = local_path.file_name().ok_or_else(|| {
            TrackingError::Io(format!("'{}' is not a file", local_path.display()))
        })?;

        let mut dest = self.run_dir(run_id)?.join("artifacts");
        if let Some(sub) = artifact_dir {
            for part in sub.split('/').filter(|p| !p.is_empty()) {
                check_key("artifact directory", part)?;
                dest.push(part);
            }
        }
        fs::create_dir_all(&dest)?;
        fs::copy(local_path, dest.join(file_name))?;
        Ok(())
    }

    fn metrics(&self, run_id: &str) -> Result<BTreeMap<String, f64>> {
        let dir = self.run_dir(run_id)?.join("metrics");
        let mut metrics = BTreeMap::new();
        for (key, text) in Self::read_dir_values(&dir)? {
            let latest = text
                .lines()
                .filter_map(|line| line.split_whitespace().nth(1))
                .last()
                .ok_or_else(|| TrackingError::Serialization(format!("metric '{}' is empty", key)))?;
            let value = latest.parse::<f64>().map_err(|e| {
                TrackingError::Serialization(format!("metric '{}': {}", key, e))
            })?;
            metrics.insert(key, value);
        }
        Ok(metrics)
    }

    fn params(&self, run_id: &str) -> Result<BTreeMap<String, String>> {
        Self::read_dir_values(&self.run_dir(run_id)?.join("params"))
    }

    fn artifacts(&self, run_id: &str) -> Result<Vec<String>> {
        let dir = self.run_dir(run_id)?.join("artifacts");
        let mut files = Vec::new();
        if dir.exists() {
            list_files(&dir, "", &mut files)?;
        }
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experiment_is_created_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());

        let first = store.get_or_create_experiment("Forecasting").unwrap();
        let again = store.get_or_create_experiment("Forecasting").unwrap();
        let other = store.get_or_create_experiment("Backtests").unwrap();

        assert_eq!(first, "0");
        assert_eq!(again, first);
        assert_eq!(other, "1");
        assert!(dir.path().join("0/meta.json").is_file());
    }

    #[test]
    fn test_run_layout_and_records() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        let exp = store.get_or_create_experiment("Forecasting").unwrap();
        let ctx = store.start_run(&exp, "sunspots_ARIMA").unwrap();

        assert_eq!(ctx.run_id.len(), 32);
        assert_eq!(ctx.experiment_name, "Forecasting");
        let run_dir = dir.path().join(&exp).join(&ctx.run_id);
        assert!(run_dir.join("meta.json").is_file());

        store.log_metric(&ctx.run_id, "rmse", 2.0).unwrap();
        store.log_metric(&ctx.run_id, "rmse", 1.5).unwrap();
        store.log_param(&ctx.run_id, "autoarima_params_order", "(1, 1, 1)").unwrap();

        assert_eq!(store.metrics(&ctx.run_id).unwrap()["rmse"], 1.5);
        assert_eq!(
            store.params(&ctx.run_id).unwrap()["autoarima_params_order"],
            "(1, 1, 1)"
        );
        let history = fs::read_to_string(run_dir.join("metrics/rmse")).unwrap();
        assert_eq!(history.lines().count(), 2);
    }

    #[test]
    fn test_artifacts_are_copied() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("mlruns"));
        let exp = store.get_or_create_experiment("Forecasting").unwrap();
        let ctx = store.start_run(&exp, "run").unwrap();

        let local = dir.path().join("model.json");
        fs::write(&local, "{}").unwrap();
        store.log_artifact(&ctx.run_id, &local, None).unwrap();
        store
            .log_artifact(&ctx.run_id, &local, Some("prophet_model.json"))
            .unwrap();

        assert_eq!(
            store.artifacts(&ctx.run_id).unwrap(),
            vec!["model.json".to_string(), "prophet_model.json/model.json".to_string()]
        );
    }

    #[test]
    fn test_status_transitions() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        let exp = store.get_or_create_experiment("Forecasting").unwrap();
        let ctx = store.start_run(&exp, "run").unwrap();

        assert_eq!(store.run_status(&ctx.run_id).unwrap(), RunStatus::Running);
        store.set_run_status(&ctx.run_id, RunStatus::Finished).unwrap();
        assert_eq!(store.run_status(&ctx.run_id).unwrap(), RunStatus::Finished);
        assert!(matches!(
            store.set_run_status(&ctx.run_id, RunStatus::Failed),
            Err(TrackingError::RunNotActive { .. })
        ));
    }

    #[test]
    fn test_unknown_ids() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        assert!(matches!(
            store.start_run("42", "run"),
            Err(TrackingError::ExperimentNotFound(_))
        ));
        assert!(matches!(
            store.run_status("missing"),
            Err(TrackingError::RunNotFound(_))
        ));
    }

    #[test]
    fn test_keys_cannot_escape_run_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        let exp = store.get_or_create_experiment("Forecasting").unwrap();
        let ctx = store.start_run(&exp, "run").unwrap();
        assert!(store.log_param(&ctx.run_id, "../escape", "x").is_err());
        assert!(store.log_metric(&ctx.run_id, "", 1.0).is_err());
    }
}
