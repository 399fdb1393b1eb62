//! Dataset loader with a local CSV cache
//!
//! # Example
//!
//! ```rust,no_run
//! use data_api::DataConfig;
//! use data_core::DatasetLoader;
//!
//! let loader = DatasetLoader::from_config(DataConfig::default());
//! let dataset = loader.fetch_dataset("air_passengers").unwrap();
//! println!("{} rows of {}", dataset.len(), dataset.value_column());
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use data_api::DataConfig;
use data_spi::{
    format_timestamp, parse_timestamp, Dataset, DatasetError, DatasetId, RemoteSource, Result,
    SourceColumns,
};
use tracing::info;

use crate::http::HttpSource;

fn csv_error(err: csv::Error) -> DatasetError {
    DatasetError::Csv(err.to_string())
}

/// Loads enumerated datasets, preferring the local cache.
#[derive(Debug, Clone)]
pub struct DatasetLoader<S: RemoteSource = HttpSource> {
    config: DataConfig,
    source: S,
}

impl DatasetLoader<HttpSource> {
    /// Loader that downloads over HTTP.
    pub fn from_config(config: DataConfig) -> Self {
        let source = HttpSource::from_config(&config);
        Self::new(config, source)
    }
}

impl<S: RemoteSource> DatasetLoader<S> {
    pub fn new(config: DataConfig, source: S) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &DataConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Location of the cached copy of `id`.
    pub fn cache_path(&self, id: DatasetId) -> PathBuf {
        self.config.path_for(id.cache_file())
    }

    /// Load a dataset by name (case-insensitive).
    pub fn fetch_dataset(&self, name: &str) -> Result<Dataset> {
        let id: DatasetId = name.parse()?;
        let dataset = self.load(id)?;
        info!(dataset = %id, rows = dataset.len(), "dataset loaded");
        Ok(dataset)
    }

    /// Return the cached copy of `id`, downloading and caching it first
    /// when no cache exists.
    pub fn load(&self, id: DatasetId) -> Result<Dataset> {
        let path = self.cache_path(id);
        if path.exists() {
            let text = fs::read_to_string(&path)?;
            let dataset = parse_table(id, &text, Self::cache_columns(id))?;
            info!(dataset = %id, path = %path.display(), "dataset read from cache");
            return Ok(dataset);
        }

        let text = self.source.fetch_text(id.url())?;
        let dataset = parse_table(id, &text, id.source_columns())?;
        write_table(&path, &dataset)?;
        info!(
            dataset = %id,
            source = self.source.name(),
            path = %path.display(),
            "dataset downloaded and cached"
        );
        Ok(dataset)
    }

    /// Write `dataset` to `{processed_dir}/{name}_processed.csv`.
    pub fn save_dataset(&self, dataset: &Dataset, name: &str) -> Result<PathBuf> {
        let path = self.config.path_for(&format!("{}_processed.csv", name));
        write_table(&path, dataset)?;
        info!(dataset = name, path = %path.display(), "processed dataset saved");
        Ok(path)
    }

    fn cache_columns(id: DatasetId) -> SourceColumns {
        SourceColumns::Named {
            time: id.time_column(),
            value: id.value_column(),
        }
    }
}

/// Parse CSV text into a dataset with normalized column names.
pub fn parse_table(id: DatasetId, text: &str, columns: SourceColumns) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let headers = reader.headers().map_err(csv_error)?.clone();

    let (time_idx, value_idx) = match columns {
        SourceColumns::Positional => {
            if headers.len() < 2 {
                return Err(DatasetError::Csv(format!(
                    "expected at least 2 columns, found {}",
                    headers.len()
                )));
            }
            (0, 1)
        }
        SourceColumns::Named { time, value } => {
            let find = |name: &str| {
                headers
                    .iter()
                    .position(|h| h == name)
                    .ok_or_else(|| DatasetError::Csv(format!("missing column '{}'", name)))
            };
            (find(time)?, find(value)?)
        }
    };

    let mut timestamps = Vec::new();
    let mut values = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error)?;
        let row = idx + 1;
        let raw_time = record.get(time_idx).unwrap_or_default();
        let raw_value = record.get(value_idx).unwrap_or_default();

        let ts = parse_timestamp(raw_time).ok_or_else(|| DatasetError::Parse {
            row,
            message: format!("invalid timestamp '{}'", raw_time),
        })?;
        let value: f64 = raw_value.parse().map_err(|_| DatasetError::Parse {
            row,
            message: format!("invalid number '{}'", raw_value),
        })?;

        timestamps.push(ts);
        values.push(value);
    }

    Dataset::new(
        id.name(),
        id.time_column(),
        id.value_column(),
        timestamps,
        values,
    )
}

/// Write a dataset as a two-column CSV with a header row.
pub fn write_table(path: &Path, dataset: &Dataset) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    writer
        .write_record([dataset.time_column(), dataset.value_column()])
        .map_err(csv_error)?;
    for (ts, value) in dataset.timestamps().iter().zip(dataset.values()) {
        writer
            .write_record([format_timestamp(ts), value.to_string()])
            .map_err(csv_error)?;
    }
    writer.flush()?;
    Ok(())
}
