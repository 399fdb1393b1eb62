//! Dataset loader configuration types.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default processed-data directory.
pub const DEFAULT_PROCESSED_DIR: &str = "data/processed";
/// User agent sent with dataset downloads.
pub const DEFAULT_USER_AGENT: &str = "forecastflow/0.1";

/// Configuration for loading and caching datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding cached and processed CSV files
    pub processed_dir: PathBuf,
    /// User agent for remote downloads
    pub user_agent: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            processed_dir: PathBuf::from(DEFAULT_PROCESSED_DIR),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl DataConfig {
    /// Create a configuration rooted at `processed_dir`.
    pub fn new(processed_dir: impl AsRef<Path>) -> Self {
        Self {
            processed_dir: processed_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Path of a file inside the processed-data directory.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.processed_dir.join(file_name)
    }
}

/// Builder for DataConfig.
#[derive(Debug, Default)]
pub struct DataConfigBuilder {
    processed_dir: Option<PathBuf>,
    user_agent: Option<String>,
}

impl DataConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the processed-data directory.
    pub fn processed_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.processed_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set the download user agent.
    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = Some(user_agent.to_string());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<DataConfig, &'static str> {
        let defaults = DataConfig::default();
        let processed_dir = self.processed_dir.unwrap_or(defaults.processed_dir);
        if processed_dir.as_os_str().is_empty() {
            return Err("processed_dir must not be empty");
        }
        let user_agent = self.user_agent.unwrap_or(defaults.user_agent);
        if user_agent.trim().is_empty() {
            return Err("user_agent must not be empty");
        }
        Ok(DataConfig {
            processed_dir,
            user_agent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = DataConfig::default();
        assert_eq!(config.processed_dir, PathBuf::from("data/processed"));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_path_for() {
        let config = DataConfig::new("/tmp/cache");
        assert_eq!(
            config.path_for("sunspots.csv"),
            PathBuf::from("/tmp/cache/sunspots.csv")
        );
    }

    #[test]
    fn test_builder_success() {
        let config = DataConfigBuilder::new()
            .processed_dir("out")
            .user_agent("tests")
            .build()
            .unwrap();
        assert_eq!(config.processed_dir, PathBuf::from("out"));
        assert_eq!(config.user_agent, "tests");
    }

    #[test]
    fn test_builder_defaults() {
        let config = DataConfigBuilder::new().build().unwrap();
        assert_eq!(config, DataConfig::default());
    }

    #[test]
    fn test_builder_rejects_empty() {
        assert_eq!(
            DataConfigBuilder::new().processed_dir("").build().unwrap_err(),
            "processed_dir must not be empty"
        );
        assert!(DataConfigBuilder::new().user_agent("  ").build().is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = DataConfig::new("x/y");
        let json = serde_json::to_string(&config).unwrap();
        let back: DataConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
