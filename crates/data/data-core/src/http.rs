//! Blocking HTTP dataset source.

use data_api::DataConfig;
use data_spi::{DatasetError, RemoteSource, Result};
use tracing::debug;

/// Downloads dataset CSVs over HTTP(S).
///
/// One attempt per request, no retries and no timeout.
#[derive(Debug, Clone)]
pub struct HttpSource {
    user_agent: String,
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::from_config(&DataConfig::default())
    }
}

impl HttpSource {
    pub fn new(user_agent: &str) -> Self {
        Self {
            user_agent: user_agent.to_string(),
        }
    }

    pub fn from_config(config: &DataConfig) -> Self {
        Self::new(&config.user_agent)
    }

    fn fetch_error(url: &str, err: impl ToString) -> DatasetError {
        DatasetError::Fetch {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

impl RemoteSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch_text(&self, url: &str) -> Result<String> {
        debug!(url, "downloading dataset");
        let client = reqwest::blocking::Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(None::<std::time::Duration>)
            .build()
            .map_err(|e| Self::fetch_error(url, e))?;

        let response = client
            .get(url)
            .send()
            .map_err(|e| Self::fetch_error(url, e))?
            .error_for_status()
            .map_err(|e| Self::fetch_error(url, e))?;

        response.text().map_err(|e| Self::fetch_error(url, e))
    }
}
