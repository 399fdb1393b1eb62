//! Remote source trait definition.

use crate::error::Result;

/// Retrieves raw CSV text for a dataset URL.
///
/// The production implementation performs a single blocking HTTP GET;
/// tests substitute an in-memory source.
pub trait RemoteSource: Send + Sync {
    /// Source name, for logging.
    fn name(&self) -> &str;

    /// Fetch the body at `url` as text.
    fn fetch_text(&self, url: &str) -> Result<String>;
}
