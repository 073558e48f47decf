use crate::aggregate::Summary;
use crate::sink::SummarySink;
use async_trait::async_trait;
use std::error::Error;
use std::path::{Path, PathBuf};

/// Default output file, relative to the working directory.
pub const DEFAULT_SUMMARY_PATH: &str = "summary.json";

/// [`SummarySink`] that writes the summary as a single JSON object to a
/// file, replacing whatever was there.
#[derive(Clone, Debug)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    /// Construct a sink writing to `path`.
    ///
    /// Nothing is touched on disk until [`SummarySink::write`] is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonFileSink {
    fn default() -> Self {
        Self::new(DEFAULT_SUMMARY_PATH)
    }
}

#[async_trait]
impl SummarySink for JsonFileSink {
    async fn write(&self, summary: &Summary) -> Result<(), Box<dyn Error + Send + Sync>> {
        let body = serde_json::to_vec(summary)?;
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|e| format!("failed to write summary to {}: {}", self.path.display(), e))?;
        tracing::debug!(path = %self.path.display(), "summary written");
        Ok(())
    }
}
