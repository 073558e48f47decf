use crate::aggregate::Summary;
use async_trait::async_trait;
use std::error::Error;

/// Destination for the [`Summary`] produced by an analysis run.
///
/// Implementations decide where the summary ends up (a JSON file on disk,
/// memory in tests, nowhere at all). The analyzer calls `write` exactly once
/// per run, after aggregation succeeded.
#[async_trait]
pub trait SummarySink: Send + Sync {
    /// Persist a summary.
    ///
    /// **Parameters**
    /// - `summary`: fully-populated [`Summary`] for one input file.
    ///
    /// **Returns**
    /// - `Ok(())` if the summary was stored.
    /// - `Err(..)` if the backend failed (I/O error, serialization error).
    ///   The run is aborted; there are no retries.
    async fn write(&self, summary: &Summary) -> Result<(), Box<dyn Error + Send + Sync>>;
}
