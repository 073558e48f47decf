use crate::aggregate::Summary;
use crate::sink::SummarySink;
use async_trait::async_trait;
use std::error::Error;

/// A sink that simply drops the summary.
///
/// Useful for dry runs that only want the console output, and for tests
/// that don't care about persistence.
#[derive(Clone, Default)]
pub struct NoopSink;

#[async_trait]
impl SummarySink for NoopSink {
    async fn write(&self, _summary: &Summary) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}
