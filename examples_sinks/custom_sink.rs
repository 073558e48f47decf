use std::sync::Arc;

use async_trait::async_trait;
use log_analyzer::aggregate::Summary;
use log_analyzer::analyzer::{Analyzer, Invocation};
use log_analyzer::init::{init_tracing, AnalyzerConfig};
use log_analyzer::sink::SummarySink;

/// Example of persisting the summary somewhere other than `summary.json`
/// by implementing the `SummarySink` trait directly. Imagine this posts to
/// an internal metrics service.
struct PrintingSink;

#[async_trait]
impl SummarySink for PrintingSink {
    async fn write(&self, summary: &Summary) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        println!("[printing-sink] {}", serde_json::to_string_pretty(summary)?);
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = match Invocation::from_args(args) {
        Ok(invocation) => invocation,
        Err(e) => {
            println!("{e}");
            return;
        }
    };

    let config = AnalyzerConfig::default();
    init_tracing(&config).expect("set global subscriber");

    let analyzer = Analyzer::new(config, Arc::new(PrintingSink));
    if let Err(e) = analyzer.run(&invocation).await {
        eprintln!("custom sink example failed: {e}");
    }
}
