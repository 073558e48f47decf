use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use log_analyzer::analyzer::{Analyzer, Invocation};
use log_analyzer::init::AnalyzerConfig;
use log_analyzer::noop_sink::NoopSink;

const SERVICES: [&str; 4] = ["auth", "billing", "search", "gateway"];
const LEVELS: [&str; 4] = ["DEBUG", "INFO", "WARN", "ERROR"];

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let n: usize = 500_000;
    let path = std::env::temp_dir().join("log_analyzer_large_file.log");

    {
        let file = std::fs::File::create(&path).expect("create log file");
        let mut w = std::io::BufWriter::new(file);
        for i in 0..n {
            writeln!(
                w,
                "2023-01-{:02} {:02}:{:02}:{:02} - {} - {} - request {} failed",
                1 + (i / 86_400) % 28,
                (i / 3600) % 24,
                (i / 60) % 60,
                i % 60,
                SERVICES[i % SERVICES.len()],
                LEVELS[(i / 7) % LEVELS.len()],
                i % 97,
            )
            .expect("write log line");
        }
    }

    let config = AnalyzerConfig {
        enable_stderr: false,
        ..AnalyzerConfig::default()
    };
    let analyzer = Analyzer::new(config, Arc::new(NoopSink));
    let invocation = Invocation::from_args([
        path.display().to_string(),
        "2023-01-02".to_string(),
        "2023-01-02 00:00:10".to_string(),
    ])
    .expect("three arguments");

    let start = Instant::now();
    let report = analyzer.run(&invocation).await.expect("analysis");
    let elapsed = start.elapsed();

    println!(
        "analyzed {} lines in {:?} (~{:.0} lines/s), most common: {:?}",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64(),
        report.summary.most_common_log
    );

    let _ = std::fs::remove_file(&path);
}
