use std::process::ExitCode;

use clap::Parser;
use log_analyzer::analyzer::{Analyzer, Invocation};
use log_analyzer::init::{init_tracing, AnalyzerConfig};

#[derive(Parser, Debug)]
#[command(
    name = "log-analyzer",
    version,
    about = "Summarize a ` - `-separated log file into summary.json, optionally printing the records between two dates",
    override_usage = "log-analyzer <LOG_FILE> [<START_DATE> <END_DATE>]"
)]
struct Cli {
    /// Log file, optionally followed by a start and end date
    /// (`YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`)
    #[arg(value_name = "ARGS")]
    args: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let invocation = match Invocation::from_args(cli.args) {
        Ok(invocation) => invocation,
        Err(e) => {
            println!("{e}");
            return ExitCode::SUCCESS;
        }
    };

    let config = AnalyzerConfig::from_env();
    if let Err(e) = init_tracing(&config) {
        eprintln!("failed to initialize logging: {e}");
    }

    let analyzer = Analyzer::from_config(config);
    match analyzer.run(&invocation).await {
        Ok(report) => {
            tracing::info!(
                summary = %analyzer.config().summary_path.display(),
                malformed = report.malformed.len(),
                "analysis complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("log-analyzer: {e}");
            ExitCode::FAILURE
        }
    }
}
