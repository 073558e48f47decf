use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::aggregate::{summarize, AggregateError, Summary};
use crate::filter::{filter_by_date, FilterError};
use crate::init::AnalyzerConfig;
use crate::json_sink::JsonFileSink;
use crate::parser::{read_log_file, ParseError, ReadError};
use crate::record::LogCollection;
use crate::sink::SummarySink;

/// Wrong number of positional arguments.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("The input argument length can either be 1 or 3. Please check the input")]
pub struct UsageError {
    pub count: usize,
}

/// Errors that end an analysis run.
#[derive(thiserror::Error, Debug)]
pub enum AnalyzerError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("cannot summarize {}: {source}", file.display())]
    Aggregate {
        file: PathBuf,
        #[source]
        source: AggregateError,
    },

    #[error("date filter failed: {0}")]
    Filter(#[source] FilterError),

    #[error("summary sink failed: {0}")]
    Sink(#[source] Box<dyn Error + Send + Sync>),

    #[error("failed to write console output: {0}")]
    Output(#[from] std::io::Error),
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub log_file: PathBuf,
    /// Raw `(start, end)` strings, validated only when the filter runs.
    pub range: Option<(String, String)>,
}

impl Invocation {
    /// Accepts `<log_file>` or `<log_file> <start> <end>`.
    pub fn from_args<I, S>(args: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        match <[String; 1]>::try_from(args) {
            Ok([log_file]) => Ok(Invocation { log_file: log_file.into(), range: None }),
            Err(args) => match <[String; 3]>::try_from(args) {
                Ok([log_file, start, end]) => Ok(Invocation {
                    log_file: log_file.into(),
                    range: Some((start, end)),
                }),
                Err(args) => Err(UsageError { count: args.len() }),
            },
        }
    }
}

/// Result of the optional date-range step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    /// Only a file name was given.
    NotRequested,
    /// A boundary was unparseable; nothing was filtered.
    NotPerformed(FilterError),
    Filtered(LogCollection),
}

/// Everything a successful run produced.
#[derive(Debug)]
pub struct Report {
    pub summary: Summary,
    pub malformed: Vec<ParseError>,
    pub filter: FilterOutcome,
}

/// Runs parse, summarize, persist and the optional filter for one file.
pub struct Analyzer {
    config: AnalyzerConfig,
    sink: Arc<dyn SummarySink>,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig, sink: Arc<dyn SummarySink>) -> Self {
        Self { config, sink }
    }

    /// Analyzer persisting to a [`JsonFileSink`] at `config.summary_path`.
    pub fn from_config(config: AnalyzerConfig) -> Self {
        let sink = Arc::new(JsonFileSink::new(config.summary_path.clone()));
        Self::new(config, sink)
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// [`Analyzer::run_with_output`] printing to stdout.
    pub async fn run(&self, invocation: &Invocation) -> Result<Report, AnalyzerError> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.run_with_output(invocation, &mut out).await
    }

    /// Run the whole pipeline, printing diagnostics and filter results to
    /// `out`.
    ///
    /// Malformed lines and unparseable range boundaries are reported and
    /// skipped. An unreadable file, an input without a single valid record,
    /// a failing sink or an unparseable record timestamp inside the range
    /// filter end the run with an error. The summary is persisted before the
    /// filter runs, so it survives a filter failure.
    pub async fn run_with_output<W: Write>(
        &self,
        invocation: &Invocation,
        out: &mut W,
    ) -> Result<Report, AnalyzerError> {
        let path: &Path = &invocation.log_file;
        let parsed = read_log_file(path)?;
        for err in &parsed.malformed {
            debug!(error = %err, "skipping malformed line");
            writeln!(out, "{}", err)?;
        }
        info!(
            file = %path.display(),
            records = parsed.records.len(),
            malformed = parsed.malformed.len(),
            "parsed log file"
        );

        let file_name = path.display().to_string();
        let summary = summarize(&file_name, &parsed.records, self.config.error_policy).map_err(|source| {
            AnalyzerError::Aggregate {
                file: path.to_path_buf(),
                source,
            }
        })?;
        debug!(
            policy = self.config.error_policy.as_str(),
            most_common = ?summary.most_common_log,
            "summary computed"
        );

        self.sink.write(&summary).await.map_err(AnalyzerError::Sink)?;

        let filter = match &invocation.range {
            None => FilterOutcome::NotRequested,
            Some((start, end)) => match filter_by_date(start, end, &parsed.records) {
                Ok(kept) => {
                    info!(start = %start, end = %end, kept = kept.len(), "filtered by date");
                    let rendered = serde_json::to_string_pretty(&kept)
                        .map_err(|e| AnalyzerError::Output(e.into()))?;
                    writeln!(out, "{}", rendered)?;
                    FilterOutcome::Filtered(kept)
                }
                Err(err @ FilterError::BoundaryFormat { .. }) => {
                    debug!(error = %err, "date filter not performed");
                    writeln!(out, "{}", err)?;
                    FilterOutcome::NotPerformed(err)
                }
                Err(err) => return Err(AnalyzerError::Filter(err)),
            },
        };

        Ok(Report {
            summary,
            malformed: parsed.malformed,
            filter,
        })
    }
}
