use crate::aggregate::ErrorCountPolicy;
use crate::env::{
    env_or, env_parse, parse_flag, LOG_ANALYZER_ERROR_POLICY_ENV, LOG_ANALYZER_LOG_LEVEL_ENV,
    LOG_ANALYZER_STDERR_ENV, LOG_ANALYZER_SUMMARY_PATH_ENV,
};
use crate::json_sink::DEFAULT_SUMMARY_PATH;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{Layer, Registry};

/// Analyzer configuration.
///
/// **Fields**
/// - `summary_path`: file the JSON summary is written to.
/// - `error_policy`: how messages are counted when picking the most common
///   error (see [`ErrorCountPolicy`]).
/// - `log_level`: maximum level of the diagnostic log.
/// - `enable_stderr`: if `true`, a `fmt` layer prints the diagnostic log to
///   stderr. Console output proper (malformed lines, filter results) goes to
///   stdout regardless.
#[derive(Clone, Debug)]
pub struct AnalyzerConfig {
    pub summary_path: PathBuf,
    pub error_policy: ErrorCountPolicy,
    pub log_level: Level,
    pub enable_stderr: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            summary_path: PathBuf::from(DEFAULT_SUMMARY_PATH),
            error_policy: ErrorCountPolicy::default(),
            log_level: Level::WARN,
            enable_stderr: true,
        }
    }
}

impl AnalyzerConfig {
    /// Defaults overridden by the `LOG_ANALYZER_*` environment variables.
    ///
    /// Unparseable values are ignored and the default kept.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            summary_path: PathBuf::from(env_or(
                LOG_ANALYZER_SUMMARY_PATH_ENV,
                DEFAULT_SUMMARY_PATH,
            )),
            error_policy: env_parse(LOG_ANALYZER_ERROR_POLICY_ENV).unwrap_or(defaults.error_policy),
            log_level: env_parse(LOG_ANALYZER_LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            enable_stderr: std::env::var(LOG_ANALYZER_STDERR_ENV)
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.enable_stderr),
        }
    }
}

/// Install the global `tracing` subscriber described by `config`.
///
/// **Effects**
///
/// With `enable_stderr` set, installs a [`Registry`] with a `fmt` layer on
/// stderr filtered at `log_level`. Otherwise nothing is installed and
/// events are discarded.
///
/// **Returns**
/// - `Err(TryInitError)` if a global subscriber was already set.
pub fn init_tracing(config: &AnalyzerConfig) -> Result<(), TryInitError> {
    if !config.enable_stderr {
        return Ok(());
    }

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(LevelFilter::from_level(config.log_level));
    Registry::default().with(fmt_layer).try_init()
}
