//! Environment variable names used to configure the analyzer without
//! touching the positional command line.
//!
//! These are purely helpers; [`AnalyzerConfig`](crate::init::AnalyzerConfig)
//! can always be built by hand instead.

/// Where the JSON summary is written, e.g. `out/summary.json`.
pub const LOG_ANALYZER_SUMMARY_PATH_ENV: &str = "LOG_ANALYZER_SUMMARY_PATH";

/// Counting policy for the most common error message:
/// `first_seen` (default) or `error_only`.
pub const LOG_ANALYZER_ERROR_POLICY_ENV: &str = "LOG_ANALYZER_ERROR_POLICY";

/// Maximum level of the diagnostic log on stderr (`trace` .. `error`).
pub const LOG_ANALYZER_LOG_LEVEL_ENV: &str = "LOG_ANALYZER_LOG_LEVEL";

/// Set to `0` or `false` to silence the diagnostic log entirely.
pub const LOG_ANALYZER_STDERR_ENV: &str = "LOG_ANALYZER_STDERR";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read and parse an environment variable; unset or unparseable values
/// yield `None`.
pub fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Interpret a flag value. Anything but `0`, `false`, `no` or `off`
/// (case-insensitive) counts as enabled.
pub fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags() {
        assert!(parse_flag("1"));
        assert!(parse_flag("yes"));
        assert!(parse_flag(""));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(" False "));
        assert!(!parse_flag("OFF"));
    }

    #[test]
    fn unset_variables_fall_back() {
        let key = "LOG_ANALYZER_TEST_SURELY_UNSET";
        assert_eq!(env_or(key, "fallback"), "fallback");
        assert_eq!(env_parse::<u32>(key), None);
    }
}
