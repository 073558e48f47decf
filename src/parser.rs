use std::path::{Path, PathBuf};

use crate::record::{LogCollection, LogRecord};

/// Literal field separator between the four columns of a line.
pub const FIELD_SEPARATOR: &str = " - ";

/// Number of fields a well-formed line splits into.
pub const FIELD_COUNT: usize = 4;

/// A line that could not be turned into a [`LogRecord`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Line {line} of {source_name} not in the required format")]
    MalformedLine { line: usize, source_name: String },
}

/// Failure to load the input file.
#[derive(thiserror::Error, Debug)]
#[error("failed to read log file {}: {source}", path.display())]
pub struct ReadError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Result of parsing a whole input: the good records plus one error per
/// rejected line, both in line order.
#[derive(Debug, Default)]
pub struct ParsedLog {
    pub records: LogCollection,
    pub malformed: Vec<ParseError>,
}

/// Parse a single raw line (without its terminator).
///
/// **Parameters**
/// - `raw`: the line text.
/// - `line`: 0-based index of the line in its source.
/// - `source_name`: name of the source, used only in the error.
///
/// **Returns**
/// - `Ok(LogRecord)` when the line splits into exactly four fields.
/// - `Err(ParseError::MalformedLine)` otherwise, including for empty lines.
pub fn parse_line(raw: &str, line: usize, source_name: &str) -> Result<LogRecord, ParseError> {
    let parts: Vec<&str> = raw.splitn(FIELD_COUNT + 1, FIELD_SEPARATOR).collect();
    match parts.as_slice() {
        [timestamp, service, level, message] => Ok(LogRecord {
            line,
            timestamp: timestamp.to_string(),
            service: service.to_string(),
            level: level.to_string(),
            message: message.to_string(),
        }),
        _ => Err(ParseError::MalformedLine {
            line,
            source_name: source_name.to_string(),
        }),
    }
}

/// Parse every line of `contents`, keeping going past malformed lines.
pub fn parse_lines(contents: &str, source_name: &str) -> ParsedLog {
    let mut parsed = ParsedLog::default();
    for (line, raw) in contents.lines().enumerate() {
        match parse_line(raw, line, source_name) {
            Ok(record) => parsed.records.push(record),
            Err(e) => parsed.malformed.push(e),
        }
    }
    parsed
}

/// Read the whole file into memory and parse it.
///
/// Invalid UTF-8 is replaced with U+FFFD instead of failing the file, so a
/// bad byte only affects the line it sits on. The path is used verbatim as
/// the source name in diagnostics.
pub fn read_log_file(path: &Path) -> Result<ParsedLog, ReadError> {
    let bytes = std::fs::read(path).map_err(|source| ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    let contents = String::from_utf8_lossy(&bytes);
    Ok(parse_lines(&contents, &path.display().to_string()))
}
