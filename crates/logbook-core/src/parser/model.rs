use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    /// Bracketed text lines: `[YYYY-MM-DD HH:MM:SS] channel.LEVEL: message`
    StructuredText,
    /// One JSON object per line with `time`, `level`, `msg` and optional `error`
    JsonLines,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::StructuredText => "structured-text",
            LogFormat::JsonLines => "json-lines",
        }
    }

    /// Parse a single raw line into a normalized entry.
    ///
    /// Any error is a non-match signal: the caller skips the line and
    /// moves on. Log files mix structured lines with stack traces and
    /// other noise, so extraction is best-effort, never strict.
    pub fn parse_line(&self, line: &str) -> Result<LogEntry, ParseError> {
        match self {
            LogFormat::StructuredText => super::formats::bracket::parse(line),
            LogFormat::JsonLines => super::formats::json_line::parse(line),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "structured-text" => Ok(LogFormat::StructuredText),
            "json-lines" => Ok(LogFormat::JsonLines),
            other => Err(ParseError::InvalidFormat(format!(
                "unknown log format: {other}"
            ))),
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Parse failed: {0}")]
    ParseFailed(String),
}

/// A normalized log entry, constructed per read request and never persisted.
///
/// The timestamp serializes as an RFC 3339 UTC string automatically,
/// which is the canonical form for every source format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,

    /// Severity token, uppercased verbatim from the source line
    pub level: String,

    /// Human-readable text, possibly augmented with inline error detail
    pub message: String,
}
