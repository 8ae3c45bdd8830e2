use crate::parser::model::{LogEntry, ParseError};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Parser for line-delimited JSON logs.
///
/// Recognized fields per object: `time` (RFC 3339, required), `level`,
/// `msg`, and an optional `error` that may be a string or a structured
/// value. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct JsonRecord {
    time: String,
    #[serde(default)]
    level: String,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    error: Option<Value>,
}

pub fn parse(line: &str) -> Result<LogEntry, ParseError> {
    let record: JsonRecord = serde_json::from_str(line)
        .map_err(|e| ParseError::ParseFailed(format!("invalid JSON: {e}")))?;

    let timestamp = DateTime::parse_from_rfc3339(&record.time)
        .map_err(|e| ParseError::InvalidTimestamp(e.to_string()))?
        .with_timezone(&Utc);

    let mut message = record.msg;
    match record.error {
        Some(Value::String(detail)) if !detail.is_empty() => {
            message.push_str(&format!(" (Error: {detail})"));
        }
        Some(detail @ Value::Object(_)) => {
            // Re-serializing a Value cannot fail
            let json = serde_json::to_string(&detail)
                .map_err(|e| ParseError::ParseFailed(e.to_string()))?;
            message.push_str(&format!(" (Error: {json})"));
        }
        // Absent, null, empty string, or any other shape: message unchanged
        _ => {}
    }

    Ok(LogEntry {
        timestamp,
        level: record.level.to_uppercase(),
        message,
    })
}
