use crate::parser::model::{LogEntry, ParseError};
use chrono::NaiveDateTime;

/// Parser for the structured-bracket text format.
///
/// Expects lines of the shape:
/// `[YYYY-MM-DD HH:MM:SS] <channel>.<level>: <message>`
///
/// The channel is discarded; the level is uppercased; the message is
/// kept verbatim. The naive timestamp is treated as UTC.

/// `YYYY-MM-DD HH:MM:SS` is always 19 bytes
const TIMESTAMP_LEN: usize = 19;
const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

pub fn parse(line: &str) -> Result<LogEntry, ParseError> {
    // Must start with '['
    let rest = line
        .strip_prefix('[')
        .ok_or_else(|| ParseError::InvalidFormat("missing '[' prefix".into()))?;

    if rest.len() < TIMESTAMP_LEN {
        return Err(ParseError::InvalidFormat("truncated timestamp".into()));
    }
    // Enforce the exact digit/separator layout before handing the
    // slice to chrono, which is lenient about zero-padding. An
    // all-ASCII prefix also makes the split below boundary-safe.
    if !timestamp_layout_ok(&rest.as_bytes()[..TIMESTAMP_LEN]) {
        return Err(ParseError::InvalidFormat("malformed timestamp".into()));
    }
    let (ts_raw, rest) = rest.split_at(TIMESTAMP_LEN);

    let rest = rest
        .strip_prefix("] ")
        .ok_or_else(|| ParseError::InvalidFormat("unterminated timestamp bracket".into()))?;

    // channel.level: message; the channel is captured but discarded
    let (_channel, rest) = take_word(rest)
        .ok_or_else(|| ParseError::InvalidFormat("missing channel".into()))?;

    let rest = rest
        .strip_prefix('.')
        .ok_or_else(|| ParseError::InvalidFormat("missing '.' after channel".into()))?;

    let (level, rest) = take_word(rest)
        .ok_or_else(|| ParseError::InvalidFormat("missing level".into()))?;

    let message = rest
        .strip_prefix(": ")
        .ok_or_else(|| ParseError::InvalidFormat("missing ': ' after level".into()))?;

    if message.is_empty() {
        return Err(ParseError::InvalidFormat("empty message".into()));
    }

    let timestamp = NaiveDateTime::parse_from_str(ts_raw, TIMESTAMP_FMT)
        .map_err(|e| ParseError::InvalidTimestamp(e.to_string()))?
        .and_utc();

    Ok(LogEntry {
        timestamp,
        level: level.to_ascii_uppercase(),
        message: message.to_string(),
    })
}

/// Structural check for `YYYY-MM-DD HH:MM:SS`
fn timestamp_layout_ok(ts: &[u8]) -> bool {
    if ts.len() != TIMESTAMP_LEN {
        return false;
    }
    ts.iter().enumerate().all(|(i, &b)| match i {
        4 | 7 => b == b'-',
        10 => b == b' ',
        13 | 16 => b == b':',
        _ => b.is_ascii_digit(),
    })
}

/// Take a non-empty run of word characters (`[A-Za-z0-9_]`) off the front
fn take_word(s: &str) -> Option<(&str, &str)> {
    let end = s
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(s.len());
    if end == 0 {
        None
    } else {
        Some(s.split_at(end))
    }
}
