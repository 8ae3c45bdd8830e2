use crate::parser::{LogEntry, MAX_LINE_LEN};
use crate::registry::LogFileInfo;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("line too large: over {0} bytes (max: {1} bytes)")]
    LineTooLarge(usize, usize),
}

/// Stream the file behind `info` through its declared parser.
///
/// Failure to open the file or an I/O error mid-stream is a hard error.
/// Blank lines are skipped without parsing; non-matching and non-UTF8
/// lines are dropped silently; matches are accumulated in file order.
/// A line over `MAX_LINE_LEN` exceeds the read capacity and aborts the
/// whole read.
pub fn read_entries(info: &LogFileInfo) -> Result<Vec<LogEntry>, ReadError> {
    let file = File::open(&info.path).map_err(|source| ReadError::Open {
        path: info.path.display().to_string(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    let mut entries = Vec::new();
    let mut buf = Vec::new();
    let mut skipped = 0usize;

    loop {
        buf.clear();
        // Read one byte past the cap so an over-long line is
        // distinguishable from one that exactly fits
        let n = reader
            .by_ref()
            .take(MAX_LINE_LEN as u64 + 1)
            .read_until(b'\n', &mut buf)?;
        if n == 0 {
            break;
        }

        let line = match buf.last() {
            Some(b'\n') => &buf[..buf.len() - 1],
            _ if buf.len() > MAX_LINE_LEN => {
                return Err(ReadError::LineTooLarge(buf.len(), MAX_LINE_LEN));
            }
            _ => &buf[..],
        };
        let line = line.strip_suffix(b"\r").unwrap_or(line);

        // Non-UTF8 content is a non-match, not an error
        let Ok(text) = std::str::from_utf8(line) else {
            skipped += 1;
            continue;
        };
        if text.trim().is_empty() {
            continue;
        }

        match info.format.parse_line(text) {
            Ok(entry) => entries.push(entry),
            Err(_) => skipped += 1,
        }
    }

    debug!(
        path = %info.path.display(),
        format = info.format.as_str(),
        parsed = entries.len(),
        skipped,
        "Log file read"
    );
    Ok(entries)
}
