//! ID and display-name helpers consumed by the registration flow.

use std::time::{SystemTime, UNIX_EPOCH};

/// Opaque registry ID derived from the current time in nanoseconds.
///
/// Monotonically-increasing-enough for a single process; collision
/// probability is treated as negligible, not eliminated.
pub fn generate_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    nanos.to_string()
}

/// Map every character outside `[A-Za-z0-9_-]` to `-`, then trim
/// leading and trailing `-`.
pub fn sanitize_file_name(name: &str) -> String {
    let mapped: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    mapped.trim_matches('-').to_string()
}
