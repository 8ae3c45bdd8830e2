/// Log parsing and normalization module
///
/// Converts raw log lines from registered files into structured,
/// normalized entries.
///
/// # Architecture
///
/// - `model.rs`: `LogFormat`, `LogEntry` and the parse-error type
/// - `formats/`: individual format parser implementations
///
/// # Safety Guarantees
///
/// All parsers implement:
/// - Bounded memory (the reader caps line length before dispatch)
/// - Binary safety (non-UTF8 input is a non-match, never a panic)
/// - Tolerance (a non-conforming line is skipped, never fatal)

pub mod formats;
pub mod model;

// Re-export commonly used types
pub use model::{LogEntry, LogFormat, ParseError};

// Constants
pub const MAX_LINE_LEN: usize = 524_288; // 512 KiB
