// Core subsystem for the logbook backend.

// Parsing and normalization
pub mod parser;
pub mod reader;

// Registered-file store
pub mod registry;

// Registration helpers
pub mod ident;
pub mod validate;

// Re-export the types callers touch on every request
pub use parser::{LogEntry, LogFormat, ParseError};
pub use reader::{read_entries, ReadError};
pub use registry::{FileRegistry, LogFileInfo, StoreError};
