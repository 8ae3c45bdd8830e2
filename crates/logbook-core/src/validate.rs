//! Request-shape checks applied before anything touches the registry.

use crate::parser::LogFormat;
use serde::Deserialize;
use thiserror::Error;

/// Incoming registration request, taken verbatim off the wire.
/// Fields default to empty so a missing key reads as blank and fails
/// validation with a useful message instead of a decode error.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, rename = "type")]
    pub format: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name is required")]
    MissingName,

    #[error("path is required")]
    MissingPath,

    #[error("type must be either 'structured-text' or 'json-lines'")]
    UnknownFormat,
}

impl RegisterRequest {
    /// Check the request shape and resolve the declared format.
    pub fn validate(&self) -> Result<LogFormat, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.path.trim().is_empty() {
            return Err(ValidationError::MissingPath);
        }
        self.format
            .parse()
            .map_err(|_| ValidationError::UnknownFormat)
    }
}
