//! Core error types
//!
//! This module contains the [`FbmError`] enum and the [`FbmResult`] alias
//! used across the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for configuration loading and deployment planning
#[derive(Error, Debug)]
pub enum FbmError {
    // Source resolution
    #[error("A configuration name must be specified (e.g. --config dev)")]
    MissingName,

    #[error("Configuration '{name}' not found (expected {path:?})")]
    NotFound { name: String, path: PathBuf },

    #[error("Syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },

    // Shape conversion
    #[error("Missing required section: [{section}]")]
    MissingSection { section: String },

    #[error("Missing field: {field} (section [{section}])")]
    MissingField { section: String, field: String },

    #[error("Invalid value for field {field} (section [{section}]): expected {expected}, got '{value}'")]
    InvalidType {
        section: String,
        field: String,
        value: String,
        expected: &'static str,
    },

    #[error("Unknown field: {field} (section [{section}])")]
    UnknownField { section: String, field: String },

    // Validation
    #[error("Configuration error in {component}: {message}")]
    ConfigurationError { component: String, message: String },

    // IO & serialization
    #[error("IO error on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization operation '{operation}' failed")]
    Serialization {
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl FbmError {
    /// Whether the error comes from the content of a configuration rather
    /// than from the environment (missing file, IO, output encoding).
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            FbmError::Syntax { .. }
                | FbmError::MissingSection { .. }
                | FbmError::MissingField { .. }
                | FbmError::InvalidType { .. }
                | FbmError::UnknownField { .. }
                | FbmError::ConfigurationError { .. }
        )
    }
}

pub type FbmResult<T> = std::result::Result<T, FbmError>;
