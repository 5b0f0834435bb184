//! Constructor methods for FbmError
//!
//! Factory methods that keep call sites short and make the component or
//! field being reported explicit.

use super::types::FbmError;
use std::path::PathBuf;

impl FbmError {
    /// Create a configuration error with component and message
    ///
    /// This is the preferred way to report validation failures.
    ///
    /// # Examples
    /// ```rust
    /// use fbm_infra_core::error::FbmError;
    ///
    /// let err = FbmError::configuration("nodes", "duplicate name_prefix 'FbmA'");
    /// assert!(err.to_string().contains("duplicate name_prefix"));
    /// ```
    pub fn configuration(component: impl Into<String>, message: impl Into<String>) -> Self {
        FbmError::ConfigurationError {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn not_found(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        FbmError::NotFound {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        FbmError::Syntax {
            line,
            message: message.into(),
        }
    }

    pub fn missing_field(section: impl Into<String>, field: impl Into<String>) -> Self {
        FbmError::MissingField {
            section: section.into(),
            field: field.into(),
        }
    }

    pub fn unknown_field(section: impl Into<String>, field: impl Into<String>) -> Self {
        FbmError::UnknownField {
            section: section.into(),
            field: field.into(),
        }
    }

    /// Create a type coercion error for a field whose text could not be
    /// interpreted as `expected`
    pub fn invalid_type(
        section: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        FbmError::InvalidType {
            section: section.into(),
            field: field.into(),
            value: value.into(),
            expected,
        }
    }

    /// Create an IO error tagged with the path that was being accessed
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FbmError::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a Serialization error with a boxed source
    pub fn serialization<E: std::error::Error + Send + Sync + 'static>(
        operation: impl Into<String>,
        source: E,
    ) -> Self {
        FbmError::Serialization {
            operation: operation.into(),
            source: Box::new(source),
        }
    }
}
