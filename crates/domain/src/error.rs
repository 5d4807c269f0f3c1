//! Unified error types for the domain layer
//!
//! Provides a common error type that can be used across all domain operations,
//! enabling consistent error handling without forcing adapters to use String or anyhow.

use thiserror::Error;

use crate::value_objects::DiceParseError;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Persisted flag data could not be decoded into the typed schema
    #[error("Invalid flag data at '{path}': {message}")]
    InvalidFlagData { path: String, message: String },
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// # Example
    /// ```ignore
    /// if scope.is_empty() {
    ///     return Err(DomainError::validation("Flag scope cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid flag data error
    pub fn invalid_flag_data(path: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidFlagData {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl From<DiceParseError> for DomainError {
    fn from(err: DiceParseError) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dice_parse_error_maps_to_parse() {
        let err: DomainError = DiceParseError::Empty.into();
        assert!(matches!(err, DomainError::Parse(_)));
        assert_eq!(err.to_string(), "Parse error: Empty dice formula");
    }

    #[test]
    fn invalid_flag_data_display_includes_path() {
        let err = DomainError::invalid_flag_data("flags.symbaroum5ecore", "expected object");
        assert_eq!(
            err.to_string(),
            "Invalid flag data at 'flags.symbaroum5ecore': expected object"
        );
    }
}
