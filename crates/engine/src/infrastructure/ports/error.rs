//! Error types for port operations.

/// Host store operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Document not found - includes document type and ID for actionable error messages.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Store unreachable or the call failed - includes operation name for tracing.
    #[error("Store error in {operation}: {message}")]
    Store {
        operation: &'static str,
        message: String,
    },

    /// The host refused the write.
    #[error("Write rejected: {0}")]
    Rejected(String),

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepoError {
    /// Create a NotFound error with document type and ID context.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create a Store error with operation context.
    pub fn store(operation: &'static str, message: impl ToString) -> Self {
        Self::Store {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Rejected error.
    pub fn rejected(message: impl ToString) -> Self {
        Self::Rejected(message.to_string())
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors from the host formula evaluator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RollError {
    #[error("Invalid formula '{formula}': {message}")]
    InvalidFormula { formula: String, message: String },
    #[error("Formula evaluator unavailable: {0}")]
    Unavailable(String),
}
