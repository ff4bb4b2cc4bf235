//! Custom error types for shareledger
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::models::ExpenseValidationError;

/// The main error type for shareledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Entity is still referenced and cannot be removed
    #[error("{entity_type} '{identifier}' is referenced by {references} expense(s)")]
    InUse {
        entity_type: &'static str,
        identifier: String,
        references: usize,
    },

    /// An expense that cannot take part in balance computation
    #[error("Invalid expense '{expense_id}': {reason}")]
    InvalidExpense {
        expense_id: String,
        reason: ExpenseValidationError,
    },

    /// An expense references a user outside the user set (strict mode only)
    #[error("Expense '{expense_id}' references unknown user '{user_id}'")]
    UnknownUser { expense_id: String, user_id: String },

    /// A running total left the representable range
    #[error("Amount overflow: {0}")]
    AmountOverflow(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl LedgerError {
    /// Create a "not found" error for users
    pub fn user_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "User",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Create an "invalid expense" error
    pub fn invalid_expense(expense_id: impl Into<String>, reason: ExpenseValidationError) -> Self {
        Self::InvalidExpense {
            expense_id: expense_id.into(),
            reason,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidExpense { .. })
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for shareledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = LedgerError::user_not_found("Alice");
        assert_eq!(err.to_string(), "User not found: Alice");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_expense_error() {
        let err = LedgerError::invalid_expense("exp1", ExpenseValidationError::EmptySplitGroup);
        assert_eq!(
            err.to_string(),
            "Invalid expense 'exp1': Split group cannot be empty"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_in_use_error() {
        let err = LedgerError::InUse {
            entity_type: "User",
            identifier: "Bob".into(),
            references: 3,
        };
        assert_eq!(err.to_string(), "User 'Bob' is referenced by 3 expense(s)");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let ledger_err: LedgerError = io_err.into();
        assert!(matches!(ledger_err, LedgerError::Io(_)));
    }
}
