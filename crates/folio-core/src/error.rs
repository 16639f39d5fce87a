//! # Error Types
//!
//! Domain errors for the pricing engine.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Error Categories                                   │
//! │                                                                         │
//! │  ┌────────────────────┐  ┌────────────────────┐  ┌──────────────────┐  │
//! │  │  User input        │  │  Stored data       │  │  Infrastructure  │  │
//! │  │  (returned as a    │  │  (degrades one     │  │  (hard failure)  │  │
//! │  │   verdict)         │  │   book size)       │  │                  │  │
//! │  │                    │  │                    │  │                  │  │
//! │  │  NotConfigured     │  │  MalformedMatrix   │  │  StorageError    │  │
//! │  │  Forbidden         │  │  Orphaned          │  │  (folio-db)      │  │
//! │  │  OutOfRange        │  │                    │  │                  │  │
//! │  └────────────────────┘  └────────────────────┘  └──────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::selection::SelectionField;

// =============================================================================
// Error Kind
// =============================================================================

/// Machine-readable classification shared by every layer.
///
/// This is what client UIs switch on; the messages are for humans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Book size or parameter value absent from the configured parameters.
    NotConfigured,
    /// Value is configured but disabled by a restriction.
    Forbidden,
    /// Quantity or page count violates its constraints.
    OutOfRange,
    /// Stored matrix could not be parsed or lacks required sub-maps.
    MalformedMatrix,
    /// Persistence layer unreachable or timed out.
    StorageError,
    /// Matrix exists for a key no longer in the configured parameters.
    Orphaned,
    /// An admin-entered matrix failed field validation and was not saved.
    InvalidMatrix,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::NotConfigured => "not_configured",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::OutOfRange => "out_of_range",
            ErrorKind::MalformedMatrix => "malformed_matrix",
            ErrorKind::StorageError => "storage_error",
            ErrorKind::Orphaned => "orphaned",
            ErrorKind::InvalidMatrix => "invalid_matrix",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Pricing rule violations.
///
/// None of these are panics or hard failures: they describe why a selection
/// or an admin save was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A value the caller asked for is not configured, or has no price.
    ///
    /// ## When This Occurs
    /// - Book size missing from the settings list
    /// - Paper weight present in settings but absent from the matrix
    /// - Saving a matrix for a size the admin has not configured
    #[error("{field} '{value}' is not configured")]
    NotConfigured { field: SelectionField, value: String },

    /// The value is configured but a restriction disables it.
    #[error("{field} '{value}' is not available: {reason}")]
    Forbidden {
        field: SelectionField,
        value: String,
        reason: String,
    },

    /// A count falls outside `[min, max]` or off the step grid.
    #[error("{field} {value} must be between {min} and {max} in steps of {step}")]
    OutOfRange {
        field: SelectionField,
        value: i64,
        min: i64,
        max: i64,
        step: i64,
    },

    /// The stored matrix for a book size could not be used.
    #[error("pricing matrix for '{book_size}' is malformed: {reason}")]
    MalformedMatrix { book_size: String, reason: String },

    /// Matrix payload failed field validation (admin save).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns the machine-readable kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::NotConfigured { .. } => ErrorKind::NotConfigured,
            CoreError::Forbidden { .. } => ErrorKind::Forbidden,
            CoreError::OutOfRange { .. } => ErrorKind::OutOfRange,
            CoreError::MalformedMatrix { .. } => ErrorKind::MalformedMatrix,
            CoreError::Validation(_) => ErrorKind::InvalidMatrix,
        }
    }

    /// Returns the selection field the error points at, if any.
    pub fn field(&self) -> Option<SelectionField> {
        match self {
            CoreError::NotConfigured { field, .. }
            | CoreError::Forbidden { field, .. }
            | CoreError::OutOfRange { field, .. } => Some(*field),
            CoreError::MalformedMatrix { .. } | CoreError::Validation(_) => None,
        }
    }

    pub(crate) fn not_configured(field: SelectionField, value: impl ToString) -> Self {
        CoreError::NotConfigured {
            field,
            value: value.to_string(),
        }
    }

    pub(crate) fn forbidden(
        field: SelectionField,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        CoreError::Forbidden {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level validation errors for admin-entered matrices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Money value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Duplicate value (e.g. two discounts with the same threshold).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::not_configured(SelectionField::BookSize, "وزیری");
        assert_eq!(err.to_string(), "book size 'وزیری' is not configured");
        assert_eq!(err.kind(), ErrorKind::NotConfigured);

        let err = CoreError::OutOfRange {
            field: SelectionField::Quantity,
            value: 7,
            min: 10,
            max: 1000,
            step: 10,
        };
        assert_eq!(
            err.to_string(),
            "quantity 7 must be between 10 and 1000 in steps of 10"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "pageCosts".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.field(), None);
        assert_eq!(core_err.kind(), ErrorKind::InvalidMatrix);
        assert_ne!(core_err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn test_error_kind_wire_names() {
        let json = serde_json::to_string(&ErrorKind::MalformedMatrix).unwrap();
        assert_eq!(json, "\"malformedMatrix\"");
        assert_eq!(ErrorKind::NotConfigured.to_string(), "not_configured");
    }
}
