//! # Error Types
//!
//! Domain-specific error types for inventory-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  inventory-core errors (this file)                                     │
//! │  ├── CoreError        - Domain rule failures (code space, role, ...)   │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  inventory-db errors                                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  inventory-export errors                                               │
//! │  └── ExportError      - CSV / PDF encoding failures                    │
//! │                                                                         │
//! │  app errors                                                            │
//! │  └── ApiError         - What the presentation shell sees               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Shell        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain rule failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The sequential code space `A001..=A999` is used up.
    ///
    /// ## When This Occurs
    /// The highest code in the table is already `A999`. Rendering `A1000`
    /// would break the fixed-width format, so allocation stops here.
    #[error("Item code space exhausted after {last}")]
    CodeSpaceExhausted { last: String },

    /// The current maximum code has no numeric suffix to increment.
    #[error("Malformed item code: '{0}'")]
    MalformedItemCode(String),

    /// The acting identity lacks the role the operation needs.
    #[error("Access denied: {operation} requires the {required} role")]
    AccessDenied { operation: String, required: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before anything reaches the database.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is below its minimum.
    #[error("{field} must not be negative (got {value})")]
    Negative { field: String, value: i64 },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., the same item code twice in an import file).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// A row of a bulk import failed validation.
    ///
    /// `row` counts data rows from 1, header excluded.
    #[error("row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// Wraps this error with the import row it came from.
    pub fn at_row(self, row: usize) -> Self {
        ValidationError::Row {
            row,
            source: Box::new(self),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::CodeSpaceExhausted {
            last: "A999".to_string(),
        };
        assert_eq!(err.to_string(), "Item code space exhausted after A999");

        let err = CoreError::AccessDenied {
            operation: "delete item".to_string(),
            required: "admin".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Access denied: delete item requires the admin role"
        );
    }

    #[test]
    fn test_row_error_message() {
        let err = ValidationError::Negative {
            field: "quantity".to_string(),
            value: -3,
        }
        .at_row(4);
        assert_eq!(err.to_string(), "row 4: quantity must not be negative (got -3)");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "item_code".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
