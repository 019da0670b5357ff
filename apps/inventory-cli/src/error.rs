//! # API Error Type
//!
//! Unified error type returned by every command.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Inventory Manager                  │
//! │                                                                         │
//! │  Command Function                                                      │
//! │  Result<CommandOutcome<T>, ApiError>                                   │
//! │         │                                                               │
//! │         ├── ValidationError / CoreError ──┐                            │
//! │         ├── DbError ──────────────────────┼──► ApiError { code, msg }  │
//! │         └── ExportError ──────────────────┘          │                 │
//! │                                                       ▼                 │
//! │                                        class() = Input  → re-prompt     │
//! │                                        class() = System → logged,       │
//! │                                                           reconnect     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization
//! What a shell receives when a command fails:
//! ```json
//! { "code": "NOT_FOUND", "message": "Item not found: A404" }
//! ```
//!
//! System errors are logged here with `tracing::error!` and reach the user
//! with a generic message; the details stay in the log.

use serde::Serialize;
use tracing::{debug, error};

use inventory_core::{CoreError, ValidationError};
use inventory_db::DbError;
use inventory_export::ExportError;

/// API error returned from commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The database could not be reached (fatal at session start)
    ConnectionFailure,

    /// Unknown user or wrong password
    InvalidCredentials,

    /// A command ran before login
    NotAuthenticated,

    /// The identity lacks the admin role
    AccessDenied,

    /// Duplicate code or a schema check refused the row
    ConstraintViolation,

    /// Update/delete target missing
    NotFound,

    /// Input validation failed
    ValidationError,

    /// A destructive action was invoked without its confirmation
    ConfirmationRequired,

    /// An import file was refused before anything changed
    ImportRejected,

    /// The import transaction failed and was rolled back
    ImportFailed,

    /// No more sequential item codes
    CodeSpaceExhausted,

    /// CSV/PDF generation failed; no file delivered
    RenderFailure,

    /// Anything else (logged)
    Internal,
}

/// Whether an error is about the request or about the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorClass {
    /// Informational; fix the input and try again.
    Input,
    /// Connection-level or internal; may warrant reconnect with backoff.
    System,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Creates a connection failure.
    pub fn connection(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ConnectionFailure, message)
    }

    /// Creates the single credentials error used for every failed login.
    pub fn invalid_credentials() -> Self {
        ApiError::new(ErrorCode::InvalidCredentials, "Invalid username or password")
    }

    /// Creates a missing-confirmation error.
    pub fn confirmation_required(what: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ConfirmationRequired, what)
    }

    /// Input or system error.
    pub fn class(&self) -> ErrorClass {
        match self.code {
            ErrorCode::ConnectionFailure | ErrorCode::Internal | ErrorCode::RenderFailure => {
                ErrorClass::System
            }
            _ => ErrorClass::Input,
        }
    }

    /// Whether reconnecting may help.
    pub fn is_retryable(&self) -> bool {
        self.code == ErrorCode::ConnectionFailure
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ConstraintViolation,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::CheckViolation { message } => {
                debug!(%message, "Check constraint refused a row");
                ApiError::new(ErrorCode::ConstraintViolation, message)
            }
            DbError::ConnectionFailed(e) => {
                error!("Database connection failed: {}", e);
                ApiError::connection("Database connection failed")
            }
            DbError::PoolExhausted => {
                error!("Database pool exhausted");
                ApiError::connection("Database is busy, try again")
            }
            DbError::MigrationFailed(e) => {
                error!("Migration failed: {}", e);
                ApiError::internal("Database migration failed")
            }
            DbError::QueryFailed(e) => {
                error!("Database query failed: {}", e);
                ApiError::internal("Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                error!("Transaction failed: {}", e);
                ApiError::internal("Database transaction failed")
            }
            DbError::Hashing(e) => {
                error!("Password hashing failed: {}", e);
                ApiError::internal("Could not process credentials")
            }
            DbError::Internal(e) => {
                error!("Internal database error: {}", e);
                ApiError::internal("Database operation failed")
            }
            DbError::Domain(core) => ApiError::from(core),
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::CodeSpaceExhausted { .. } => {
                ApiError::new(ErrorCode::CodeSpaceExhausted, err.to_string())
            }
            CoreError::MalformedItemCode(_) => ApiError::validation(err.to_string()),
            CoreError::AccessDenied { .. } => ApiError::new(ErrorCode::AccessDenied, err.to_string()),
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts export errors to API errors.
impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::MalformedCsv { .. } | ExportError::UnexpectedHeader { .. } => {
                ApiError::new(ErrorCode::ImportRejected, err.to_string())
            }
            ExportError::CsvEncode(_) | ExportError::Render(_) => {
                error!("Export failed: {}", err);
                ApiError::new(ErrorCode::RenderFailure, err.to_string())
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_mapping() {
        let err = ApiError::from(DbError::not_found("Item", "A404"));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Item not found: A404");
        assert_eq!(err.class(), ErrorClass::Input);

        let err = ApiError::from(DbError::duplicate("item_code", "A001"));
        assert_eq!(err.code, ErrorCode::ConstraintViolation);

        let err = ApiError::from(DbError::ConnectionFailed("disk gone".into()));
        assert_eq!(err.code, ErrorCode::ConnectionFailure);
        assert_eq!(err.class(), ErrorClass::System);
        assert!(err.is_retryable());
        // Details stay in the log.
        assert!(!err.message.contains("disk gone"));
    }

    #[test]
    fn test_domain_errors_pass_through() {
        let err = ApiError::from(DbError::Domain(CoreError::CodeSpaceExhausted {
            last: "A999".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::CodeSpaceExhausted);

        let err = ApiError::from(CoreError::AccessDenied {
            operation: "items list".to_string(),
            required: "admin".to_string(),
        });
        assert_eq!(err.code, ErrorCode::AccessDenied);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_export_error_mapping() {
        let err = ApiError::from(ExportError::MalformedCsv {
            line: 3,
            reason: "bad quantity".to_string(),
        });
        assert_eq!(err.code, ErrorCode::ImportRejected);
        assert!(err.message.contains("line 3"));

        let err = ApiError::from(ExportError::Render("boom".to_string()));
        assert_eq!(err.code, ErrorCode::RenderFailure);
    }

    #[test]
    fn test_serializes_for_shell() {
        let json = serde_json::to_value(ApiError::not_found("Item", "A404")).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Item not found: A404");
    }
}
