//! # API Error Type
//!
//! Unified error type for commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Devis                                  │
//! │                                                                         │
//! │  Command Function  ── Result<T, ApiError>                               │
//! │         │                                                               │
//! │         ├── CoreError::RowNotFound ─────────────► NOT_FOUND             │
//! │         ├── CoreError::InvalidOrder ────────────► INVALID_ORDER         │
//! │         ├── CoreError::ValidationFailed ────────► QUOTE_INCOMPLETE      │
//! │         ├── CoreError::Validation ──────────────► VALIDATION_ERROR      │
//! │         ├── DbError::QueryFailed ───────────────► DATABASE_ERROR        │
//! │         └── ConfigError ────────────────────────► CONFIG_ERROR          │
//! │                                                                         │
//! │  The UI receives { "code": "...", "message": "..." }                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use devis_core::{CoreError, QuoteIssue};
use devis_db::DbError;

use crate::state::ConfigError;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "QUOTE_INCOMPLETE",
///   "message": "Quote cannot be saved: a client must be selected",
///   "issues": ["missing_client"]
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Every reason a save was refused. Empty for other errors.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<QuoteIssue>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Quote, row, client or catalog item not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Reorder list is not a permutation of the rows
    InvalidOrder,

    /// Quote is missing a client or items
    QuoteIncomplete,

    /// Database operation failed
    DatabaseError,

    /// Configuration could not be loaded
    ConfigError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            issues: Vec::new(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Not found error for a quote with no open editor session.
    pub fn quote_not_open(id: &str) -> Self {
        ApiError::not_found("Open quote", id)
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::RowNotFound(id) => ApiError::not_found("Row", &id),
            CoreError::DuplicateRowId(id) => {
                ApiError::validation(format!("Row id already exists: {}", id))
            }
            CoreError::InvalidOrder { reason } => ApiError::new(
                ErrorCode::InvalidOrder,
                format!("Invalid row order: {}", reason),
            ),
            err @ CoreError::FieldNotApplicable { .. } => ApiError::validation(err.to_string()),
            CoreError::ValidationFailed(issues) => {
                let message = CoreError::ValidationFailed(issues.clone()).to_string();
                ApiError {
                    code: ErrorCode::QuoteIncomplete,
                    message,
                    issues,
                }
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Core(e) => ApiError::from(e),
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::Serialization(e) => {
                tracing::error!("Snapshot serialization failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Stored data could not be read")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type of every command.
pub type ApiResult<T> = Result<T, ApiError>;
