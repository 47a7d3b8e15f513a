//! # Error Types
//!
//! Domain-specific error types for devis-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  devis-core errors (this file)                                         │
//! │  ├── CoreError        - Editor and document rule violations            │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  devis-db errors (separate crate)                                      │
//! │  └── DbError          - Snapshot store failures                        │
//! │                                                                         │
//! │  App errors                                                            │
//! │  └── ApiError         - What the UI sees (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → UI           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Missing ids on read paths are never errors: lookups return `Option`.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every variant is raised *before* the document is touched, so a caller
/// that receives one of these still holds the previous, consistent state.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A row id given to a write operation does not exist in the document.
    #[error("Row not found: {0}")]
    RowNotFound(String),

    /// A row with the same id is already present in the document.
    #[error("Row id already exists: {0}")]
    DuplicateRowId(String),

    /// `reorder_rows` received something other than a permutation of the
    /// current row ids.
    ///
    /// ## When This Occurs
    /// - An id was dropped
    /// - An id appears twice
    /// - An id does not belong to the document
    #[error("Invalid row order: {reason}")]
    InvalidOrder { reason: String },

    /// The edited field is not carried by the row's role
    /// (e.g. a unit price on a text row).
    #[error("Field '{field}' does not apply to {row_type} rows")]
    FieldNotApplicable {
        field: &'static str,
        row_type: &'static str,
    },

    /// The document cannot be saved or finalized in its current state.
    ///
    /// ## User Workflow
    /// ```text
    /// Click "Save"
    ///      │
    ///      ▼
    /// validate_for_save()
    ///      │
    ///      ├── no client? ──► MissingClient
    ///      ├── no items?  ──► NoItems
    ///      ▼
    /// UI shows every issue, document stays editable
    /// ```
    #[error("Quote cannot be saved: {}", format_issues(.0))]
    ValidationFailed(Vec<QuoteIssue>),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// A single reason why a quote cannot be saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteIssue {
    /// No client is assigned to the quote.
    MissingClient,
    /// The quote has no priced item rows.
    NoItems,
}

impl fmt::Display for QuoteIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteIssue::MissingClient => write!(f, "a client must be selected"),
            QuoteIssue::NoItems => write!(f, "at least one item is required"),
        }
    }
}

fn format_issues(issues: &[QuoteIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Inputs are rejected at the boundary, never coerced.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., non-numeric price, malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
