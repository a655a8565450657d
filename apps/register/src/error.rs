//! # Error Types
//!
//! `RegisterError` is what the `Register` service returns; `ApiError` is
//! what a front end receives from a command.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Kantan Register                        │
//! │                                                                         │
//! │  Front end                   Rust Backend                               │
//! │  ─────────                   ────────────                               │
//! │                                                                         │
//! │  pay 500                                                                │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function → Result<T, ApiError>                          │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Register method → Result<T, RegisterError>                      │  │
//! │  │         │                                                        │  │
//! │  │         ├── CommitError::InsufficientCash ─┐                     │  │
//! │  │         ├── ValidationError::NameRequired ─┤                     │  │
//! │  │         ├── ImportError::* ────────────────┼──► ApiError ───────►│  │
//! │  │         └── DbError (on write) ────────────┘    WRITE_FAILURE    │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "INSUFFICIENT_CASH",                                         │
//! │    "message": "Insufficient cash: ¥490 short",                          │
//! │    "shortfall": 490 }                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use kantan_core::{CommitError, ImportError, ValidationError};
use kantan_store::DbError;
use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Register Error
// =============================================================================

/// Failure of a `Register` operation.
///
/// Whatever the variant, in-memory state is unchanged when one is returned.
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error(transparent)]
    Import(#[from] ImportError),

    /// Durable write failed.
    #[error("Failed to save: {0}")]
    Write(#[from] DbError),

    /// A document could not be encoded for export.
    #[error("Failed to encode export: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type RegisterResult<T> = Result<T, RegisterError>;

// =============================================================================
// API Error
// =============================================================================

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// { "code": "NAME_REQUIRED", "message": "Product name is required" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Yen missing from the tender, only for INSUFFICIENT_CASH
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortfall: Option<i64>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Commit attempted with no resolvable lines
    EmptyCart,

    /// Tender is not a whole non-negative yen amount
    InvalidCash,

    /// Tender below the total
    InsufficientCash,

    /// Product name blank
    NameRequired,

    /// Price negative, too large or not a number
    InvalidPrice,

    /// Tax rate outside 0..=1
    InvalidTaxRate,

    /// Backup document rejected
    ImportParseFailure,

    /// Durable write failed; nothing changed
    WriteFailure,

    /// Export requested with an empty ledger
    NoHistory,

    /// Unknown product id
    NotFound,

    /// Anything else
    Internal,
}

impl ErrorCode {
    /// The wire name, e.g. `"EMPTY_CART"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::EmptyCart => "EMPTY_CART",
            ErrorCode::InvalidCash => "INVALID_CASH",
            ErrorCode::InsufficientCash => "INSUFFICIENT_CASH",
            ErrorCode::NameRequired => "NAME_REQUIRED",
            ErrorCode::InvalidPrice => "INVALID_PRICE",
            ErrorCode::InvalidTaxRate => "INVALID_TAX_RATE",
            ErrorCode::ImportParseFailure => "IMPORT_PARSE_FAILURE",
            ErrorCode::WriteFailure => "WRITE_FAILURE",
            ErrorCode::NoHistory => "NO_HISTORY",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            shortfall: None,
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates the error for exporting an empty history.
    pub fn no_history() -> Self {
        ApiError::new(ErrorCode::NoHistory, "No sales history to export")
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let code = match err {
            ValidationError::NameRequired => ErrorCode::NameRequired,
            ValidationError::InvalidPrice { .. } => ErrorCode::InvalidPrice,
            ValidationError::InvalidTaxRate { .. } => ErrorCode::InvalidTaxRate,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<CommitError> for ApiError {
    fn from(err: CommitError) -> Self {
        match err {
            CommitError::EmptyCart => ApiError::new(ErrorCode::EmptyCart, err.to_string()),
            CommitError::InvalidCash { .. } => {
                ApiError::new(ErrorCode::InvalidCash, err.to_string())
            }
            CommitError::InsufficientCash { shortfall } => ApiError {
                code: ErrorCode::InsufficientCash,
                message: err.to_string(),
                shortfall: Some(shortfall.yen()),
            },
        }
    }
}

impl From<RegisterError> for ApiError {
    fn from(err: RegisterError) -> Self {
        match err {
            RegisterError::Validation(e) => e.into(),
            RegisterError::Commit(e) => e.into(),
            RegisterError::Import(e) => {
                tracing::warn!(error = %e, "Backup import rejected");
                ApiError::new(ErrorCode::ImportParseFailure, e.to_string())
            }
            RegisterError::Write(e) => {
                // Log the actual error but return a generic message
                tracing::error!(error = %e, "Durable write failed");
                ApiError::new(
                    ErrorCode::WriteFailure,
                    "Could not save; the change was not applied",
                )
            }
            RegisterError::Encode(e) => {
                tracing::error!(error = %e, "Export encoding failed");
                ApiError::internal("Could not encode export")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}
