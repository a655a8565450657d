//! # Error Types
//!
//! Domain-specific error types for kantan-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kantan-core errors (this file)                                        │
//! │  ├── ValidationError  - Catalog / settings input failures              │
//! │  ├── CommitError      - Sale commit refused                            │
//! │  └── ImportError      - Backup document rejected                       │
//! │                                                                         │
//! │  kantan-store errors (separate crate)                                  │
//! │  └── DbError          - Durable storage failures                       │
//! │                                                                         │
//! │  Register app errors                                                   │
//! │  ├── RegisterError    - Any of the above, write failures included      │
//! │  └── ApiError         - What the front end sees (serialized)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant maps to a stable machine code through `code()`. None of
//! these are fatal: the caller reports them and carries on.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Validation Error
// =============================================================================

/// Catalog and settings input failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Product name is empty after trimming.
    #[error("Product name is required")]
    NameRequired,

    /// Price is not an integer amount of yen in the accepted range.
    #[error("Invalid price: {reason}")]
    InvalidPrice { reason: String },

    /// Tax rate is not a finite fraction in [0, 1].
    #[error("Invalid tax rate: {reason}")]
    InvalidTaxRate { reason: String },
}

impl ValidationError {
    /// Machine-readable code for the front end.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::NameRequired => "NAME_REQUIRED",
            ValidationError::InvalidPrice { .. } => "INVALID_PRICE",
            ValidationError::InvalidTaxRate { .. } => "INVALID_TAX_RATE",
        }
    }

    pub(crate) fn invalid_price(reason: impl Into<String>) -> Self {
        ValidationError::InvalidPrice {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_tax_rate(reason: impl Into<String>) -> Self {
        ValidationError::InvalidTaxRate {
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Commit Error
// =============================================================================

/// Reasons a sale commit is refused.
///
/// Checked in declaration order; the first failing check wins.
///
/// ## User Workflow
/// ```text
/// Pay pressed (total 990, cash "500")
///      │
///      ▼
/// any resolvable lines? ── no ──► EmptyCart
///      │ yes
///      ▼
/// cash parses?          ── no ──► InvalidCash
///      │ yes
///      ▼
/// cash ≥ total?         ── no ──► InsufficientCash { shortfall: 490 }
///      │ yes
///      ▼
/// Sale recorded, cart cleared
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    /// No cart entry resolves to a catalog product.
    #[error("Cart is empty")]
    EmptyCart,

    /// Tendered amount is not a non-negative integer.
    #[error("Invalid cash amount: {input:?}")]
    InvalidCash { input: String },

    /// Tendered amount is below the total.
    #[error("Insufficient cash: {shortfall} short")]
    InsufficientCash { shortfall: Money },
}

impl CommitError {
    /// Machine-readable code for the front end.
    pub fn code(&self) -> &'static str {
        match self {
            CommitError::EmptyCart => "EMPTY_CART",
            CommitError::InvalidCash { .. } => "INVALID_CASH",
            CommitError::InsufficientCash { .. } => "INSUFFICIENT_CASH",
        }
    }
}

// =============================================================================
// Import Error
// =============================================================================

/// A backup document that cannot be applied.
///
/// All variants report as IMPORT_PARSE_FAILURE; the detail is for logs.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Not valid JSON, or a section has the wrong shape.
    #[error("Backup is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Valid JSON but not an object.
    #[error("Backup must be a JSON object")]
    NotAnObject,

    /// Written by a newer (or unknown) format.
    #[error("Unsupported backup version {0}")]
    UnsupportedVersion(u64),

    /// Two products share an id.
    #[error("Duplicate product id in backup: {0}")]
    DuplicateProduct(String),

    /// A product or the settings violate an invariant.
    #[error("Invalid record in backup: {0}")]
    InvalidRecord(#[from] ValidationError),
}

impl ImportError {
    /// Machine-readable code for the front end.
    pub fn code(&self) -> &'static str {
        "IMPORT_PARSE_FAILURE"
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CommitError::InsufficientCash {
            shortfall: Money::from_yen(490),
        };
        assert_eq!(err.to_string(), "Insufficient cash: ¥490 short");

        assert_eq!(ValidationError::NameRequired.to_string(), "Product name is required");
    }

    #[test]
    fn test_codes() {
        assert_eq!(CommitError::EmptyCart.code(), "EMPTY_CART");
        assert_eq!(
            CommitError::InvalidCash {
                input: "abc".to_string()
            }
            .code(),
            "INVALID_CASH"
        );
        assert_eq!(ValidationError::invalid_price("negative").code(), "INVALID_PRICE");
        assert_eq!(ImportError::NotAnObject.code(), "IMPORT_PARSE_FAILURE");
    }

    #[test]
    fn test_validation_converts_to_import_error() {
        let err: ImportError = ValidationError::NameRequired.into();
        assert!(matches!(err, ImportError::InvalidRecord(ValidationError::NameRequired)));
    }
}
