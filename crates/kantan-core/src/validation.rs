//! # Validation Module
//!
//! Input parsing and business rule checks.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end                                                    │
//! │  └── Raw text from the cashier ("1,000", "¥450", "  8% ")              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Amount / rate parsing                                             │
//! │  └── Business rules (non-empty name, price range)                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Constructors                                                 │
//! │  └── Product::new / TaxRate::from_fraction call back into here         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kantan_core::validation::{parse_yen, validate_product_name};
//!
//! assert_eq!(parse_yen("1,000").map(|m| m.yen()), Some(1000));
//! assert!(validate_product_name("Coffee").is_ok());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::TaxRate;
use crate::MAX_PRICE_YEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty after trimming
///
/// ## Example
/// ```rust
/// use kantan_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Coffee").is_ok());
/// assert!(validate_product_name("  ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::NameRequired);
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price.
///
/// ## Rules
/// - Must be non-negative (zero is allowed for free items)
/// - Must not exceed `MAX_PRICE_YEN`
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::invalid_price("must not be negative"));
    }
    if price.yen() > MAX_PRICE_YEN {
        return Err(ValidationError::invalid_price(format!(
            "must not exceed {}",
            Money::from_yen(MAX_PRICE_YEN)
        )));
    }
    Ok(())
}

/// Parses a yen amount typed by the cashier.
///
/// ## Accepted Forms
/// ```text
/// "990"        → 990
/// " 1,000 "    → 1000      (grouping commas, surrounding whitespace)
/// "¥1,500"     → 1500      (leading ¥ or ￥)
/// "500円"      → 500       (trailing 円)
/// ""  "-5"  "1.5"  "abc"  → None
/// ```
///
/// Returns `None` for anything that is not a non-negative integer that fits
/// in `i64`.
pub fn parse_yen(input: &str) -> Option<Money> {
    let s = input.trim();
    let s = s
        .strip_prefix('¥')
        .or_else(|| s.strip_prefix('￥'))
        .unwrap_or(s);
    let s = s.strip_suffix('円').unwrap_or(s).trim();

    if s.is_empty() || s.starts_with(',') || s.ends_with(',') {
        return None;
    }

    let digits: String = s.chars().filter(|c| *c != ',').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    digits.parse::<i64>().ok().map(Money::from_yen)
}

/// Parses a textual price and applies `validate_price`.
///
/// ```rust
/// use kantan_core::validation::parse_price;
///
/// assert_eq!(parse_price("450").unwrap().yen(), 450);
/// assert!(parse_price("-450").is_err());
/// assert!(parse_price("").is_err());
/// ```
pub fn parse_price(input: &str) -> ValidationResult<Money> {
    let price = parse_yen(input).ok_or_else(|| {
        ValidationError::invalid_price(format!("{:?} is not a whole yen amount", input.trim()))
    })?;
    validate_price(price)?;
    Ok(price)
}

/// Parses a tax rate typed as a fraction or a percentage.
///
/// ## Rules
/// - `"8%"` or `"8 %"` is a percentage
/// - A bare number above 1 is a percentage (`"10"` → 10%)
/// - Anything else is a fraction (`"0.08"` → 8%, `"1"` → 100%)
///
/// ```rust
/// use kantan_core::validation::parse_tax_rate;
///
/// assert_eq!(parse_tax_rate("0.08").unwrap().bps(), 800);
/// assert_eq!(parse_tax_rate("10").unwrap().bps(), 1000);
/// assert_eq!(parse_tax_rate("8%").unwrap().bps(), 800);
/// assert!(parse_tax_rate("150%").is_err());
/// ```
pub fn parse_tax_rate(input: &str) -> ValidationResult<TaxRate> {
    let s = input.trim();
    let (number, percent) = match s.strip_suffix('%') {
        Some(rest) => (rest.trim(), true),
        None => (s, false),
    };

    let value: f64 = number.parse().map_err(|_| {
        ValidationError::invalid_tax_rate(format!("{:?} is not a number", s))
    })?;

    if percent || value > 1.0 {
        TaxRate::from_fraction(value / 100.0)
    } else {
        TaxRate::from_fraction(value)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
