//! # Money Module
//!
//! Provides the `Money` type for handling yen amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Yen                                              │
//! │    Yen has no subdivision, so every price, subtotal, tax, total,        │
//! │    tendered amount and change is a whole number of yen.                 │
//! │    Tax is the only derived amount and is truncated explicitly.          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kantan_core::money::Money;
//!
//! let price = Money::from_yen(450);
//! let line = price.multiply_quantity(2);
//! assert_eq!(line.yen(), 900);
//! assert_eq!(line.to_string(), "¥900");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole yen.
///
/// ## Design Decisions
/// - **i64 (signed)**: shortfalls and differences stay representable
/// - **Saturating arithmetic**: absurd quantities clamp instead of panicking
/// - **Transparent serde**: serialized as a bare JSON integer
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole yen.
    #[inline]
    pub const fn from_yen(yen: i64) -> Self {
        Money(yen)
    }

    /// Returns the value in yen.
    #[inline]
    pub const fn yen(&self) -> i64 {
        self.0
    }

    /// Returns zero yen.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax on this amount, truncating toward zero.
    ///
    /// ## Rounding Policy
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  tax = floor(amount × rate)                                         │
    /// │                                                                     │
    /// │  The rate is held in basis points, so the product is computed       │
    /// │  exactly as amount × bps / 10000 in integer arithmetic.             │
    /// │                                                                     │
    /// │    999 × 10%  = 99.9  → 99                                          │
    /// │    900 × 10%  = 90.0  → 90                                          │
    /// │    105 × 8%   = 8.4   → 8                                           │
    /// │                                                                     │
    /// │  Never round-half-up. Not configurable.                             │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use kantan_core::money::Money;
    /// use kantan_core::types::TaxRate;
    ///
    /// let tax = Money::from_yen(999).calculate_tax(TaxRate::from_bps(1000));
    /// assert_eq!(tax.yen(), 99);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 so that amount × bps cannot overflow
        let tax = self.0 as i128 * rate.bps() as i128 / 10_000;
        Money::from_yen(tax.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use kantan_core::money::Money;
    ///
    /// assert_eq!(Money::from_yen(450).multiply_quantity(2).yen(), 900);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Formats the amount with thousands separators and no symbol.
    ///
    /// ```rust
    /// use kantan_core::money::Money;
    ///
    /// assert_eq!(Money::from_yen(1234567).grouped(), "1,234,567");
    /// assert_eq!(Money::from_yen(-990).grouped(), "-990");
    /// ```
    pub fn grouped(&self) -> String {
        let digits = self.0.unsigned_abs().to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        if self.0 < 0 {
            out.push('-');
        }
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(ch);
        }
        out
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows yen with a symbol and grouping, e.g. `¥1,234`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grouped = self.grouped();
        match grouped.strip_prefix('-') {
            Some(abs) => write!(f, "-¥{}", abs),
            None => write!(f, "¥{}", grouped),
        }
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
