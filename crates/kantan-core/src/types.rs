//! # Domain Types
//!
//! Records used throughout the register.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   CartEntry     │   │   PricedLine    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  product_id     │   │  product (copy) │       │
//! │  │  name           │   │  qty (> 0)      │   │  qty            │       │
//! │  │  price (yen)    │   └─────────────────┘   │  line_total     │       │
//! │  │  category       │                         └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Sale       │   │    SaleItem     │   │    Settings     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, timestamp  │──►│  frozen product │   │  tax_rate       │       │
//! │  │  subtotal/tax   │   │  fields + qty   │   │  (bps, 10%)     │       │
//! │  │  total/cash/chg │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persisted Shape
//! JSON field names are camelCase and match records written by earlier
//! browser builds of the register (`at` for the sale timestamp,
//! `productId`, `taxRate` as a fraction).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{validate_price, validate_product_name, ValidationResult};
use crate::DEFAULT_TAX_RATE_BPS;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000. Holding the rate as an integer makes
/// `floor(subtotal × rate)` exact: 10% is 1000 bps, 8% is 800 bps.
///
/// On the wire the rate is a plain fraction (`0.1`), as stored by the
/// settings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    ///
    /// Values above 10000 (100%) are clamped.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        if bps > 10_000 {
            TaxRate(10_000)
        } else {
            TaxRate(bps)
        }
    }

    /// Creates a tax rate from a fraction in [0, 1].
    ///
    /// The fraction is rounded to the nearest basis point.
    ///
    /// ```rust
    /// use kantan_core::types::TaxRate;
    ///
    /// assert_eq!(TaxRate::from_fraction(0.1).unwrap().bps(), 1000);
    /// assert_eq!(TaxRate::from_fraction(0.08).unwrap().bps(), 800);
    /// assert!(TaxRate::from_fraction(1.5).is_err());
    /// assert!(TaxRate::from_fraction(f64::NAN).is_err());
    /// ```
    pub fn from_fraction(fraction: f64) -> ValidationResult<Self> {
        if !fraction.is_finite() {
            return Err(ValidationError::invalid_tax_rate("must be a finite number"));
        }
        if !(0.0..=1.0).contains(&fraction) {
            return Err(ValidationError::invalid_tax_rate(format!(
                "{} is outside 0..=1",
                fraction
            )));
        }
        Ok(TaxRate((fraction * 10_000.0).round() as u32))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a fraction (0.1 for 10%).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate(DEFAULT_TAX_RATE_BPS)
    }
}

impl TryFrom<f64> for TaxRate {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        TaxRate::from_fraction(value)
    }
}

impl From<TaxRate> for f64 {
    fn from(rate: TaxRate) -> Self {
        rate.fraction()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A sellable item in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Opaque unique identifier.
    pub id: String,

    /// Display name (never empty after trimming).
    pub name: String,

    /// Price in yen (non-negative).
    pub price: Money,

    /// Free-form category; empty when none.
    #[serde(default)]
    pub category: String,
}

impl Product {
    /// Creates a product, enforcing the catalog invariants.
    ///
    /// Name and category are trimmed.
    ///
    /// ## Errors
    /// - `NameRequired` if the name is blank
    /// - `InvalidPrice` if the price is negative or above `MAX_PRICE_YEN`
    pub fn new(
        id: impl Into<String>,
        name: &str,
        price: Money,
        category: &str,
    ) -> ValidationResult<Self> {
        validate_product_name(name)?;
        validate_price(price)?;

        Ok(Product {
            id: id.into(),
            name: name.trim().to_string(),
            price,
            category: category.trim().to_string(),
        })
    }

    /// Re-checks the invariants of a record that bypassed `new`
    /// (deserialized from storage or a backup).
    pub fn validate(&self) -> ValidationResult<()> {
        validate_product_name(&self.name)?;
        validate_price(self.price)
    }
}

// =============================================================================
// Cart Entry
// =============================================================================

/// One product reference in the cart.
///
/// The entry holds only the id; price and name are resolved against the
/// catalog at pricing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartEntry {
    /// Referenced `Product::id` (may dangle after a catalog import).
    pub product_id: String,

    /// Quantity, always > 0 while the entry exists.
    pub qty: i64,
}

// =============================================================================
// Priced Line / Totals
// =============================================================================

/// A cart entry resolved against the catalog. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PricedLine {
    /// Snapshot of the product at pricing time.
    pub product: Product,

    pub qty: i64,

    /// `price × qty`.
    pub line_total: Money,
}

/// Subtotal, tax and total of a priced cart.
///
/// `tax == floor(subtotal × rate)` and `total == subtotal + tax`, always.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Totals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

/// Output of the pricing engine: lines in cart order plus totals.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PricedCart {
    pub lines: Vec<PricedLine>,
    pub totals: Totals,
}

impl PricedCart {
    /// True when no cart entry resolved to a product.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A line of a committed sale.
///
/// Snapshot pattern: product fields are copied at commit time so later
/// catalog edits or deletes never change history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleItem {
    /// Product id at time of sale (may no longer exist).
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub name: String,
    /// Unit price at time of sale (frozen).
    pub price: Money,
    pub qty: i64,
    /// Category at time of sale (frozen), empty when none.
    #[serde(default)]
    pub category: String,
}

impl SaleItem {
    /// `price × qty` of the frozen line.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.qty)
    }
}

impl From<&PricedLine> for SaleItem {
    fn from(line: &PricedLine) -> Self {
        SaleItem {
            product_id: line.product.id.clone(),
            name: line.product.name.clone(),
            price: line.product.price,
            qty: line.qty,
            category: line.product.category.clone(),
        }
    }
}

/// An immutable record of one completed, paid transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: String,

    /// When the sale was committed.
    #[serde(rename = "at", alias = "timestamp")]
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,

    pub items: Vec<SaleItem>,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,

    /// Tendered cash.
    pub cash: Money,

    /// `cash - total`, never negative.
    pub change: Money,
}

// =============================================================================
// Settings
// =============================================================================

/// Register-wide settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Settings {
    /// Consumption tax applied to the subtotal (default 10%).
    #[serde(default)]
    #[ts(type = "number")]
    pub tax_rate: TaxRate,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(800);
        assert_eq!(rate.bps(), 800);
        assert!((rate.percentage() - 8.0).abs() < 0.001);
        assert_eq!(TaxRate::from_bps(20_000).bps(), 10_000);
    }

    #[test]
    fn test_tax_rate_default_is_ten_percent() {
        assert_eq!(TaxRate::default().bps(), 1000);
        assert_eq!(Settings::default().tax_rate.bps(), 1000);
    }

    #[test]
    fn test_tax_rate_serde_as_fraction() {
        let json = serde_json::to_string(&Settings {
            tax_rate: TaxRate::from_bps(800),
        })
        .unwrap();
        assert_eq!(json, r#"{"taxRate":0.08}"#);

        let settings: Settings = serde_json::from_str(r#"{"taxRate":0.1}"#).unwrap();
        assert_eq!(settings.tax_rate.bps(), 1000);

        assert!(serde_json::from_str::<Settings>(r#"{"taxRate":2}"#).is_err());
        assert!(serde_json::from_str::<Settings>(r#"{"taxRate":-0.1}"#).is_err());
    }

    #[test]
    fn test_product_new_trims_and_validates() {
        let p = Product::new("p1", "  Coffee ", Money::from_yen(450), " Drinks ").unwrap();
        assert_eq!(p.name, "Coffee");
        assert_eq!(p.category, "Drinks");

        assert_eq!(
            Product::new("p2", "   ", Money::from_yen(1), ""),
            Err(ValidationError::NameRequired)
        );
        assert!(matches!(
            Product::new("p3", "Tea", Money::from_yen(-1), ""),
            Err(ValidationError::InvalidPrice { .. })
        ));
        assert!(Product::new("p4", "Water", Money::zero(), "").is_ok());
    }

    #[test]
    fn test_product_without_category_deserializes() {
        let p: Product =
            serde_json::from_str(r#"{"id":"x","name":"Cookie","price":300}"#).unwrap();
        assert_eq!(p.category, "");
    }

    #[test]
    fn test_sale_timestamp_field_is_at() {
        let sale = Sale {
            id: "s1".to_string(),
            timestamp: DateTime::parse_from_rfc3339("2024-05-01T09:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
            items: vec![SaleItem {
                product_id: "p1".to_string(),
                name: "Coffee".to_string(),
                price: Money::from_yen(450),
                qty: 2,
                category: "Drinks".to_string(),
            }],
            subtotal: Money::from_yen(900),
            tax: Money::from_yen(90),
            total: Money::from_yen(990),
            cash: Money::from_yen(1000),
            change: Money::from_yen(10),
        };

        let value = serde_json::to_value(&sale).unwrap();
        assert!(value.get("at").is_some());
        assert!(value.get("timestamp").is_none());
        assert_eq!(value["items"][0]["productId"], "p1");

        let back: Sale = serde_json::from_value(value).unwrap();
        assert_eq!(back, sale);
        assert_eq!(back.items[0].line_total().yen(), 900);
    }
}
