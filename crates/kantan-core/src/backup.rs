//! # Backup Document
//!
//! A versioned JSON snapshot of settings, catalog and sale history.
//!
//! ## Format
//! ```text
//! {
//!   "version": 1,
//!   "settings": { "taxRate": 0.1 },
//!   "products": [ { "id": .., "name": .., "price": .., "category": .. } ],
//!   "sales":    [ { "id": .., "at": .., "items": [..], "subtotal": .., ... } ]
//! }
//! ```
//!
//! ## Import Rules
//! - The document must be a JSON object
//! - `version`, when present, must be 1
//! - A missing (or `null`) section leaves that store as it is
//! - Every product must satisfy the catalog invariants and ids must be unique
//!
//! Parsing is all-or-nothing: `parse` either returns every section ready to
//! install or an error, so a rejected document never half-applies.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::Catalog;
use crate::error::ImportError;
use crate::ledger::Ledger;
use crate::types::{Product, Sale, Settings};
use crate::BACKUP_VERSION;

/// The exported document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupDocument {
    pub version: u32,
    pub settings: Settings,
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
}

impl BackupDocument {
    /// Snapshots the current state.
    pub fn export(settings: &Settings, catalog: &Catalog, ledger: &Ledger) -> Self {
        BackupDocument {
            version: BACKUP_VERSION,
            settings: *settings,
            products: catalog.products().to_vec(),
            sales: ledger.sales().to_vec(),
        }
    }

    /// Two-space indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parses and validates an imported document.
    pub fn parse(text: &str) -> Result<BackupImport, ImportError> {
        let value: Value = serde_json::from_str(text)?;
        let mut object = match value {
            Value::Object(map) => map,
            _ => return Err(ImportError::NotAnObject),
        };

        match object.remove("version") {
            None | Some(Value::Null) => {}
            Some(version) => match version.as_u64() {
                Some(v) if v == u64::from(BACKUP_VERSION) => {}
                other => return Err(ImportError::UnsupportedVersion(other.unwrap_or(0))),
            },
        }

        let settings = section::<Settings>(&mut object, "settings")?;
        let products = section::<Vec<Product>>(&mut object, "products")?;
        let sales = section::<Vec<Sale>>(&mut object, "sales")?;

        if let Some(products) = &products {
            let mut seen = HashSet::with_capacity(products.len());
            for product in products {
                product.validate()?;
                if !seen.insert(product.id.as_str()) {
                    return Err(ImportError::DuplicateProduct(product.id.clone()));
                }
            }
        }

        Ok(BackupImport {
            settings,
            catalog: products.map(Catalog::from_products),
            ledger: sales.map(Ledger::from_sales),
        })
    }
}

/// Sections of a validated import; `None` means "keep current".
#[derive(Debug, Clone, PartialEq)]
pub struct BackupImport {
    pub settings: Option<Settings>,
    pub catalog: Option<Catalog>,
    pub ledger: Option<Ledger>,
}

fn section<T: serde::de::DeserializeOwned>(
    object: &mut serde_json::Map<String, Value>,
    key: &str,
) -> Result<Option<T>, ImportError> {
    match object.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{SaleItem, TaxRate};
    use chrono::{TimeZone, Utc};

    fn state() -> (Settings, Catalog, Ledger) {
        let settings = Settings {
            tax_rate: TaxRate::from_bps(800),
        };
        let mut catalog = Catalog::new();
        catalog.insert(Product::new("p1", "Coffee", Money::from_yen(450), "Drinks").unwrap());
        catalog.insert(Product::new("p2", "Cookie", Money::from_yen(300), "").unwrap());

        let mut ledger = Ledger::new();
        ledger.record(Sale {
            id: "s1".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
            items: vec![SaleItem {
                product_id: "p1".to_string(),
                name: "Coffee".to_string(),
                price: Money::from_yen(450),
                qty: 1,
                category: "Drinks".to_string(),
            }],
            subtotal: Money::from_yen(450),
            tax: Money::from_yen(36),
            total: Money::from_yen(486),
            cash: Money::from_yen(500),
            change: Money::from_yen(14),
        });
        (settings, catalog, ledger)
    }

    #[test]
    fn test_export_then_parse_reproduces_state() {
        let (settings, catalog, ledger) = state();
        let json = BackupDocument::export(&settings, &catalog, &ledger)
            .to_json_pretty()
            .unwrap();
        assert!(json.contains("\n  \"version\": 1"));

        let import = BackupDocument::parse(&json).unwrap();
        assert_eq!(import.settings, Some(settings));
        assert_eq!(import.catalog, Some(catalog));
        assert_eq!(import.ledger, Some(ledger));
    }

    #[test]
    fn test_missing_sections_are_none() {
        let import = BackupDocument::parse(r#"{"settings":{"taxRate":0.08}}"#).unwrap();
        assert_eq!(import.settings.map(|s| s.tax_rate.bps()), Some(800));
        assert!(import.catalog.is_none());
        assert!(import.ledger.is_none());

        let import = BackupDocument::parse(r#"{"products":null}"#).unwrap();
        assert!(import.catalog.is_none());
    }

    #[test]
    fn test_rejects_non_objects_and_bad_json() {
        assert!(matches!(BackupDocument::parse("[]"), Err(ImportError::NotAnObject)));
        assert!(matches!(BackupDocument::parse("42"), Err(ImportError::NotAnObject)));
        assert!(matches!(BackupDocument::parse("{oops"), Err(ImportError::Malformed(_))));
        assert!(matches!(
            BackupDocument::parse(r#"{"products":{"id":"x"}}"#),
            Err(ImportError::Malformed(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_version() {
        assert!(matches!(
            BackupDocument::parse(r#"{"version":2,"products":[]}"#),
            Err(ImportError::UnsupportedVersion(2))
        ));
        assert!(BackupDocument::parse(r#"{"version":1}"#).is_ok());
    }

    #[test]
    fn test_rejects_invalid_products() {
        let negative = r#"{"products":[{"id":"a","name":"Tea","price":-1}]}"#;
        assert!(matches!(
            BackupDocument::parse(negative),
            Err(ImportError::InvalidRecord(_))
        ));

        let blank = r#"{"products":[{"id":"a","name":"  ","price":1}]}"#;
        assert!(matches!(BackupDocument::parse(blank), Err(ImportError::InvalidRecord(_))));

        let duplicate = r#"{"products":[
            {"id":"a","name":"Tea","price":1},
            {"id":"a","name":"Coffee","price":2}
        ]}"#;
        assert!(matches!(
            BackupDocument::parse(duplicate),
            Err(ImportError::DuplicateProduct(id)) if id == "a"
        ));
    }

    #[test]
    fn test_rejects_invalid_tax_rate() {
        assert!(BackupDocument::parse(r#"{"settings":{"taxRate":3}}"#).is_err());
    }
}
