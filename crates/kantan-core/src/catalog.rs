//! # Catalog
//!
//! The set of sellable products, unique by id, kept in insertion order.
//!
//! ## Operations
//! ```text
//! upsert(None, ..)        → fresh id, appended
//! upsert(Some(id), ..)    → id exists:  fields replaced in place
//!                           id missing: appended under the caller's id
//! remove(id)              → gone (cart cascade is the caller's job)
//! search(q)               → sorted by name, filtered on "name category"
//! ```

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::source::IdGenerator;
use crate::types::Product;
use crate::validation::ValidationResult;

/// Demo products added by the "seed" action.
const DEMO_PRODUCTS: &[(&str, i64, &str)] = &[
    ("Coffee", 450, "Drinks"),
    ("Tea", 420, "Drinks"),
    ("Cookie", 300, "Food"),
    ("Cake", 520, "Food"),
];

/// Input for creating or editing a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    /// Blank or `None` means "create with a fresh id".
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub category: String,
}

impl ProductDraft {
    /// The explicit id, if one was supplied and is not blank.
    pub fn explicit_id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}

/// Whether an upsert created or replaced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Created,
    Updated,
}

/// Product catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Wraps an existing product list (e.g. loaded from storage).
    pub fn from_products(products: Vec<Product>) -> Self {
        Catalog { products }
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Products in insertion order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Inserts or replaces a product by id.
    pub fn insert(&mut self, product: Product) -> Upserted {
        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => {
                *existing = product;
                Upserted::Updated
            }
            None => {
                self.products.push(product);
                Upserted::Created
            }
        }
    }

    /// Creates or edits a product from a draft.
    ///
    /// ## Dual-Mode Upsert
    /// - No id: a fresh id is generated and the product is appended.
    /// - Id of an existing product: name/price/category replaced in place,
    ///   position unchanged.
    /// - Id that matches nothing: the product is appended under that id.
    ///
    /// Validation runs before anything is touched.
    pub fn upsert(
        &mut self,
        draft: &ProductDraft,
        ids: &dyn IdGenerator,
    ) -> ValidationResult<(Product, Upserted)> {
        let id = match draft.explicit_id() {
            Some(id) => id.to_string(),
            None => ids.next_id(),
        };
        let product = Product::new(id, &draft.name, draft.price, &draft.category)?;
        let outcome = self.insert(product.clone());
        Ok((product, outcome))
    }

    /// Removes a product. Returns the removed record, if any.
    pub fn remove(&mut self, id: &str) -> Option<Product> {
        let index = self.products.iter().position(|p| p.id == id)?;
        Some(self.products.remove(index))
    }

    /// Products matching `query`, sorted by name.
    ///
    /// The query is matched case-insensitively against `"name category"`;
    /// an empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let query = query.trim().to_lowercase();
        let mut found: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| {
                query.is_empty()
                    || format!("{} {}", p.name, p.category)
                        .to_lowercase()
                        .contains(&query)
            })
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        found
    }

    /// Appends the demo products with fresh ids. Returns how many were added.
    pub fn seed_demo(&mut self, ids: &dyn IdGenerator) -> usize {
        for (name, price, category) in DEMO_PRODUCTS {
            self.products.push(Product {
                id: ids.next_id(),
                name: (*name).to_string(),
                price: Money::from_yen(*price),
                category: (*category).to_string(),
            });
        }
        DEMO_PRODUCTS.len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
