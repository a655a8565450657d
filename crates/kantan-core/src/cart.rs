//! # Cart
//!
//! The in-progress order: product references with quantities, in the order
//! they were first added.
//!
//! ## Invariants
//! - At most one entry per product id
//! - Every entry has `qty > 0`; dropping to zero removes the entry
//!
//! Entries are not checked against the catalog. A dangling id is harmless:
//! pricing skips it.

use serde::{Deserialize, Serialize};

use crate::types::CartEntry;

/// The current cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    /// Rebuilds a cart from persisted entries, merging duplicates and
    /// dropping non-positive quantities.
    pub fn from_entries(entries: Vec<CartEntry>) -> Self {
        let mut cart = Cart::new();
        for entry in entries.into_iter().filter(|e| e.qty > 0) {
            match cart.position(&entry.product_id) {
                Some(index) => {
                    let merged = &mut cart.entries[index];
                    merged.qty = merged.qty.saturating_add(entry.qty);
                }
                None => cart.entries.push(entry),
            }
        }
        cart
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Quantity of a product, 0 when absent.
    pub fn qty_of(&self, product_id: &str) -> i64 {
        self.entries
            .iter()
            .find(|e| e.product_id == product_id)
            .map_or(0, |e| e.qty)
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.product_id == product_id)
    }

    /// Adds one unit of a product, creating its entry when absent.
    pub fn add(&mut self, product_id: &str) {
        match self.position(product_id) {
            Some(index) => {
                let entry = &mut self.entries[index];
                entry.qty = entry.qty.saturating_add(1);
            }
            None => self.entries.push(CartEntry {
                product_id: product_id.to_string(),
                qty: 1,
            }),
        }
    }

    /// Adjusts the quantity of an existing entry by `delta`.
    ///
    /// ```text
    /// present, qty + delta > 0   → qty updated in place
    /// present, qty + delta <= 0  → entry removed
    /// absent                     → no-op
    /// ```
    ///
    /// Only `add` creates entries.
    pub fn change_qty(&mut self, product_id: &str, delta: i64) {
        let Some(index) = self.position(product_id) else {
            return;
        };
        let qty = self.entries[index].qty.saturating_add(delta);
        if qty > 0 {
            self.entries[index].qty = qty;
        } else {
            self.entries.remove(index);
        }
    }

    /// Removes a product's entry. Returns whether one existed.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.product_id != product_id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
