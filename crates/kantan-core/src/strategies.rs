//! proptest strategies shared by the unit tests.

use proptest::prelude::*;

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::money::Money;
use crate::types::{Product, TaxRate};
use crate::MAX_PRICE_YEN;

/// Ids `p0`..`p9`; the catalog holds a prefix of them, so some cart
/// entries dangle.
pub fn product_id(index: usize) -> String {
    format!("p{}", index)
}

pub fn catalog() -> impl Strategy<Value = Catalog> {
    prop::collection::vec(0..=MAX_PRICE_YEN, 0..8).prop_map(|prices| {
        let mut catalog = Catalog::new();
        for (i, price) in prices.into_iter().enumerate() {
            catalog.insert(Product::new(product_id(i), "Item", Money::from_yen(price), "").unwrap());
        }
        catalog
    })
}

pub fn cart() -> impl Strategy<Value = Cart> {
    prop::collection::vec((0usize..10, 1i64..50), 0..10).prop_map(|lines| {
        let mut cart = Cart::new();
        for (index, qty) in lines {
            let id = product_id(index);
            cart.add(&id);
            cart.change_qty(&id, qty - 1);
        }
        cart
    })
}

pub fn tax_rate() -> impl Strategy<Value = TaxRate> {
    (0u32..=10_000).prop_map(TaxRate::from_bps)
}
