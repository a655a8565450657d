//! # Pricing Engine
//!
//! Turns the cart into priced lines and totals.
//!
//! ## Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  for each cart entry, in cart order:                                    │
//! │      product = catalog[entry.product_id]    (missing → line skipped)    │
//! │      line_total = product.price × qty                                   │
//! │                                                                         │
//! │  subtotal = Σ line_total                                                │
//! │  tax      = floor(subtotal × rate)      ← once, on the subtotal         │
//! │  total    = subtotal + tax                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tax is never computed per line: `Σ floor(line × rate)` can differ from
//! `floor(Σ line × rate)` by a yen or more.

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::money::Money;
use crate::types::{PricedCart, PricedLine, TaxRate, Totals};

/// Prices a cart against the catalog.
///
/// Pure and total: an empty or fully dangling cart yields no lines and
/// zero totals.
pub fn compute_totals(cart: &Cart, catalog: &Catalog, rate: TaxRate) -> PricedCart {
    let lines: Vec<PricedLine> = cart
        .entries()
        .iter()
        .filter_map(|entry| {
            let product = catalog.get(&entry.product_id)?;
            Some(PricedLine {
                product: product.clone(),
                qty: entry.qty,
                line_total: product.price.multiply_quantity(entry.qty),
            })
        })
        .collect();

    let subtotal: Money = lines.iter().map(|line| line.line_total).sum();
    let tax = subtotal.calculate_tax(rate);

    PricedCart {
        lines,
        totals: Totals {
            subtotal,
            tax,
            total: subtotal + tax,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Product;
    use crate::strategies;
    use proptest::prelude::*;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert(Product::new("coffee", "Coffee", Money::from_yen(450), "Drinks").unwrap());
        catalog.insert(Product::new("cookie", "Cookie", Money::from_yen(333), "Food").unwrap());
        catalog
    }

    #[test]
    fn test_two_coffees_at_ten_percent() {
        let mut cart = Cart::new();
        cart.add("coffee");
        cart.add("coffee");

        let priced = compute_totals(&cart, &catalog(), TaxRate::from_bps(1000));
        assert_eq!(priced.lines.len(), 1);
        assert_eq!(priced.lines[0].line_total.yen(), 900);
        assert_eq!(priced.totals.subtotal.yen(), 900);
        assert_eq!(priced.totals.tax.yen(), 90);
        assert_eq!(priced.totals.total.yen(), 990);
    }

    #[test]
    fn test_empty_cart_is_all_zero() {
        let priced = compute_totals(&Cart::new(), &catalog(), TaxRate::default());
        assert!(priced.is_empty());
        assert_eq!(priced.totals, Totals::default());
    }

    #[test]
    fn test_dangling_entries_are_skipped() {
        let mut cart = Cart::new();
        cart.add("ghost");
        cart.add("cookie");

        let priced = compute_totals(&cart, &catalog(), TaxRate::default());
        assert_eq!(priced.lines.len(), 1);
        assert_eq!(priced.lines[0].product.id, "cookie");
        assert_eq!(priced.totals.subtotal.yen(), 333);
    }

    #[test]
    fn test_tax_on_subtotal_not_per_line() {
        // per line: floor(0.5) + floor(0.5) = 0; on the subtotal: floor(1.0) = 1
        let mut cart = Cart::new();
        cart.add("cookie");
        cart.add("coffee");
        let mut catalog = catalog();
        catalog.insert(Product::new("coffee", "Coffee", Money::from_yen(5), "").unwrap());
        catalog.insert(Product::new("cookie", "Cookie", Money::from_yen(5), "").unwrap());

        let priced = compute_totals(&cart, &catalog, TaxRate::from_bps(1000));
        assert_eq!(priced.totals.subtotal.yen(), 10);
        assert_eq!(priced.totals.tax.yen(), 1);
        assert_eq!(priced.totals.total.yen(), 11);
    }

    #[test]
    fn test_lines_follow_cart_order() {
        let mut cart = Cart::new();
        cart.add("cookie");
        cart.add("coffee");

        let priced = compute_totals(&cart, &catalog(), TaxRate::zero());
        let ids: Vec<&str> = priced.lines.iter().map(|l| l.product.id.as_str()).collect();
        assert_eq!(ids, vec!["cookie", "coffee"]);
        assert_eq!(priced.totals.tax, Money::zero());
    }

    /// `subtotal * bps / 10000` in i128, summed over resolvable entries.
    fn reference_totals(cart: &Cart, catalog: &Catalog, rate: TaxRate) -> (i128, i128) {
        let subtotal: i128 = cart
            .entries()
            .iter()
            .filter_map(|e| {
                catalog
                    .get(&e.product_id)
                    .map(|p| i128::from(p.price.yen()) * i128::from(e.qty))
            })
            .sum();
        (subtotal, subtotal * i128::from(rate.bps()) / 10_000)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn compute_totals_is_deterministic(
            catalog in strategies::catalog(),
            cart in strategies::cart(),
            rate in strategies::tax_rate(),
        ) {
            prop_assert_eq!(
                compute_totals(&cart, &catalog, rate),
                compute_totals(&cart, &catalog, rate)
            );
        }

        #[test]
        fn tax_is_floor_of_subtotal_times_rate(
            catalog in strategies::catalog(),
            cart in strategies::cart(),
            rate in strategies::tax_rate(),
        ) {
            let priced = compute_totals(&cart, &catalog, rate);
            let (subtotal, tax) = reference_totals(&cart, &catalog, rate);

            prop_assert_eq!(i128::from(priced.totals.subtotal.yen()), subtotal);
            prop_assert_eq!(i128::from(priced.totals.tax.yen()), tax);
            prop_assert_eq!(priced.totals.total, priced.totals.subtotal + priced.totals.tax);
            prop_assert!(priced.lines.iter().all(|l| catalog.contains(&l.product.id)));
        }
    }
}
