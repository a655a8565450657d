//! # Checkout
//!
//! Validates the tendered cash and builds the immutable sale record.
//!
//! `complete_sale` only constructs the `Sale`. Recording it in the ledger,
//! clearing the cart and persisting both belong to the caller, which must
//! treat the three as one step.

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::error::CommitError;
use crate::pricing::compute_totals;
use crate::source::{Clock, IdGenerator};
use crate::types::{Sale, SaleItem, TaxRate};
use crate::validation::parse_yen;

/// Commits a cart into a sale.
///
/// ## Check Order
/// 1. At least one cart entry resolves to a product, else `EmptyCart`
/// 2. `cash_input` parses as whole yen, else `InvalidCash`
/// 3. cash covers the total, else `InsufficientCash { shortfall }`
///
/// The id and timestamp are drawn only once every check has passed.
/// Lines are frozen copies, so later catalog edits do not reach the sale.
pub fn complete_sale(
    cart: &Cart,
    catalog: &Catalog,
    rate: TaxRate,
    cash_input: &str,
    ids: &dyn IdGenerator,
    clock: &dyn Clock,
) -> Result<Sale, CommitError> {
    let priced = compute_totals(cart, catalog, rate);
    if priced.is_empty() {
        return Err(CommitError::EmptyCart);
    }

    let cash = parse_yen(cash_input).ok_or_else(|| CommitError::InvalidCash {
        input: cash_input.trim().to_string(),
    })?;

    let total = priced.totals.total;
    if cash < total {
        return Err(CommitError::InsufficientCash {
            shortfall: total - cash,
        });
    }

    Ok(Sale {
        id: ids.next_id(),
        timestamp: clock.now(),
        items: priced.lines.iter().map(SaleItem::from).collect(),
        subtotal: priced.totals.subtotal,
        tax: priced.totals.tax,
        total,
        cash,
        change: cash - total,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::source::{FixedClock, SequentialIds};
    use crate::types::Product;
    use chrono::{TimeZone, Utc};
    use crate::strategies;
    use proptest::prelude::*;

    fn setup() -> (Cart, Catalog) {
        let mut catalog = Catalog::new();
        catalog.insert(Product::new("p1", "Coffee", Money::from_yen(450), "Drinks").unwrap());
        let mut cart = Cart::new();
        cart.add("p1");
        cart.add("p1");
        (cart, catalog)
    }

    fn commit(cart: &Cart, catalog: &Catalog, cash: &str) -> Result<Sale, CommitError> {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap());
        complete_sale(
            cart,
            catalog,
            TaxRate::from_bps(1000),
            cash,
            &SequentialIds::new("sale"),
            &clock,
        )
    }

    #[test]
    fn test_exact_cash_gives_zero_change() {
        let (cart, catalog) = setup();
        let sale = commit(&cart, &catalog, "990").unwrap();

        assert_eq!(sale.id, "sale-1");
        assert_eq!(sale.subtotal.yen(), 900);
        assert_eq!(sale.tax.yen(), 90);
        assert_eq!(sale.total.yen(), 990);
        assert_eq!(sale.cash.yen(), 990);
        assert_eq!(sale.change, Money::zero());
        assert_eq!(sale.items.len(), 1);
        assert_eq!(sale.items[0].qty, 2);
        assert_eq!(sale.items[0].name, "Coffee");
        assert_eq!(sale.timestamp, Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap());
    }

    #[test]
    fn test_change_is_cash_minus_total() {
        let (cart, catalog) = setup();
        let sale = commit(&cart, &catalog, "1,000").unwrap();
        assert_eq!(sale.change.yen(), 10);
    }

    #[test]
    fn test_insufficient_cash_reports_shortfall() {
        let (cart, catalog) = setup();
        let err = commit(&cart, &catalog, "500").unwrap_err();
        assert_eq!(
            err,
            CommitError::InsufficientCash {
                shortfall: Money::from_yen(490)
            }
        );
    }

    #[test]
    fn test_empty_cart() {
        let (_, catalog) = setup();
        assert_eq!(commit(&Cart::new(), &catalog, "1000"), Err(CommitError::EmptyCart));
    }

    #[test]
    fn test_dangling_only_cart_is_empty() {
        let (_, catalog) = setup();
        let mut cart = Cart::new();
        cart.add("deleted");
        assert_eq!(commit(&cart, &catalog, "1000"), Err(CommitError::EmptyCart));
    }

    #[test]
    fn test_empty_cart_checked_before_cash() {
        let (_, catalog) = setup();
        assert_eq!(commit(&Cart::new(), &catalog, "abc"), Err(CommitError::EmptyCart));
    }

    #[test]
    fn test_invalid_cash() {
        let (cart, catalog) = setup();
        for input in ["", "abc", "-100", "12.5"] {
            assert!(
                matches!(commit(&cart, &catalog, input), Err(CommitError::InvalidCash { .. })),
                "input {:?} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_sale_is_frozen_against_catalog_edits() {
        let (cart, mut catalog) = setup();
        let sale = commit(&cart, &catalog, "990").unwrap();

        catalog.insert(Product::new("p1", "Decaf", Money::from_yen(1), "").unwrap());
        catalog.remove("p1");

        assert_eq!(sale.items[0].name, "Coffee");
        assert_eq!(sale.items[0].price.yen(), 450);
        assert_eq!(sale.items[0].category, "Drinks");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn sufficient_cash_never_gives_negative_change(
            catalog in strategies::catalog(),
            cart in strategies::cart(),
            rate in strategies::tax_rate(),
            extra in 0i64..1_000_000,
        ) {
            let priced = compute_totals(&cart, &catalog, rate);
            prop_assume!(!priced.is_empty());

            let cash = priced.totals.total.yen() + extra;
            let clock = FixedClock(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap());
            let sale = complete_sale(
                &cart,
                &catalog,
                rate,
                &cash.to_string(),
                &SequentialIds::new("sale"),
                &clock,
            )
            .unwrap();

            prop_assert!(sale.change.yen() >= 0);
            prop_assert_eq!(sale.change.yen(), extra);
            prop_assert_eq!(sale.total, priced.totals.total);
        }

        #[test]
        fn short_cash_reports_exact_shortfall(
            catalog in strategies::catalog(),
            cart in strategies::cart(),
            rate in strategies::tax_rate(),
            short in 1i64..1_000_000,
        ) {
            let priced = compute_totals(&cart, &catalog, rate);
            let total = priced.totals.total.yen();
            prop_assume!(!priced.is_empty() && total >= short);

            let clock = FixedClock(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap());
            let err = complete_sale(
                &cart,
                &catalog,
                rate,
                &(total - short).to_string(),
                &SequentialIds::new("sale"),
                &clock,
            )
            .unwrap_err();

            prop_assert_eq!(err, CommitError::InsufficientCash { shortfall: Money::from_yen(short) });
        }
    }
}
