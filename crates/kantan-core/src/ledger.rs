//! # Ledger
//!
//! Permanent history of committed sales, newest first.
//!
//! ```text
//! record(s3) ─► [s3, s2, s1]
//!                 ▲
//!                 └── index 0 is always the most recent commit
//! ```
//!
//! Sales are never edited. The only removals are `clear` and a wholesale
//! replacement from a backup import.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Sale;

/// Count and grand total of the history, for the history header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LedgerSummary {
    pub count: usize,
    pub total: Money,
}

/// Sale history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    sales: Vec<Sale>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger::default()
    }

    /// Wraps a newest-first list of sales.
    pub fn from_sales(sales: Vec<Sale>) -> Self {
        Ledger { sales }
    }

    /// Prepends a sale.
    pub fn record(&mut self, sale: Sale) {
        self.sales.insert(0, sale);
    }

    /// Sales, newest first.
    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    pub fn get(&self, id: &str) -> Option<&Sale> {
        self.sales.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }

    pub fn clear(&mut self) {
        self.sales.clear();
    }

    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary {
            count: self.sales.len(),
            total: self.sales.iter().map(|s| s.total).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn sale(id: &str, total: i64) -> Sale {
        Sale {
            id: id.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            items: vec![],
            subtotal: Money::from_yen(total),
            tax: Money::zero(),
            total: Money::from_yen(total),
            cash: Money::from_yen(total),
            change: Money::zero(),
        }
    }

    #[test]
    fn test_record_is_newest_first() {
        let mut ledger = Ledger::new();
        ledger.record(sale("s1", 100));
        ledger.record(sale("s2", 200));
        ledger.record(sale("s3", 300));

        let ids: Vec<&str> = ledger.sales().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s3", "s2", "s1"]);
        assert!(ledger.get("s2").is_some());
    }

    #[test]
    fn test_summary() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.summary(), LedgerSummary::default());

        ledger.record(sale("s1", 990));
        ledger.record(sale("s2", 462));
        let summary = ledger.summary();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total.yen(), 1452);
    }

    #[test]
    fn test_clear() {
        let mut ledger = Ledger::from_sales(vec![sale("s1", 1)]);
        ledger.clear();
        assert!(ledger.is_empty());
    }

    proptest! {
        #[test]
        fn history_reads_in_reverse_commit_order(totals in prop::collection::vec(0i64..100_000, 0..40)) {
            let mut ledger = Ledger::new();
            for (i, total) in totals.iter().enumerate() {
                ledger.record(sale(&format!("s{}", i), *total));
            }

            let expected: Vec<String> = (0..totals.len()).rev().map(|i| format!("s{}", i)).collect();
            let ids: Vec<String> = ledger.sales().iter().map(|s| s.id.clone()).collect();
            prop_assert_eq!(ids, expected);
            prop_assert_eq!(ledger.summary().total.yen(), totals.iter().sum::<i64>());
        }
    }
}
