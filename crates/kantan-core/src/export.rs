//! # CSV Export
//!
//! One row per (sale × item), in ledger order (newest sale first).
//!
//! ```text
//! sale_id,datetime,product_name,category,price,qty,line_total,subtotal,tax,total,cash,change
//! s2,2024-05-01T10:00:00.000Z,Coffee,Drinks,450,2,900,900,90,990,1000,10
//! s2,2024-05-01T10:00:00.000Z,Cookie,Food,300,1,300,...        ← sale totals repeat per item
//! ```
//!
//! Amounts are plain integers. Rows are joined with `\n`, no trailing
//! newline.

use chrono::SecondsFormat;

use crate::types::Sale;

/// Column names of the sales export.
pub const SALES_CSV_HEADER: [&str; 12] = [
    "sale_id",
    "datetime",
    "product_name",
    "category",
    "price",
    "qty",
    "line_total",
    "subtotal",
    "tax",
    "total",
    "cash",
    "change",
];

/// Renders the sales export.
pub fn sales_csv(sales: &[Sale]) -> String {
    let mut rows = Vec::with_capacity(1 + sales.iter().map(|s| s.items.len()).sum::<usize>());
    rows.push(SALES_CSV_HEADER.join(","));

    for sale in sales {
        let at = sale.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
        for item in &sale.items {
            let fields = [
                escape_field(&sale.id),
                escape_field(&at),
                escape_field(&item.name),
                escape_field(&item.category),
                item.price.yen().to_string(),
                item.qty.to_string(),
                item.line_total().yen().to_string(),
                sale.subtotal.yen().to_string(),
                sale.tax.yen().to_string(),
                sale.total.yen().to_string(),
                sale.cash.yen().to_string(),
                sale.change.yen().to_string(),
            ];
            rows.push(fields.join(","));
        }
    }

    rows.join("\n")
}

/// Quotes a field containing `,` `"` `\r` or `\n`, doubling inner quotes.
pub fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
