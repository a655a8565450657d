//! # kantan-core: Pure Business Logic for Kantan Register
//!
//! This crate is the **heart** of the register. It turns a cart of product
//! references into priced lines, tax and total, and commits a paid cart into
//! an immutable sale record. Everything here is a pure function or a plain
//! data structure; persistence and the system clock live outside.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Kantan Register Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Front end (terminal shell, web view, ...)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            Register service + commands (apps/register)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kantan-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   catalog ─► cart ─► pricing ─► checkout ─► ledger              │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK READS • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              kantan-store (key-value persistence)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer yen amounts
//! - [`types`] - Records: Product, CartEntry, PricedLine, Totals, Sale, Settings
//! - [`catalog`] / [`cart`] / [`ledger`] - The three in-memory stores
//! - [`pricing`] - Cart → priced lines + subtotal/tax/total
//! - [`checkout`] - Tender validation and sale construction
//! - [`backup`] / [`export`] - Versioned JSON backup and CSV export
//! - [`validation`] - Input parsing and business rule checks
//! - [`source`] - Id generator and clock collaborators
//!
//! ## Example Usage
//!
//! ```rust
//! use kantan_core::{compute_totals, Cart, Catalog, Money, Product, TaxRate};
//!
//! let mut catalog = Catalog::new();
//! catalog.insert(Product::new("p1", "Coffee", Money::from_yen(450), "Drinks").unwrap());
//!
//! let mut cart = Cart::new();
//! cart.add("p1");
//! cart.add("p1");
//!
//! let priced = compute_totals(&cart, &catalog, TaxRate::from_bps(1000));
//! assert_eq!(priced.totals.subtotal.yen(), 900);
//! assert_eq!(priced.totals.tax.yen(), 90);
//! assert_eq!(priced.totals.total.yen(), 990);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backup;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod export;
pub mod ledger;
pub mod money;
pub mod pricing;
pub mod source;
pub mod types;
pub mod validation;

#[cfg(test)]
mod strategies;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use backup::{BackupDocument, BackupImport};
pub use cart::Cart;
pub use catalog::{Catalog, ProductDraft, Upserted};
pub use checkout::complete_sale;
pub use error::{CommitError, ImportError, ValidationError};
pub use export::sales_csv;
pub use ledger::{Ledger, LedgerSummary};
pub use money::Money;
pub use pricing::compute_totals;
pub use source::{Clock, FixedClock, IdGenerator, SequentialIds, SystemClock, UuidGenerator};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Highest accepted product price in yen.
///
/// Keeps `price × qty` and the subtotal far away from `i64` limits.
pub const MAX_PRICE_YEN: i64 = 10_000_000_000;

/// Tax rate used when nothing has been configured (10%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 1000;

/// Version written into every backup document.
pub const BACKUP_VERSION: u32 = 1;
