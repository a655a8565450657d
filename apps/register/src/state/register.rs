//! # Register Service
//!
//! Owns all application state: catalog, cart, ledger, settings and the
//! tendered-cash input. Every mutation goes through a method here.
//!
//! ## Stage → Persist → Swap
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  complete_sale("1000")                                                  │
//! │                                                                         │
//! │  1. STAGE    sale   = checkout::complete_sale(&cart, ...)?              │
//! │              ledger = self.ledger.clone() + sale                        │
//! │              cart   = empty                                             │
//! │                                                                         │
//! │  2. PERSIST  kv.save_all([SALES → ledger, CART → cart])  ← one tx      │
//! │                 │                                                       │
//! │                 ├── Err → return WRITE_FAILURE, self untouched          │
//! │                 ▼                                                       │
//! │  3. SWAP     self.ledger = ledger; self.cart = cart; cash cleared       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The same three steps apply to every mutating method, so a failed write
//! never leaves memory and storage disagreeing.

use kantan_core::backup::BackupImport;
use kantan_core::validation::parse_yen;
use kantan_core::{
    compute_totals, BackupDocument, Cart, CartEntry, Catalog, Clock, IdGenerator, Ledger, Money,
    PricedCart, Product, ProductDraft, Sale, Settings, SystemClock, TaxRate, Upserted,
    UuidGenerator,
};
use kantan_store::{keys, Database, KvWrite};
use tracing::{debug, info};

use crate::error::RegisterResult;

/// Counts reported after a backup import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub products: usize,
    pub sales: usize,
}

/// The coordinating service.
pub struct Register {
    db: Database,
    catalog: Catalog,
    cart: Cart,
    ledger: Ledger,
    settings: Settings,
    cash_input: String,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Register")
            .field("products", &self.catalog.len())
            .field("cart_entries", &self.cart.len())
            .field("sales", &self.ledger.len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl Register {
    // =========================================================================
    // Startup
    // =========================================================================

    /// Loads every store, falling back to empty (or `default_settings`)
    /// for anything missing or unreadable.
    pub async fn open(db: Database, default_settings: Settings) -> Self {
        let kv = db.kv();

        let products: Vec<Product> = kv.load(keys::PRODUCTS, Vec::new()).await;
        let sales: Vec<Sale> = kv.load(keys::SALES, Vec::new()).await;
        let settings: Settings = kv.load(keys::SETTINGS, default_settings).await;
        let cart: Vec<CartEntry> = kv.load(keys::CART, Vec::new()).await;

        info!(
            products = products.len(),
            sales = sales.len(),
            cart_entries = cart.len(),
            tax_bps = settings.tax_rate.bps(),
            "Register state loaded"
        );

        Register {
            db,
            catalog: Catalog::from_products(products),
            cart: Cart::from_entries(cart),
            ledger: Ledger::from_sales(sales),
            settings,
            cash_input: String::new(),
            ids: Box::new(UuidGenerator),
            clock: Box::new(SystemClock),
        }
    }

    /// Replaces the id generator and clock.
    pub fn with_sources(
        mut self,
        ids: impl IdGenerator + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        self.ids = Box::new(ids);
        self.clock = Box::new(clock);
        self
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn cash_input(&self) -> &str {
        &self.cash_input
    }

    /// Prices the current cart.
    pub fn totals(&self) -> PricedCart {
        compute_totals(&self.cart, &self.catalog, self.settings.tax_rate)
    }

    /// `max(0, cash − total)`, or zero while the cash input is unparsable.
    pub fn change_preview(&self) -> Money {
        let total = self.totals().totals.total;
        match parse_yen(&self.cash_input) {
            Some(cash) if cash > total => cash - total,
            _ => Money::zero(),
        }
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Adds one unit. The id is not checked against the catalog.
    pub async fn add_to_cart(&mut self, product_id: &str) -> RegisterResult<()> {
        let mut cart = self.cart.clone();
        cart.add(product_id);
        self.commit_cart(cart).await
    }

    pub async fn change_qty(&mut self, product_id: &str, delta: i64) -> RegisterResult<()> {
        let mut cart = self.cart.clone();
        cart.change_qty(product_id, delta);
        self.commit_cart(cart).await
    }

    pub async fn remove_from_cart(&mut self, product_id: &str) -> RegisterResult<()> {
        let mut cart = self.cart.clone();
        cart.remove(product_id);
        self.commit_cart(cart).await
    }

    /// Empties the cart and the cash input.
    pub async fn clear_cart(&mut self) -> RegisterResult<()> {
        self.commit_cart(Cart::new()).await?;
        self.cash_input.clear();
        Ok(())
    }

    async fn commit_cart(&mut self, cart: Cart) -> RegisterResult<()> {
        if cart == self.cart {
            return Ok(());
        }
        self.db.kv().save(keys::CART, &cart).await?;
        debug!(entries = cart.len(), "Cart updated");
        self.cart = cart;
        Ok(())
    }

    // =========================================================================
    // Tender
    // =========================================================================

    /// Stores the cash typed so far. Not persisted.
    pub fn set_cash_input(&mut self, input: impl Into<String>) {
        self.cash_input = input.into();
    }

    /// Sets the cash input to exactly the current total.
    pub fn fill_exact(&mut self) -> Money {
        let total = self.totals().totals.total;
        self.cash_input = total.yen().to_string();
        total
    }

    /// Commits the cart as a sale paid with `cash`.
    ///
    /// On success the sale is first in the ledger, the cart is empty and the
    /// cash input is cleared. On any failure nothing changes.
    pub async fn complete_sale(&mut self, cash: &str) -> RegisterResult<Sale> {
        let sale = kantan_core::complete_sale(
            &self.cart,
            &self.catalog,
            self.settings.tax_rate,
            cash,
            &*self.ids,
            &*self.clock,
        )?;

        let mut ledger = self.ledger.clone();
        ledger.record(sale.clone());
        let cart = Cart::new();

        self.db
            .kv()
            .save_all(&[
                KvWrite::json(keys::SALES, &ledger)?,
                KvWrite::json(keys::CART, &cart)?,
            ])
            .await?;

        info!(
            sale_id = %sale.id,
            total = sale.total.yen(),
            change = sale.change.yen(),
            "Sale completed"
        );

        self.ledger = ledger;
        self.cart = cart;
        self.cash_input.clear();
        Ok(sale)
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Creates or edits a product (see `Catalog::upsert`).
    pub async fn upsert_product(&mut self, draft: &ProductDraft) -> RegisterResult<Product> {
        let mut catalog = self.catalog.clone();
        let (product, outcome) = catalog.upsert(draft, &*self.ids)?;

        self.db.kv().save(keys::PRODUCTS, &catalog).await?;

        match outcome {
            Upserted::Created => info!(product_id = %product.id, name = %product.name, "Product created"),
            Upserted::Updated => info!(product_id = %product.id, name = %product.name, "Product updated"),
        }

        self.catalog = catalog;
        Ok(product)
    }

    /// Deletes a product and any cart entry for it.
    ///
    /// Sales keep their frozen copies. Returns whether the product existed.
    pub async fn delete_product(&mut self, product_id: &str) -> RegisterResult<bool> {
        let mut catalog = self.catalog.clone();
        let mut cart = self.cart.clone();
        let existed = catalog.remove(product_id).is_some();
        let cart_changed = cart.remove(product_id);

        if !existed && !cart_changed {
            return Ok(false);
        }

        self.db
            .kv()
            .save_all(&[
                KvWrite::json(keys::PRODUCTS, &catalog)?,
                KvWrite::json(keys::CART, &cart)?,
            ])
            .await?;

        info!(product_id = %product_id, existed, cart_changed, "Product deleted");

        self.catalog = catalog;
        self.cart = cart;
        Ok(existed)
    }

    /// Appends the demo products. Returns how many were added.
    pub async fn seed_demo(&mut self) -> RegisterResult<usize> {
        let mut catalog = self.catalog.clone();
        let added = catalog.seed_demo(&*self.ids);

        self.db.kv().save(keys::PRODUCTS, &catalog).await?;
        info!(added, "Demo products seeded");

        self.catalog = catalog;
        Ok(added)
    }

    // =========================================================================
    // Settings / History
    // =========================================================================

    pub async fn set_tax_rate(&mut self, rate: TaxRate) -> RegisterResult<Settings> {
        let settings = Settings { tax_rate: rate };

        self.db.kv().save(keys::SETTINGS, &settings).await?;
        info!(tax_bps = rate.bps(), "Tax rate changed");

        self.settings = settings;
        Ok(settings)
    }

    /// Deletes every sale. Returns how many were removed.
    pub async fn clear_history(&mut self) -> RegisterResult<usize> {
        let removed = self.ledger.len();
        let ledger = Ledger::new();

        self.db.kv().save(keys::SALES, &ledger).await?;
        info!(removed, "Sales history cleared");

        self.ledger = ledger;
        Ok(removed)
    }

    // =========================================================================
    // Backup / Export
    // =========================================================================

    /// Pretty-printed backup of settings, catalog and history.
    pub fn export_backup(&self) -> RegisterResult<String> {
        let json = BackupDocument::export(&self.settings, &self.catalog, &self.ledger)
            .to_json_pretty()?;
        Ok(json)
    }

    /// Replaces settings, catalog and history from a backup.
    ///
    /// Sections absent from the document keep their current value. The cart
    /// is left alone; entries for products that no longer exist are skipped
    /// by pricing.
    pub async fn import_backup(&mut self, text: &str) -> RegisterResult<ImportSummary> {
        let BackupImport {
            settings,
            catalog,
            ledger,
        } = BackupDocument::parse(text)?;

        let settings = settings.unwrap_or(self.settings);
        let catalog = catalog.unwrap_or_else(|| self.catalog.clone());
        let ledger = ledger.unwrap_or_else(|| self.ledger.clone());

        self.db
            .kv()
            .save_all(&[
                KvWrite::json(keys::SETTINGS, &settings)?,
                KvWrite::json(keys::PRODUCTS, &catalog)?,
                KvWrite::json(keys::SALES, &ledger)?,
            ])
            .await?;

        let summary = ImportSummary {
            products: catalog.len(),
            sales: ledger.len(),
        };
        info!(
            products = summary.products,
            sales = summary.sales,
            tax_bps = settings.tax_rate.bps(),
            "Backup imported"
        );

        self.settings = settings;
        self.catalog = catalog;
        self.ledger = ledger;
        Ok(summary)
    }

    /// CSV of the whole history (header only when empty).
    pub fn sales_csv(&self) -> String {
        kantan_core::sales_csv(self.ledger.sales())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
