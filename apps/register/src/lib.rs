//! # Kantan Register Library
//!
//! Core library for the Kantan Register point-of-sale app.
//! `run` wires logging, storage and state together and starts the shell.
//!
//! ## Module Organization
//! ```text
//! kantan_register/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── config.rs       ◄─── Environment configuration
//! ├── error.rs        ◄─── RegisterError / ApiError
//! ├── state/
//! │   ├── mod.rs      ◄─── RegisterState (mutex handle)
//! │   └── register.rs ◄─── Register service: stage, persist, swap
//! ├── commands/
//! │   ├── product.rs  ◄─── Catalog commands
//! │   ├── cart.rs     ◄─── Cart and cash input commands
//! │   ├── sale.rs     ◄─── Commit and history commands
//! │   ├── settings.rs ◄─── Tax rate commands
//! │   └── backup.rs   ◄─── CSV export, JSON backup / restore
//! └── shell.rs        ◄─── Terminal front end
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod shell;
pub mod state;

use tracing::info;
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use kantan_store::{Database, DbConfig};
use shell::Shell;
use state::{Register, RegisterState};

/// Runs the register until the shell exits.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: INFO, can be overridden with RUST_LOG                    │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • KANTAN_DB_PATH, KANTAN_TAX_RATE, KANTAN_STORE_NAME                │
/// │                                                                         │
/// │  3. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  4. Load Register ────────────────────────────────────────────────────► │
/// │     • Catalog, sales, settings and cart from the key-value store        │
/// │     • Unreadable records fall back to empty / defaults                  │
/// │                                                                         │
/// │  5. Run Shell ────────────────────────────────────────────────────────► │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Kantan Register");

    let config = AppConfig::from_env();
    info!(db_path = %config.db_path.display(), "Configuration loaded");

    let db = Database::new(DbConfig::new(config.db_path.clone())).await?;
    info!("Database connected and migrations applied");

    let register = Register::open(db.clone(), config.default_settings()).await;
    info!(
        products = register.catalog().len(),
        sales = register.ledger().len(),
        "Register loaded"
    );

    let shell = Shell::new(RegisterState::new(register), config);
    shell.run().await?;

    db.close().await;
    info!("Kantan Register stopped");
    Ok(())
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so the shell owns stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kantan=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
