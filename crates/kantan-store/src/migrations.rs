//! # Database Migrations
//!
//! Embedded SQL migrations for the register store.
//!
//! ## How Migrations Work
//! ```text
//! Startup
//!    │
//!    ▼
//! _sqlx_migrations exists? ── no ──► create it
//!    │
//!    ▼
//! compare embedded vs applied
//!    ├── 001_kv_store.sql  ✓ (already applied)
//!    └── 002_...           ⬜ (pending → run, record checksum)
//! ```
//!
//! ## Adding New Migrations
//! 1. Add `migrations/sqlite/NNN_description.sql` with the next number
//! 2. **NEVER** modify an applied migration

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Embedded migrations from the workspace `migrations/sqlite` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending database migrations.
///
/// Idempotent; each migration runs in its own transaction.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Returns `(total_migrations, applied_migrations)` for diagnostics.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    Ok((total, applied as usize))
}
