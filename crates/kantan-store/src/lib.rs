//! # kantan-store: Persistence Layer for Kantan Register
//!
//! Durable storage for the register's four stores (catalog, sale history,
//! settings and cart). Each store is one JSON document under a versioned
//! key in a SQLite table.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Kantan Register Data Flow                          │
//! │                                                                         │
//! │  Register service (complete_sale, upsert_product, ...)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  kantan-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  KvRepository │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│  load / save  │    │  (embedded)  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (WAL mode)                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Policy
//! - Reads never fail: a missing, unreadable or corrupt value is logged and
//!   the caller's fallback is returned.
//! - Writes always report failure, so the caller can keep its in-memory
//!   state unchanged.

pub mod error;
pub mod keys;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::kv::{KvEntry, KvRepository, KvWrite};
