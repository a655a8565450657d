//! # Key-Value Repository
//!
//! JSON documents stored by key.
//!
//! ## Read / Write Asymmetry
//! ```text
//! load(key, fallback)
//!    ├── row missing          → fallback             (debug)
//!    ├── query failed         → fallback             (warn)
//!    ├── JSON does not parse  → fallback             (warn)
//!    └── ok                   → decoded value
//!
//! save(key, value) / save_all(writes)
//!    ├── encode failed        → Err(Serialization)
//!    ├── query failed         → Err(QueryFailed ...)  (error)
//!    └── ok                   → Ok(())
//! ```
//!
//! `save_all` writes every key inside one transaction: either all values
//! land or none do.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, error, warn};

use crate::error::{DbError, DbResult};

const UPSERT_SQL: &str = r#"
    INSERT INTO kv_store (key, value, updated_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
"#;

/// A stored row.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct KvEntry {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// One pending write for `save_all`, already encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvWrite {
    pub key: &'static str,
    pub value: String,
}

impl KvWrite {
    /// Encodes `value` as JSON for `key`.
    pub fn json<T: Serialize + ?Sized>(key: &'static str, value: &T) -> DbResult<Self> {
        Ok(KvWrite {
            key,
            value: serde_json::to_string(value)?,
        })
    }
}

/// Repository for keyed JSON documents.
#[derive(Debug, Clone)]
pub struct KvRepository {
    pool: SqlitePool,
}

impl KvRepository {
    /// Creates a new KvRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KvRepository { pool }
    }

    /// Gets the raw row for a key.
    pub async fn entry(&self, key: &str) -> DbResult<Option<KvEntry>> {
        let entry = sqlx::query_as::<_, KvEntry>(
            "SELECT key, value, updated_at FROM kv_store WHERE key = ?1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Gets the raw JSON text for a key.
    pub async fn load_raw(&self, key: &str) -> DbResult<Option<String>> {
        Ok(self.entry(key).await?.map(|entry| entry.value))
    }

    /// Loads and decodes a value, returning `fallback` on any failure.
    ///
    /// Never propagates an error; a broken store degrades to defaults.
    pub async fn load<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let raw = match self.load_raw(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %key, "No stored value, using fallback");
                return fallback;
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read stored value, using fallback");
                return fallback;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "Stored value is corrupt, using fallback");
                fallback
            }
        }
    }

    /// Encodes and stores a value under `key`, replacing any previous value.
    pub async fn save<T: Serialize + ?Sized>(&self, key: &'static str, value: &T) -> DbResult<()> {
        let write = KvWrite::json(key, value)?;

        sqlx::query(UPSERT_SQL)
            .bind(write.key)
            .bind(&write.value)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(key = %key, error = %e, "Failed to save value");
                DbError::from(e)
            })?;

        debug!(key = %key, bytes = write.value.len(), "Saved value");
        Ok(())
    }

    /// Stores several values in one transaction.
    pub async fn save_all(&self, writes: &[KvWrite]) -> DbResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let now = Utc::now();
        for write in writes {
            sqlx::query(UPSERT_SQL)
                .bind(write.key)
                .bind(&write.value)
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    error!(key = %write.key, error = %e, "Failed to save value in transaction");
                    DbError::from(e)
                })?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(keys = writes.len(), "Saved values atomically");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
