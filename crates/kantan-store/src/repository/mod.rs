//! # Repository Module
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Register service                                                      │
//! │       │                                                                 │
//! │       │  db.kv().load(keys::PRODUCTS, Vec::new())                       │
//! │       ▼                                                                 │
//! │  KvRepository                                                          │
//! │  ├── load(&self, key, fallback)     ← never fails, falls back          │
//! │  ├── save(&self, key, value)        ← one key                          │
//! │  └── save_all(&self, writes)        ← many keys, one transaction       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite kv_store table                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`KvRepository`](kv::KvRepository) - JSON documents by key

pub mod kv;
