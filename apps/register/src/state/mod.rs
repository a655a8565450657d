//! # State Module
//!
//! Application state for the register.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  RegisterState                                                          │
//! │  └── tokio::sync::Mutex<Register>                                       │
//! │        ├── Database   (SQLite pool, cloned into repositories)           │
//! │        ├── Catalog    ─┐                                                │
//! │        ├── Cart        │ in-memory copies of the four stores,           │
//! │        ├── Ledger      │ swapped only after a successful write          │
//! │        ├── Settings   ─┘                                                │
//! │        └── cash input (not persisted)                                   │
//! │                                                                         │
//! │  One user action at a time: every command holds the lock for its       │
//! │  whole duration, so no two mutations interleave.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod register;

use tokio::sync::{Mutex, MutexGuard};

pub use register::{ImportSummary, Register};

/// Shared handle to the register.
#[derive(Debug)]
pub struct RegisterState {
    inner: Mutex<Register>,
}

impl RegisterState {
    pub fn new(register: Register) -> Self {
        RegisterState {
            inner: Mutex::new(register),
        }
    }

    /// Waits for exclusive access.
    pub async fn lock(&self) -> MutexGuard<'_, Register> {
        self.inner.lock().await
    }
}
