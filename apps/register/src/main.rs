//! # Kantan Register Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kantan Register                                  │
//! │                                                                         │
//! │  stdin ──► shell.rs ──► commands/ ──► Register ──► SQLite (kantan.db)   │
//! │                                                                         │
//! │  stdout ◄── rendered cart, receipts, history                            │
//! │  stderr ◄── tracing logs                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The actual setup is in lib.rs for better testability
    kantan_register::run().await
}
