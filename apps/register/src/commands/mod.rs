//! # Commands Module
//!
//! Every operation a front end can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── product.rs   ◄─── Catalog list/search/upsert/delete/seed
//! ├── cart.rs      ◄─── Cart manipulation and cash input
//! ├── sale.rs      ◄─── Sale commit and history
//! ├── settings.rs  ◄─── Tax rate
//! └── backup.rs    ◄─── JSON backup and CSV export
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Front end (shell.rs, or any other caller)                              │
//! │         │                                                               │
//! │         │  commands::cart::add_to_cart(&state, id).await                │
//! │         ▼                                                               │
//! │  pub async fn add_to_cart(                                              │
//! │      state: &RegisterState,   ◄── shared, locked per call               │
//! │      product_id: String,      ◄── plain arguments                       │
//! │  ) -> Result<CartResponse, ApiError>                                    │
//! │         │                                                               │
//! │         │  (camelCase serde DTOs)                                       │
//! │         ▼                                                               │
//! │  Front end renders the DTO or the error code                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod backup;
pub mod cart;
pub mod product;
pub mod sale;
pub mod settings;
