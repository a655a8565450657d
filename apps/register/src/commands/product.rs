//! # Product Commands
//!
//! Catalog listing, search and maintenance.
//!
//! ## Edit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Product form submitted { id?, name, price: "1,200", category }        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  parse_price("1,200") ── fails ──► INVALID_PRICE                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Register::upsert_product                                               │
//! │       ├── blank name  ──► NAME_REQUIRED                                 │
//! │       ├── write fails ──► WRITE_FAILURE                                 │
//! │       ▼                                                                 │
//! │  ProductDto                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use kantan_core::validation::parse_price;
use kantan_core::{Product, ProductDraft};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::RegisterState;

/// Product DTO for front ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    /// Price in yen
    pub price: i64,
    pub category: String,
}

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        ProductDto {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price.yen(),
            category: product.category.clone(),
        }
    }
}

/// Product form contents, price still as typed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProductRequest {
    /// Absent or blank to create
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub price: String,
    #[serde(default)]
    pub category: String,
}

/// All products in catalog order.
pub async fn list_products(state: &RegisterState) -> Vec<ProductDto> {
    debug!("list_products command");
    let register = state.lock().await;
    register.catalog().products().iter().map(ProductDto::from).collect()
}

/// Products matching `query`, sorted by name.
pub async fn search_products(state: &RegisterState, query: String) -> Vec<ProductDto> {
    debug!(query = %query, "search_products command");
    let register = state.lock().await;
    register
        .catalog()
        .search(&query)
        .into_iter()
        .map(ProductDto::from)
        .collect()
}

pub async fn get_product(state: &RegisterState, id: String) -> Result<ProductDto, ApiError> {
    debug!(id = %id, "get_product command");
    let register = state.lock().await;
    register
        .catalog()
        .get(&id)
        .map(ProductDto::from)
        .ok_or_else(|| ApiError::not_found("Product", &id))
}

/// Creates a product, or edits it when `id` is given.
pub async fn upsert_product(
    state: &RegisterState,
    request: UpsertProductRequest,
) -> Result<ProductDto, ApiError> {
    debug!(id = ?request.id, name = %request.name, "upsert_product command");

    let draft = ProductDraft {
        id: request.id,
        name: request.name,
        price: parse_price(&request.price)?,
        category: request.category,
    };

    let mut register = state.lock().await;
    let product = register.upsert_product(&draft).await?;
    Ok(ProductDto::from(&product))
}

/// Deletes a product and its cart entry. Returns whether it existed.
pub async fn delete_product(state: &RegisterState, id: String) -> Result<bool, ApiError> {
    debug!(id = %id, "delete_product command");
    let mut register = state.lock().await;
    Ok(register.delete_product(&id).await?)
}

/// Appends the demo products. Returns how many were added.
pub async fn seed_demo_products(state: &RegisterState) -> Result<usize, ApiError> {
    debug!("seed_demo_products command");
    let mut register = state.lock().await;
    Ok(register.seed_demo().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;
    use crate::error::ErrorCode;

    fn request(id: Option<&str>, name: &str, price: &str) -> UpsertProductRequest {
        UpsertProductRequest {
            id: id.map(str::to_string),
            name: name.to_string(),
            price: price.to_string(),
            category: "Drinks".to_string(),
        }
    }

    #[tokio::test]
    async fn test_upsert_parses_price_text() {
        let state = test_support::state().await;
        let dto = upsert_product(&state, request(None, "Coffee", "¥1,200")).await.unwrap();
        assert_eq!(dto.price, 1200);
        assert_eq!(get_product(&state, dto.id.clone()).await.unwrap(), dto);
    }

    #[tokio::test]
    async fn test_upsert_error_codes() {
        let state = test_support::state().await;

        let err = upsert_product(&state, request(None, "Coffee", "12.5")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPrice);

        let err = upsert_product(&state, request(None, "Coffee", "-1")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPrice);

        let err = upsert_product(&state, request(None, " ", "100")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NameRequired);

        assert!(list_products(&state).await.is_empty());
    }

    #[tokio::test]
    async fn test_seed_search_delete() {
        let state = test_support::state().await;
        assert_eq!(seed_demo_products(&state).await.unwrap(), 4);

        let found = search_products(&state, "food".to_string()).await;
        let names: Vec<&str> = found.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Cake", "Cookie"]);

        assert!(delete_product(&state, found[0].id.clone()).await.unwrap());
        assert_eq!(list_products(&state).await.len(), 3);

        let err = get_product(&state, found[0].id.clone()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
