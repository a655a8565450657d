//! # Cart Commands
//!
//! Cart manipulation and the tendered-cash input.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│  Tender  │────►│   Sale   │       │
//! │  │  Cart    │     │          │     │  typed   │     │ recorded │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   add_to_cart      set_cash_input   complete_sale      │
//! │                   change_qty       fill_exact       (sale.rs)          │
//! │                   remove_from_cart                                     │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ─────────────────────► (back to empty)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every command returns the whole priced cart so the display can redraw
//! from one response.

use kantan_core::{PricedLine, Totals};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::{Register, RegisterState};

/// Cart response including lines, totals and the tender preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    /// Lines resolving to a product, in cart order
    pub lines: Vec<PricedLine>,
    pub totals: Totals,
    pub cash_input: String,
    /// Change due for the current cash input, 0 if not enough or unparsable
    pub change_preview: i64,
}

impl From<&Register> for CartResponse {
    fn from(register: &Register) -> Self {
        let priced = register.totals();
        CartResponse {
            lines: priced.lines,
            totals: priced.totals,
            cash_input: register.cash_input().to_string(),
            change_preview: register.change_preview().yen(),
        }
    }
}

pub async fn get_cart(state: &RegisterState) -> CartResponse {
    debug!("get_cart command");
    let register = state.lock().await;
    CartResponse::from(&*register)
}

/// Adds one unit of a product.
pub async fn add_to_cart(
    state: &RegisterState,
    product_id: String,
) -> Result<CartResponse, ApiError> {
    debug!(product_id = %product_id, "add_to_cart command");
    let mut register = state.lock().await;
    register.add_to_cart(&product_id).await?;
    Ok(CartResponse::from(&*register))
}

/// Adjusts a quantity; reaching zero removes the line.
pub async fn change_qty(
    state: &RegisterState,
    product_id: String,
    delta: i64,
) -> Result<CartResponse, ApiError> {
    debug!(product_id = %product_id, delta, "change_qty command");
    let mut register = state.lock().await;
    register.change_qty(&product_id, delta).await?;
    Ok(CartResponse::from(&*register))
}

pub async fn remove_from_cart(
    state: &RegisterState,
    product_id: String,
) -> Result<CartResponse, ApiError> {
    debug!(product_id = %product_id, "remove_from_cart command");
    let mut register = state.lock().await;
    register.remove_from_cart(&product_id).await?;
    Ok(CartResponse::from(&*register))
}

/// Empties the cart and the cash input.
pub async fn clear_cart(state: &RegisterState) -> Result<CartResponse, ApiError> {
    debug!("clear_cart command");
    let mut register = state.lock().await;
    register.clear_cart().await?;
    Ok(CartResponse::from(&*register))
}

pub async fn set_cash_input(state: &RegisterState, input: String) -> CartResponse {
    debug!(input = %input, "set_cash_input command");
    let mut register = state.lock().await;
    register.set_cash_input(input);
    CartResponse::from(&*register)
}

/// Fills the cash input with the exact total.
pub async fn fill_exact(state: &RegisterState) -> CartResponse {
    debug!("fill_exact command");
    let mut register = state.lock().await;
    register.fill_exact();
    CartResponse::from(&*register)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::product::{upsert_product, UpsertProductRequest};
    use crate::commands::test_support;

    #[tokio::test]
    async fn test_cart_flow() {
        let state = test_support::state().await;
        let coffee = upsert_product(
            &state,
            UpsertProductRequest {
                name: "Coffee".to_string(),
                price: "450".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        add_to_cart(&state, coffee.id.clone()).await.unwrap();
        let cart = change_qty(&state, coffee.id.clone(), 1).await.unwrap();
        assert_eq!(cart.lines[0].qty, 2);
        assert_eq!(cart.totals.total.yen(), 990);

        let cart = set_cash_input(&state, "1,000".to_string()).await;
        assert_eq!(cart.change_preview, 10);

        let cart = fill_exact(&state).await;
        assert_eq!(cart.cash_input, "990");
        assert_eq!(cart.change_preview, 0);

        let cart = change_qty(&state, coffee.id.clone(), -2).await.unwrap();
        assert!(cart.lines.is_empty());
        assert_eq!(cart.totals, Totals::default());
    }

    #[tokio::test]
    async fn test_unknown_product_is_tolerated() {
        let state = test_support::state().await;
        let cart = add_to_cart(&state, "ghost".to_string()).await.unwrap();
        assert!(cart.lines.is_empty());

        let cart = remove_from_cart(&state, "ghost".to_string()).await.unwrap();
        assert!(cart.lines.is_empty());
        assert!(clear_cart(&state).await.unwrap().cash_input.is_empty());
    }
}
