//! # Sale Commands
//!
//! Sale commit and history.
//!
//! ## Pay Button
//! ```text
//! complete_sale(None)           ← uses the cash input typed so far
//! complete_sale(Some("1000"))   ← explicit tender
//!      │
//!      ├── EMPTY_CART
//!      ├── INVALID_CASH
//!      ├── INSUFFICIENT_CASH { shortfall }
//!      ├── WRITE_FAILURE
//!      ▼
//! Sale (newest first in history), cart and cash input cleared
//! ```

use kantan_core::{LedgerSummary, Sale};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::RegisterState;

/// History response: summary header plus sales, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub summary: LedgerSummary,
    pub sales: Vec<Sale>,
}

/// Commits the cart.
pub async fn complete_sale(state: &RegisterState, cash: Option<String>) -> Result<Sale, ApiError> {
    let mut register = state.lock().await;
    let cash = cash.unwrap_or_else(|| register.cash_input().to_string());
    debug!(cash = %cash, "complete_sale command");

    Ok(register.complete_sale(&cash).await?)
}

pub async fn get_history(state: &RegisterState) -> HistoryResponse {
    debug!("get_history command");
    let register = state.lock().await;
    HistoryResponse {
        summary: register.ledger().summary(),
        sales: register.ledger().sales().to_vec(),
    }
}

/// Deletes all sales. Returns how many were removed.
pub async fn clear_history(state: &RegisterState) -> Result<usize, ApiError> {
    debug!("clear_history command");
    let mut register = state.lock().await;
    Ok(register.clear_history().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cart::{add_to_cart, get_cart, set_cash_input};
    use crate::commands::product::{upsert_product, UpsertProductRequest};
    use crate::commands::test_support;
    use crate::error::ErrorCode;

    async fn state_with_coffee_in_cart() -> RegisterState {
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
        add_to_cart(&state, coffee.id).await.unwrap();
        state
    }

    #[tokio::test]
    async fn test_pay_with_typed_cash() {
        let state = state_with_coffee_in_cart().await;
        set_cash_input(&state, "1000".to_string()).await;

        let sale = complete_sale(&state, None).await.unwrap();
        assert_eq!(sale.total.yen(), 990);
        assert_eq!(sale.change.yen(), 10);

        let cart = get_cart(&state).await;
        assert!(cart.lines.is_empty());
        assert!(cart.cash_input.is_empty());

        let history = get_history(&state).await;
        assert_eq!(history.summary.count, 1);
        assert_eq!(history.summary.total.yen(), 990);
    }

    #[tokio::test]
    async fn test_error_codes() {
        let state = test_support::state().await;
        let err = complete_sale(&state, Some("1000".to_string())).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyCart);

        let state = state_with_coffee_in_cart().await;
        let err = complete_sale(&state, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCash);

        let err = complete_sale(&state, Some("500".to_string())).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientCash);
        assert_eq!(err.shortfall, Some(490));
        assert_eq!(get_cart(&state).await.lines[0].qty, 2);
    }

    #[tokio::test]
    async fn test_clear_history() {
        let state = state_with_coffee_in_cart().await;
        complete_sale(&state, Some("990".to_string())).await.unwrap();

        assert_eq!(clear_history(&state).await.unwrap(), 1);
        assert_eq!(get_history(&state).await.summary.count, 0);
    }
}
