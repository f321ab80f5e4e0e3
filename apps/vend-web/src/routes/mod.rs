//! # HTTP Routes
//!
//! Every endpoint the web front panel and admin page call.
//!
//! ## Route Organization
//! ```text
//! routes/
//! ├── mod.rs       ◄─── You are here (router, shared DTO helpers)
//! ├── status.rs    ◄─── GET /health, GET /api/state
//! ├── funds.rs     ◄─── POST /api/add-money, /api/credit-card, /api/cancel
//! ├── purchase.rs  ◄─── POST /api/purchase
//! └── admin.rs     ◄─── GET /api/admin, POST /api/restock, /api/reset
//! ```
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  fetch('/api/purchase', { body: { productCode: 'A1' } })               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  async fn purchase(                                                     │
//! │      State(state): State<AppState>,     ◄── shared machine + store     │
//! │      payload: Result<Json<Req>, _>,     ◄── bad JSON → VALIDATION_ERROR│
//! │  ) -> ApiResult<PurchaseResponse>                                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  { "success": true, "productName": "Coke", "balanceCents": 25, ... }   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts arrive as decimal dollars (`{"amount": 1.25}`) and are converted
//! to cents once, here at the edge. Responses carry both the decimal value
//! and the exact cent count.

pub mod admin;
pub mod funds;
pub mod purchase;
pub mod status;

use axum::routing::{get, post};
use axum::Router;
use vend_core::Money;

use crate::error::ApiError;
use crate::state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(status::health))
        .route("/api/state", get(status::machine_state))
        .route("/api/add-money", post(funds::add_money))
        .route("/api/credit-card", post(funds::credit_card))
        .route("/api/cancel", post(funds::cancel))
        .route("/api/purchase", post(purchase::purchase))
        .route("/api/restock", post(admin::restock))
        .route("/api/admin", get(admin::admin))
        .route("/api/reset", post(admin::reset))
        .with_state(state)
}

/// Converts a decimal request amount to cents.
///
/// NaN and infinities are rejected here; zero and negative amounts are left
/// for the machine to reject with its own message.
pub(crate) fn parse_amount(amount: f64) -> Result<Money, ApiError> {
    Money::from_decimal(amount)
        .ok_or_else(|| ApiError::invalid_amount(format!("Invalid amount: {}", amount)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WebConfig;
    use crate::error::ErrorCode;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(1.25).unwrap(), Money::from_cents(125));
        assert_eq!(parse_amount(0.0).unwrap(), Money::zero());
        assert_eq!(parse_amount(f64::NAN).unwrap_err().code, ErrorCode::InvalidAmount);
    }

    #[test]
    fn test_router_builds() {
        let _router = router(AppState::in_memory(WebConfig::default()));
    }
}
