//! # Purchase Endpoint
//!
//! ```text
//! POST /api/purchase { "productCode": "A1" }
//!      │
//!      ▼  (machine lock held)
//! machine.purchase("A1") ──error──► 404/409/402 + balanceCents
//!      │ ok, snapshot taken
//!      ▼  (lock released, blocking pool)
//! save snapshot ──fails──► "warning" field, purchase still stands
//!      │
//!      ▼
//! 200 { productName, change, balance, ... }
//! ```

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    #[serde(alias = "product_code")]
    pub product_code: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    pub success: bool,
    pub message: String,
    pub product_code: String,
    pub product_name: String,
    pub price_cents: i64,
    pub change: f64,
    pub change_cents: i64,
    pub balance: f64,
    pub balance_cents: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// `POST /api/purchase`
pub async fn purchase(
    State(state): State<AppState>,
    payload: Result<Json<PurchaseRequest>, JsonRejection>,
) -> ApiResult<PurchaseResponse> {
    let Json(request) = payload?;
    let code = request.product_code.trim().to_uppercase();
    debug!(code = %code, "purchase request");

    let (receipt, pending) = state.machine.with_machine_mut(|m| {
        let receipt = m
            .purchase(&code)
            .map_err(|e| ApiError::from(e).with_balance(m.balance()))?;
        Ok::<_, ApiError>((receipt, state.capture(m)))
    })?;
    let warning = state.persist(pending).await;

    info!(
        code = %receipt.code,
        price = %receipt.price,
        balance = %receipt.balance,
        "Product dispensed"
    );

    Ok(Json(PurchaseResponse {
        success: true,
        message: receipt.message(),
        product_code: receipt.code,
        product_name: receipt.product_name,
        price_cents: receipt.price.cents(),
        change: receipt.change.to_decimal(),
        change_cents: receipt.change.cents(),
        balance: receipt.balance.to_decimal(),
        balance_cents: receipt.balance.cents(),
        warning,
    }))
}
