//! # Admin Endpoints
//!
//! ```text
//! GET  /api/admin                       → sales total + last N log entries
//! POST /api/restock { "quantity": 12 }  → every slot to 12 (default from config)
//! POST /api/reset                       → eject credit, factory catalog, zero sales
//! ```
//!
//! Restock and reset change persisted state and are saved immediately.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminResponse {
    pub total_sales: f64,
    pub total_sales_cents: i64,
    pub total_products: usize,
    pub transactions: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestockRequest {
    /// Units per slot; the configured default when absent.
    #[serde(default)]
    pub quantity: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminActionResponse {
    pub success: bool,
    pub message: String,
    pub change: f64,
    pub change_cents: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// `GET /api/admin`
pub async fn admin(State(state): State<AppState>) -> Json<AdminResponse> {
    debug!("admin request");
    let limit = state.config.machine.admin_log_limit;

    Json(state.machine.with_machine(|m| AdminResponse {
        total_sales: m.total_sales().to_decimal(),
        total_sales_cents: m.total_sales().cents(),
        total_products: m.catalog().len(),
        transactions: m.recent_transactions(limit),
    }))
}

/// `POST /api/restock`
pub async fn restock(
    State(state): State<AppState>,
    payload: Result<Json<RestockRequest>, JsonRejection>,
) -> ApiResult<AdminActionResponse> {
    let Json(request) = payload?;
    let quantity = request
        .quantity
        .unwrap_or(state.config.machine.restock_quantity);
    debug!(quantity, "restock request");

    let pending = state.machine.with_machine_mut(|m| {
        m.restock_all(quantity);
        state.capture(m)
    });
    let warning = state.persist(pending).await;
    info!(quantity, "All products restocked");

    Ok(Json(AdminActionResponse {
        success: true,
        message: format!("Restocked all products to {}", quantity),
        change: 0.0,
        change_cents: 0,
        warning,
    }))
}

/// `POST /api/reset`
///
/// Credit still in the machine is returned as `change`.
pub async fn reset(State(state): State<AppState>) -> Json<AdminActionResponse> {
    let (change, pending) = state.machine.with_machine_mut(|m| {
        let change = m.reset();
        (change, state.capture(m))
    });
    let warning = state.persist(pending).await;
    info!(change = %change, "Machine reset to defaults");

    let message = if change.is_positive() {
        format!("Machine reset to initial state. Returned {}", change)
    } else {
        "Machine reset to initial state".to_string()
    };

    Json(AdminActionResponse {
        success: true,
        message,
        change: change.to_decimal(),
        change_cents: change.cents(),
        warning,
    })
}
