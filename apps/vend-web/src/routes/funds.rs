//! # Funding Endpoints
//!
//! Cash, card and cancel.
//!
//! ```text
//! POST /api/add-money    { "amount": 2.00 }  → balance += $2.00, "Cash inserted"
//! POST /api/credit-card  { "amount": 5.00 }  → balance += $5.00, "Card payment"
//! POST /api/cancel                           → eject balance, "Change returned"
//! ```
//!
//! Funding does not persist: the balance is not part of a snapshot.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vend_core::Money;

use crate::error::ApiResult;
use crate::routes::parse_amount;
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountRequest {
    /// Decimal dollars, e.g. `1.25`.
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundsResponse {
    pub success: bool,
    pub message: String,
    pub balance: f64,
    pub balance_cents: i64,
}

impl FundsResponse {
    fn new(message: String, balance: Money) -> Self {
        FundsResponse {
            success: true,
            message,
            balance: balance.to_decimal(),
            balance_cents: balance.cents(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelResponse {
    pub success: bool,
    pub message: String,
    pub change: f64,
    pub change_cents: i64,
    pub balance: f64,
    pub balance_cents: i64,
}

/// `POST /api/add-money`
pub async fn add_money(
    State(state): State<AppState>,
    payload: Result<Json<AmountRequest>, JsonRejection>,
) -> ApiResult<FundsResponse> {
    let Json(request) = payload?;
    let amount = parse_amount(request.amount)?;
    debug!(amount = %amount, "add_money request");

    let balance = state.machine.with_machine_mut(|m| m.insert_funds(amount))?;

    Ok(Json(FundsResponse::new(format!("Added {}", amount), balance)))
}

/// `POST /api/credit-card`
///
/// Card payments are always authorized; there is no gateway.
pub async fn credit_card(
    State(state): State<AppState>,
    payload: Result<Json<AmountRequest>, JsonRejection>,
) -> ApiResult<FundsResponse> {
    let Json(request) = payload?;
    let amount = parse_amount(request.amount)?;
    debug!(amount = %amount, "credit_card request");

    let balance = state.machine.with_machine_mut(|m| m.credit_card(amount))?;
    info!(amount = %amount, "Card payment accepted");

    Ok(Json(FundsResponse::new(
        format!("Card payment of {} processed", amount),
        balance,
    )))
}

/// `POST /api/cancel`
pub async fn cancel(State(state): State<AppState>) -> Json<CancelResponse> {
    let change = state.machine.with_machine_mut(|m| m.cancel());
    debug!(change = %change, "cancel request");

    let message = if change.is_positive() {
        format!("Returned {}", change)
    } else {
        "No money to return".to_string()
    };

    Json(CancelResponse {
        success: true,
        message,
        change: change.to_decimal(),
        change_cents: change.cents(),
        balance: 0.0,
        balance_cents: 0,
    })
}
