//! Read-only endpoints: liveness and the front panel view.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::debug;
use vend_core::{GridLayout, Machine, SlotView};

use crate::state::AppState;

/// Log entries shown under the front panel.
const PANEL_LOG_LIMIT: usize = 10;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub products: usize,
}

/// One slot on the front panel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDto {
    pub code: String,
    pub name: String,
    pub price: f64,
    pub price_cents: i64,
    pub price_display: String,
    pub quantity: u32,
    pub available: bool,
    pub affordable: bool,
}

impl From<SlotView> for SlotDto {
    fn from(slot: SlotView) -> Self {
        SlotDto {
            price: slot.price.to_decimal(),
            price_cents: slot.price.cents(),
            price_display: slot.price.to_string(),
            code: slot.code,
            name: slot.name,
            quantity: slot.quantity,
            available: slot.available,
            affordable: slot.affordable,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateResponse {
    pub balance: f64,
    pub balance_cents: i64,
    pub balance_display: String,
    pub total_sales: f64,
    pub total_sales_cents: i64,
    pub products: Vec<SlotDto>,
    pub transactions: Vec<String>,
}

impl StateResponse {
    pub fn of(machine: &Machine) -> Self {
        let balance = machine.balance();
        let total_sales = machine.total_sales();

        StateResponse {
            balance: balance.to_decimal(),
            balance_cents: balance.cents(),
            balance_display: balance.to_string(),
            total_sales: total_sales.to_decimal(),
            total_sales_cents: total_sales.cents(),
            products: machine
                .product_grid(&GridLayout::standard())
                .into_iter()
                .map(SlotDto::from)
                .collect(),
            transactions: machine.recent_transactions(PANEL_LOG_LIMIT),
        }
    }
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let products = state.machine.with_machine(|m| m.catalog().len());
    Json(HealthResponse {
        status: "ok",
        products,
    })
}

/// `GET /api/state`
pub async fn machine_state(State(state): State<AppState>) -> Json<StateResponse> {
    debug!("machine_state request");
    Json(state.machine.with_machine(StateResponse::of))
}
