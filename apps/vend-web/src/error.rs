//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Vendor Pro                             │
//! │                                                                         │
//! │  POST /api/purchase { "productCode": "A1" }                            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler                                                         │  │
//! │  │  Result<Json<T>, ApiError>                                       │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  MachineError::OutOfStock ──────────────────────┐                │  │
//! │  │         │                                       ▼                │  │
//! │  │  Bad JSON / amount ─────────────────────────► ApiError ────────► │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────► │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  409 { "success": false, "code": "OUT_OF_STOCK",                       │
//! │        "message": "Sorry, Coke is out of stock!", "balanceCents": 200 } │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use vend_core::{MachineError, Money};

/// API error returned from handlers.
///
/// ## Serialization
/// ```json
/// {
///   "success": false,
///   "code": "INSUFFICIENT_FUNDS",
///   "message": "Insufficient funds! Need $0.75 more for Coke",
///   "balanceCents": 100
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Always false; lets clients branch on one field for every response.
    pub success: bool,

    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Credit still held, for purchase failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_cents: Option<i64>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Zero, negative or unparseable amount (400)
    InvalidAmount,

    /// Unknown product code (404)
    InvalidProduct,

    /// Slot is empty (409)
    OutOfStock,

    /// Balance below price (402)
    InsufficientFunds,

    /// Malformed request (400)
    ValidationError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidAmount | ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::InvalidProduct => StatusCode::NOT_FOUND,
            ErrorCode::OutOfStock => StatusCode::CONFLICT,
            ErrorCode::InsufficientFunds => StatusCode::PAYMENT_REQUIRED,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            success: false,
            code,
            message: message.into(),
            balance_cents: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn invalid_amount(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InvalidAmount, message)
    }

    /// Attaches the balance the machine still holds.
    pub fn with_balance(mut self, balance: Money) -> Self {
        self.balance_cents = Some(balance.cents());
        self
    }
}

/// Converts machine rule violations to API errors.
impl From<MachineError> for ApiError {
    fn from(err: MachineError) -> Self {
        let message = err.to_string();
        match err {
            MachineError::InvalidAmount { .. } | MachineError::BalanceOverflow => {
                ApiError::invalid_amount(message)
            }
            MachineError::InvalidProduct(_) => ApiError::new(ErrorCode::InvalidProduct, message),
            MachineError::OutOfStock { .. } => ApiError::new(ErrorCode::OutOfStock, message),
            MachineError::InsufficientFunds { .. } => {
                ApiError::new(ErrorCode::InsufficientFunds, message)
            }
        }
    }
}

/// Malformed or missing JSON bodies.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!(code = ?self.code, message = %self.message, "Request rejected");
        (self.code.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for handlers.
pub type ApiResult<T> = Result<Json<T>, ApiError>;
