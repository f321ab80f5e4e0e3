//! # Domain Types
//!
//! Core domain types used throughout Vendor Pro.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  ProductRecord  │   │    SlotView     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  code ("A1")    │   │  flat snapshot  │   │  read-only row  │       │
//! │  │  name           │   │  form of a      │   │  for adapters   │       │
//! │  │  price (Money)  │   │  Product        │   │  + available    │       │
//! │  │  quantity (u32) │   │                 │   │  + affordable   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   GridLayout    │   │  BalancePolicy  │   │ PurchaseReceipt │       │
//! │  │  rows A–F       │   │  RetainRemainder│   │  what purchase()│       │
//! │  │  columns 1–4    │   │  ResetToZero    │   │  hands back     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A product's `code` is its only identity: it is derived from the slot's
//! grid position and never changes for the life of the product.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{validate_code, validate_price_cents, validate_product_name, ValidationResult};
use crate::{DEFAULT_RESTOCK_QUANTITY, SNAPSHOT_TRANSACTION_LIMIT};

// =============================================================================
// Product
// =============================================================================

/// One sellable slot in the machine.
///
/// ## Invariants
/// - `code` and `name` pass validation
/// - `price` is never negative
/// - `quantity` only drops through [`Product::dispense_one`], one unit at a time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    code: String,
    name: String,
    price: Money,
    quantity: u32,
}

impl Product {
    /// Creates a validated product.
    ///
    /// ## Example
    /// ```rust
    /// use vend_core::{Money, Product};
    ///
    /// let coke = Product::new("A1", "Coke", Money::from_cents(175), 9).unwrap();
    /// assert!(coke.is_available());
    ///
    /// assert!(Product::new("A1", "", Money::from_cents(175), 9).is_err());
    /// ```
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        quantity: u32,
    ) -> ValidationResult<Self> {
        let code = code.into();
        let name = name.into();

        validate_code(&code)?;
        validate_product_name(&name)?;
        validate_price_cents(price.cents())?;

        Ok(Product {
            code,
            name: name.trim().to_string(),
            price,
            quantity,
        })
    }

    /// Slot code, e.g. "A1".
    #[inline]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price.
    #[inline]
    pub fn price(&self) -> Money {
        self.price
    }

    /// Units left in the slot.
    #[inline]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Checks if at least one unit is left.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }

    /// Checks if the product is in stock and `balance` covers its price.
    pub fn can_purchase(&self, balance: Money) -> bool {
        self.is_available() && balance >= self.price
    }

    /// Removes one unit. Returns false (and changes nothing) when empty.
    pub(crate) fn dispense_one(&mut self) -> bool {
        if self.quantity == 0 {
            return false;
        }
        self.quantity -= 1;
        true
    }

    /// Overwrites the unit count (restocking).
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }
}

// =============================================================================
// Product Record
// =============================================================================

/// Flat, serializable form of a [`Product`].
///
/// This is what snapshots contain:
/// ```json
/// { "code": "A1", "name": "Coke", "price": 175, "quantity": 9 }
/// ```
/// `price` is in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub code: String,
    pub name: String,
    pub price: Money,
    pub quantity: u32,
}

impl From<&Product> for ProductRecord {
    fn from(product: &Product) -> Self {
        ProductRecord {
            code: product.code.clone(),
            name: product.name.clone(),
            price: product.price,
            quantity: product.quantity,
        }
    }
}

impl TryFrom<ProductRecord> for Product {
    type Error = ValidationError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        Product::new(record.code, record.name, record.price, record.quantity)
    }
}

// =============================================================================
// Slot View
// =============================================================================

/// Read-only projection of one slot, for rendering a product grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotView {
    pub code: String,
    pub name: String,
    pub price: Money,
    pub quantity: u32,
    /// `quantity > 0`
    pub available: bool,
    /// Available and the current balance covers the price.
    pub affordable: bool,
}

impl SlotView {
    /// Builds the view of `product` against the given balance.
    pub fn of(product: &Product, balance: Money) -> Self {
        SlotView {
            code: product.code.clone(),
            name: product.name.clone(),
            price: product.price,
            quantity: product.quantity,
            available: product.is_available(),
            affordable: product.can_purchase(balance),
        }
    }
}

// =============================================================================
// Grid Layout
// =============================================================================

/// Row/column labelling scheme for the machine's front panel.
///
/// Codes are built by concatenating a row letter and a column number:
/// rows `A..=F` and columns `1..=4` give `A1, A2, A3, A4, B1, ... F4`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    pub rows: Vec<char>,
    pub columns: u8,
}

impl GridLayout {
    /// Creates a layout from row letters and a column count.
    pub fn new(rows: impl IntoIterator<Item = char>, columns: u8) -> Self {
        GridLayout {
            rows: rows.into_iter().collect(),
            columns,
        }
    }

    /// The 6×4 layout of the standard machine (A1–F4).
    pub fn standard() -> Self {
        GridLayout::new('A'..='F', 4)
    }

    /// Slot codes in row-major display order.
    ///
    /// ## Example
    /// ```rust
    /// use vend_core::GridLayout;
    ///
    /// let codes = GridLayout::new(['A', 'B'], 2).codes();
    /// assert_eq!(codes, vec!["A1", "A2", "B1", "B2"]);
    /// ```
    pub fn codes(&self) -> Vec<String> {
        self.rows
            .iter()
            .flat_map(|row| (1..=self.columns).map(move |col| format!("{}{}", row, col)))
            .collect()
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        GridLayout::standard()
    }
}

// =============================================================================
// Balance Policy
// =============================================================================

/// What happens to the remaining credit after a successful purchase.
///
/// ```text
/// Balance $2.00, buys Coke $1.75
///
/// RetainRemainder:  balance → $0.25, change $0.00 (credit stays for next pick)
/// ResetToZero:      balance → $0.00, change $0.25 (ejected immediately)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalancePolicy {
    /// Deduct the price and keep the remainder as running credit.
    #[default]
    RetainRemainder,

    /// Eject the remainder as change and zero the balance (single tender).
    ResetToZero,
}

impl fmt::Display for BalancePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalancePolicy::RetainRemainder => write!(f, "retain"),
            BalancePolicy::ResetToZero => write!(f, "reset"),
        }
    }
}

impl FromStr for BalancePolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "retain" | "retain_remainder" | "remainder" => Ok(BalancePolicy::RetainRemainder),
            "reset" | "reset_to_zero" | "single_tender" => Ok(BalancePolicy::ResetToZero),
            other => Err(ValidationError::InvalidFormat {
                field: "balance_policy".to_string(),
                reason: format!("unknown policy '{}', expected 'retain' or 'reset'", other),
            }),
        }
    }
}

// =============================================================================
// Machine Configuration
// =============================================================================

/// Machine-level settings chosen by the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Applied uniformly to every purchase.
    #[serde(default)]
    pub balance_policy: BalancePolicy,

    /// Units per slot after a restock with no explicit quantity.
    #[serde(default = "default_restock_quantity")]
    pub restock_quantity: u32,

    /// Most recent log entries kept in a snapshot.
    #[serde(default = "default_snapshot_transaction_limit")]
    pub snapshot_transaction_limit: usize,
}

fn default_restock_quantity() -> u32 {
    DEFAULT_RESTOCK_QUANTITY
}

fn default_snapshot_transaction_limit() -> usize {
    SNAPSHOT_TRANSACTION_LIMIT
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            balance_policy: BalancePolicy::default(),
            restock_quantity: DEFAULT_RESTOCK_QUANTITY,
            snapshot_transaction_limit: SNAPSHOT_TRANSACTION_LIMIT,
        }
    }
}

// =============================================================================
// Purchase Receipt
// =============================================================================

/// Result of a successful purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub code: String,
    pub product_name: String,
    /// Amount charged (added to total sales).
    pub price: Money,
    /// Amount ejected to the customer. Always zero under `RetainRemainder`.
    pub change: Money,
    /// Credit still held by the machine.
    pub balance: Money,
}

impl PurchaseReceipt {
    /// Message shown to the customer.
    pub fn message(&self) -> String {
        if self.change.is_positive() {
            format!("Dispensed {}! Change: {}", self.product_name, self.change)
        } else {
            format!("Dispensed {}!", self.product_name)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
