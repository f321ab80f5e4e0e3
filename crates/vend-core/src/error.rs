//! # Error Types
//!
//! Domain-specific error types for vend-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vend-core errors (this file)                                          │
//! │  ├── MachineError     - Purchase/funding rule violations               │
//! │  ├── CatalogError     - Lookup and snapshot-load failures              │
//! │  ├── LoadError        - Why a snapshot could not be restored           │
//! │  ├── EntryParseError  - Malformed transaction log line                 │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  vend-store errors (separate crate)                                    │
//! │  └── StoreError       - Snapshot write failures                        │
//! │                                                                         │
//! │  HTTP adapter errors (in app)                                          │
//! │  └── ApiError         - What the client sees (serialized)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every `MachineError` is recoverable: the machine state is untouched when
//! one is returned, and the caller simply shows the message.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Machine Error
// =============================================================================

/// Rule violations raised by [`Machine`](crate::machine::Machine) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    /// A funding operation received a zero or negative amount.
    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: Money },

    /// The requested code does not name a slot in the catalog.
    #[error("Invalid product code: {0}")]
    InvalidProduct(String),

    /// The slot exists but has no units left.
    #[error("Sorry, {name} is out of stock!")]
    OutOfStock { code: String, name: String },

    /// Balance is below the product price.
    ///
    /// ## User Workflow
    /// ```text
    /// Balance: $1.00, selects A1 (Coke $1.75)
    ///      │
    ///      ▼
    /// InsufficientFunds { price: $1.75, balance: $1.00, shortfall: $0.75 }
    ///      │
    ///      ▼
    /// Display: "Insufficient funds! Need $0.75 more for Coke"
    /// ```
    #[error("Insufficient funds! Need {shortfall} more for {name}")]
    InsufficientFunds {
        code: String,
        name: String,
        price: Money,
        balance: Money,
        shortfall: Money,
    },

    /// Crediting the amount would overflow the balance.
    #[error("Balance limit exceeded")]
    BalanceOverflow,
}

// =============================================================================
// Catalog Error
// =============================================================================

/// Catalog lookup and restore errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No product is stored under this code.
    #[error("Product not found: {0}")]
    NotFound(String),

    /// A snapshot's product list could not be applied.
    ///
    /// The catalog is unchanged when this is returned.
    #[error("Invalid catalog data: {0}")]
    Load(String),
}

// =============================================================================
// Load Error
// =============================================================================

/// Why a snapshot could not be restored.
///
/// All variants are recoverable: the machine keeps whatever state it had
/// (normally the defaults) and carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// No snapshot has been written yet.
    #[error("No saved state found")]
    Missing,

    /// The snapshot exists but could not be read.
    #[error("Saved state could not be read: {0}")]
    Unreadable(String),

    /// The snapshot was read but its contents are invalid.
    #[error("Saved state is corrupt: {0}")]
    Corrupt(String),
}

impl LoadError {
    /// True when there simply was nothing to load.
    pub fn is_missing(&self) -> bool {
        matches!(self, LoadError::Missing)
    }
}

impl From<CatalogError> for LoadError {
    fn from(err: CatalogError) -> Self {
        LoadError::Corrupt(err.to_string())
    }
}

// =============================================================================
// Entry Parse Error
// =============================================================================

/// A persisted transaction line is not `"<timestamp> <description>"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed transaction entry '{line}': {reason}")]
pub struct EntryParseError {
    pub line: String,
    pub reason: String,
}

impl From<EntryParseError> for LoadError {
    fn from(err: EntryParseError) -> Self {
        LoadError::Corrupt(err.to_string())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used when building products from user input or snapshot records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., a slot code with spaces).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with MachineError.
pub type MachineResult<T> = Result<T, MachineError>;

/// Convenience type alias for Results with CatalogError.
pub type CatalogResult<T> = Result<T, CatalogError>;

// =============================================================================
// Unit Tests
// =============================================================================
