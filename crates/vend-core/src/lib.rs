//! # vend-core: Pure Business Logic for Vendor Pro
//!
//! This crate is the **heart** of Vendor Pro. It holds the vending machine's
//! state-transition rules with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Vendor Pro Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP adapter (vend-web)                      │   │
//! │  │   /api/add-money ──► /api/purchase ──► /api/cancel ──► /admin  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ one Mutex<Machine>                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vend-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  machine  │  │  catalog  │  │  ledger   │  │ snapshot  │  │   │
//! │  │   │  balance  │  │  Product  │  │  entries  │  │ Sink/     │  │   │
//! │  │   │  sales    │  │  by code  │  │  append   │  │ Source    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO NETWORK • SYNCHRONOUS OPERATIONS      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │ Snapshot                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  vend-store (Persistence Layer)                 │   │
//! │  │            JSON snapshot files, atomic replace, bootstrap       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`machine`] - The `Machine` aggregate: funding, purchase, cancel, restock
//! - [`catalog`] - Ordered product slots keyed by code
//! - [`ledger`] - Timestamped, append-only transaction log
//! - [`snapshot`] - Persisted state record and the sink/source traits
//! - [`types`] - Domain types (Product, SlotView, BalancePolicy, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Product field validation
//!
//! ## Design Principles
//!
//! 1. **All or nothing**: a failed operation leaves the machine exactly as it was
//! 2. **No I/O**: persistence goes through [`SnapshotSink`]/[`SnapshotSource`]
//! 3. **Integer Money**: balances and prices are cents (i64)
//! 4. **Explicit Errors**: every rule violation is a typed [`MachineError`]
//!
//! ## Example Usage
//!
//! ```rust
//! use vend_core::{Catalog, Machine, MachineConfig, MachineError, Money, Product};
//!
//! let mut catalog = Catalog::new();
//! catalog.add(Product::new("A1", "Coke", Money::from_cents(175), 1).unwrap());
//! let mut machine = Machine::new(catalog, MachineConfig::default());
//!
//! machine.insert_funds(Money::from_cents(200)).unwrap();
//! let receipt = machine.purchase("A1").unwrap();
//! assert_eq!(receipt.balance, Money::from_cents(25));
//!
//! // Slot is now empty
//! assert!(matches!(machine.purchase("A1"), Err(MachineError::OutOfStock { .. })));
//! assert_eq!(machine.cancel(), Money::from_cents(25));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod ledger;
pub mod machine;
pub mod money;
pub mod snapshot;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use vend_core::Machine` instead of
// `use vend_core::machine::Machine`

pub use catalog::Catalog;
pub use error::{CatalogError, LoadError, MachineError, MachineResult, ValidationError};
pub use ledger::{TransactionEntry, TransactionLog};
pub use machine::Machine;
pub use money::Money;
pub use snapshot::{MemorySnapshot, Snapshot, SnapshotSink, SnapshotSource};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a slot code.
pub const MAX_CODE_LEN: usize = 8;

/// Maximum length of a product display name.
///
/// ## Business Reason
/// Names are printed on a narrow slot label and in log lines.
pub const MAX_NAME_LEN: usize = 60;

/// Units per slot after a restock with no explicit quantity.
pub const DEFAULT_RESTOCK_QUANTITY: u32 = 10;

/// Most recent transaction entries kept in a persisted snapshot.
///
/// ## Business Reason
/// The in-memory log grows for the whole session; the snapshot file only
/// needs enough history for the admin view after a restart.
pub const SNAPSHOT_TRANSACTION_LIMIT: usize = 100;

/// Entries shown on the admin screen by default.
pub const ADMIN_LOG_LIMIT: usize = 5;

/// Textual timestamp format of every log entry (sortable, UTC).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
