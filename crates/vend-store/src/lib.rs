//! # vend-store: Snapshot Persistence for Vendor Pro
//!
//! File-backed implementation of the core's `SnapshotSink` and
//! `SnapshotSource` traits, plus the startup bootstrap.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vendor Pro Data Flow                             │
//! │                                                                         │
//! │  HTTP handler (purchase, restock, reset, shutdown)                     │
//! │       │                                                                 │
//! │       ▼ machine.save(&mut store)                                        │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    vend-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ StoreConfig   │    │ JsonFileStore │    │  bootstrap   │  │   │
//! │  │   │ path, pretty  │───►│ atomic write  │◄───│ load or seed │  │   │
//! │  │   │ data dir      │    │ typed reads   │    │ defaults     │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ~/.local/share/vendorpro/machine.json                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vend_core::MachineConfig;
//! use vend_store::{bootstrap, JsonFileStore, StoreConfig};
//!
//! let mut store = JsonFileStore::new(StoreConfig::default_location()?);
//! let (mut machine, outcome) = bootstrap(&mut store, MachineConfig::default());
//!
//! machine.insert_funds(Money::from_cents(200))?;
//! machine.purchase("A1")?;
//! machine.save(&mut store)?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use store::{bootstrap, JsonFileStore, LoadOutcome, StoreConfig, STATE_PATH_ENV};
