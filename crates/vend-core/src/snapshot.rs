//! # Snapshot
//!
//! The persisted form of a machine, and the two seams persistence plugs into.
//!
//! ```json
//! {
//!   "products": [ { "code": "A1", "name": "Coke", "price": 175, "quantity": 9 } ],
//!   "total_sales": 350,
//!   "transactions": [ "2024-03-01 14:02:15 Purchased Coke (A1) for $1.75" ]
//! }
//! ```
//!
//! ## Why Traits?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Machine::save(&mut sink)          Machine::load(&source)               │
//! │        │                                   ▲                            │
//! │        ▼                                   │                            │
//! │  SnapshotSink::write_snapshot     SnapshotSource::read_snapshot         │
//! │        │                                   ▲                            │
//! │   ┌────┴──────────────┐          ┌─────────┴─────────┐                  │
//! │   │ MemorySnapshot    │          │ MemorySnapshot    │  (this crate)    │
//! │   │ JsonFileStore     │          │ JsonFileStore     │  (vend-store)    │
//! │   └───────────────────┘          └───────────────────┘                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! The core never touches a file; the encoding is the implementor's choice.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;

use crate::error::LoadError;
use crate::money::Money;
use crate::types::ProductRecord;

/// Persisted machine state. The live balance is intentionally absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub products: Vec<ProductRecord>,
    pub total_sales: Money,
    #[serde(default)]
    pub transactions: Vec<String>,
}

/// Somewhere a snapshot can be written.
pub trait SnapshotSink {
    type Error;

    fn write_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), Self::Error>;
}

/// Somewhere a snapshot can be read from.
pub trait SnapshotSource {
    fn read_snapshot(&self) -> Result<Snapshot, LoadError>;
}

/// In-memory sink and source.
///
/// ## Example
/// ```rust
/// use vend_core::{Machine, MemorySnapshot, LoadError};
///
/// let mut memory = MemorySnapshot::new();
/// let mut machine = Machine::with_defaults();
/// assert_eq!(machine.load(&memory), Err(LoadError::Missing));
///
/// machine.save(&mut memory).unwrap();
/// assert!(machine.load(&memory).is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshot {
    stored: Option<Snapshot>,
}

impl MemorySnapshot {
    pub fn new() -> Self {
        MemorySnapshot::default()
    }
}

impl SnapshotSink for MemorySnapshot {
    type Error = Infallible;

    fn write_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), Self::Error> {
        self.stored = Some(snapshot.clone());
        Ok(())
    }
}

impl SnapshotSource for MemorySnapshot {
    fn read_snapshot(&self) -> Result<Snapshot, LoadError> {
        self.stored.clone().ok_or(LoadError::Missing)
    }
}
