//! # State Module
//!
//! Shared application state handed to every axum handler.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  Router::with_state(AppState)                                          │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────┐              │
//! │  │ MachineState │  │ Option<          │  │  WebConfig   │              │
//! │  │ Arc<Mutex<   │  │  JsonFileStore>  │  │  (read-only) │              │
//! │  │   Machine>>  │  │ None = no disk   │  │              │              │
//! │  └──────────────┘  └──────────────────┘  └──────────────┘              │
//! │                                                                         │
//! │  Snapshots are taken under the machine lock and written on the         │
//! │  blocking pool after it is released. Each carries a sequence number;   │
//! │  a write older than the last one on disk is skipped.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod machine;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};
use vend_core::{Machine, Snapshot, SnapshotSink};
use vend_store::JsonFileStore;

use crate::config::WebConfig;

pub use machine::MachineState;

#[derive(Debug, Clone)]
pub struct AppState {
    pub machine: MachineState,
    pub store: Option<JsonFileStore>,
    pub config: Arc<WebConfig>,
    saves: Arc<SaveOrder>,
}

/// Sequence numbers for snapshots: issued under the machine lock,
/// recorded once written.
#[derive(Debug, Default)]
struct SaveOrder {
    issued: AtomicU64,
    written: Mutex<u64>,
}

/// A snapshot taken under the machine lock, waiting to be written.
#[derive(Debug)]
pub struct PendingSave {
    seq: u64,
    snapshot: Snapshot,
}

impl AppState {
    pub fn new(machine: Machine, store: Option<JsonFileStore>, config: WebConfig) -> Self {
        AppState {
            machine: MachineState::new(machine),
            store,
            config: Arc::new(config),
            saves: Arc::new(SaveOrder::default()),
        }
    }

    /// State with no persistence, for tests and throwaway sessions.
    pub fn in_memory(config: WebConfig) -> Self {
        let machine = Machine::new(vend_core::Catalog::with_defaults(), config.machine_config());
        AppState::new(machine, None, config)
    }

    /// Takes a snapshot of `machine` for a later [`AppState::persist`].
    ///
    /// Call with the machine lock held so sequence order matches the
    /// order of changes. `None` when there is no store.
    pub fn capture(&self, machine: &Machine) -> Option<PendingSave> {
        self.store.as_ref()?;
        let seq = self.saves.issued.fetch_add(1, Ordering::SeqCst) + 1;
        Some(PendingSave {
            seq,
            snapshot: machine.snapshot(),
        })
    }

    /// Writes a captured snapshot on the blocking pool.
    ///
    /// Returns a user-facing warning when the write fails; the machine
    /// itself is never affected.
    pub async fn persist(&self, pending: Option<PendingSave>) -> Option<String> {
        let pending = pending?;
        let state = self.clone();

        match tokio::task::spawn_blocking(move || state.write(pending)).await {
            Ok(warning) => warning,
            Err(e) => {
                warn!(error = %e, "Snapshot write task failed");
                Some(format!("State could not be saved: {}", e))
            }
        }
    }

    /// Captures and writes the current state; used on shutdown.
    pub async fn persist_now(&self) -> Option<String> {
        let pending = self.machine.with_machine(|m| self.capture(m));
        self.persist(pending).await
    }

    fn write(&self, pending: PendingSave) -> Option<String> {
        let mut store = self.store.clone()?;
        let mut written = self
            .saves
            .written
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if pending.seq <= *written {
            debug!(seq = pending.seq, latest = *written, "Skipping superseded snapshot");
            return None;
        }

        match store.write_snapshot(&pending.snapshot) {
            Ok(()) => {
                *written = pending.seq;
                debug!(path = %store.path().display(), seq = pending.seq, "State saved");
                None
            }
            Err(e) => {
                warn!(error = %e, "Failed to save machine state");
                Some(format!("State could not be saved: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vend_core::{Money, SnapshotSource};

    #[tokio::test]
    async fn test_superseded_snapshot_is_not_written() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::at(dir.path().join("machine.json"));
        let state = AppState::new(Machine::with_defaults(), Some(store.clone()), WebConfig::default());

        let older = state.machine.with_machine(|m| state.capture(m));
        let newer = state.machine.with_machine_mut(|m| {
            m.insert_funds(Money::from_cents(200)).unwrap();
            m.purchase("A1").unwrap();
            state.capture(m)
        });

        assert!(state.persist(newer).await.is_none());
        assert!(state.persist(older).await.is_none());

        let snapshot = store.read_snapshot().unwrap();
        assert_eq!(snapshot.total_sales, Money::from_cents(175));
    }

    #[tokio::test]
    async fn test_no_store_means_nothing_to_capture() {
        let state = AppState::in_memory(WebConfig::default());
        assert!(state.machine.with_machine(|m| state.capture(m)).is_none());
        assert!(state.persist_now().await.is_none());
    }
}
