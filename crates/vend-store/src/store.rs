//! # JSON File Store
//!
//! Snapshot persistence on the local file system.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Crash-safe snapshot write                          │
//! │                                                                         │
//! │  Machine::save(&mut store)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  serde_json::to_vec(snapshot)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  NamedTempFile in the SAME directory  ──► write_all ──► sync_all       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  persist(machine.json)   ← atomic rename over the old snapshot          │
//! │                                                                         │
//! │  A crash before the rename leaves the previous snapshot intact.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Read Path
//! ```text
//! file missing        → LoadError::Missing
//! other I/O failure   → LoadError::Unreadable
//! bad JSON / records  → LoadError::Corrupt
//! ```

use directories::ProjectDirs;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use vend_core::{
    Catalog, LoadError, Machine, MachineConfig, Snapshot, SnapshotSink, SnapshotSource,
};

use crate::error::{StoreError, StoreResult};

/// Environment variable overriding the snapshot location.
pub const STATE_PATH_ENV: &str = "VEND_STATE_PATH";

/// File name of the snapshot inside the data directory.
pub const SNAPSHOT_FILE_NAME: &str = "machine.json";

// =============================================================================
// Configuration
// =============================================================================

/// Snapshot store configuration.
///
/// ## Example
/// ```rust
/// use vend_store::StoreConfig;
///
/// let config = StoreConfig::new("/tmp/vend/machine.json").pretty(false);
/// assert!(!config.pretty);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Snapshot file path.
    pub path: PathBuf,

    /// Indent the JSON for humans.
    /// Default: true
    pub pretty: bool,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            path: path.into(),
            pretty: true,
        }
    }

    /// Sets whether the JSON is indented.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Platform data directory, or `VEND_STATE_PATH` when set.
    ///
    /// ## Locations
    /// - Linux: `~/.local/share/vendorpro/machine.json`
    /// - macOS: `~/Library/Application Support/com.vendor.pro/machine.json`
    /// - Windows: `%APPDATA%\vendor\pro\data\machine.json`
    pub fn default_location() -> StoreResult<Self> {
        if let Ok(path) = std::env::var(STATE_PATH_ENV) {
            if !path.trim().is_empty() {
                return Ok(StoreConfig::new(path));
            }
        }

        let dirs = ProjectDirs::from("com", "vendor", "pro").ok_or(StoreError::NoDataDir)?;
        Ok(StoreConfig::new(dirs.data_dir().join(SNAPSHOT_FILE_NAME)))
    }
}

// =============================================================================
// Store
// =============================================================================

/// Snapshot store backed by one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    config: StoreConfig,
}

impl JsonFileStore {
    pub fn new(config: StoreConfig) -> Self {
        JsonFileStore { config }
    }

    /// Store at `path` with default settings.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        JsonFileStore::new(StoreConfig::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn encode(&self, snapshot: &Snapshot) -> StoreResult<Vec<u8>> {
        let bytes = if self.config.pretty {
            serde_json::to_vec_pretty(snapshot)?
        } else {
            serde_json::to_vec(snapshot)?
        };
        Ok(bytes)
    }

    /// Directory the temp file must live in so the rename stays on one
    /// file system.
    fn target_dir(&self) -> PathBuf {
        match self.config.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

impl SnapshotSink for JsonFileStore {
    type Error = StoreError;

    fn write_snapshot(&mut self, snapshot: &Snapshot) -> StoreResult<()> {
        let path = &self.config.path;
        let dir = self.target_dir();
        let bytes = self.encode(snapshot)?;

        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| StoreError::io(&dir, e))?;
        tmp.write_all(&bytes)
            .map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.persist(path)
            .map_err(|e| StoreError::io(path, e.error))?;

        debug!(
            path = %path.display(),
            products = snapshot.products.len(),
            transactions = snapshot.transactions.len(),
            "Snapshot written"
        );
        Ok(())
    }
}

impl SnapshotSource for JsonFileStore {
    fn read_snapshot(&self) -> Result<Snapshot, LoadError> {
        let path = &self.config.path;

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(LoadError::Missing),
            Err(e) => {
                return Err(LoadError::Unreadable(format!("{}: {}", path.display(), e)));
            }
        };

        serde_json::from_str(&contents)
            .map_err(|e| LoadError::Corrupt(format!("{}: {}", path.display(), e)))
    }
}

// =============================================================================
// Bootstrap
// =============================================================================

/// How the machine came up at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Saved state was applied.
    Restored,

    /// Defaults are in use; carries why the saved state was not applied.
    Defaulted(LoadError),
}

impl LoadOutcome {
    pub fn is_restored(&self) -> bool {
        matches!(self, LoadOutcome::Restored)
    }
}

/// Builds the session's machine from `store`.
///
/// ## Flow
/// ```text
/// default machine ──► load(store) ──ok──► Restored
///                          │
///                        error (missing / unreadable / corrupt)
///                          │
///                          ▼
///                 keep defaults, save them ──► Defaulted(err)
///                          │
///                   save fails → warn, keep going
/// ```
///
/// Never fails: the worst case is a default machine that could not be
/// written back.
pub fn bootstrap<S>(store: &mut S, config: MachineConfig) -> (Machine, LoadOutcome)
where
    S: SnapshotSink + SnapshotSource,
    S::Error: std::fmt::Display,
{
    let mut machine = Machine::new(Catalog::with_defaults(), config);

    match machine.load(&*store) {
        Ok(()) => {
            info!(
                products = machine.catalog().len(),
                total_sales = %machine.total_sales(),
                "Restored saved machine state"
            );
            (machine, LoadOutcome::Restored)
        }
        Err(err) => {
            if err.is_missing() {
                info!("No saved state, starting with the default catalog");
            } else {
                warn!(error = %err, "Saved state rejected, starting with the default catalog");
            }

            if let Err(save_err) = machine.save(store) {
                warn!(error = %save_err, "Could not persist default state");
            }
            (machine, LoadOutcome::Defaulted(err))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vend_core::{MemorySnapshot, Money};

    fn store_in(dir: &TempDir) -> JsonFileStore {
        JsonFileStore::at(dir.path().join("machine.json"))
    }

    #[test]
    fn test_missing_file_is_missing() {
        let dir = TempDir::new().unwrap();
        assert_eq!(store_in(&dir).read_snapshot(), Err(LoadError::Missing));
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        let mut machine = Machine::with_defaults();
        machine.insert_funds(Money::from_cents(500)).unwrap();
        machine.purchase("B3").unwrap();
        machine.save(&mut store).unwrap();

        let mut restored = Machine::with_defaults();
        restored.load(&store).unwrap();
        assert_eq!(restored.catalog(), machine.catalog());
        assert_eq!(restored.total_sales(), Money::from_cents(350));
        assert_eq!(restored.catalog().get("B3").unwrap().quantity(), 9);
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::at(dir.path().join("nested/deeper/machine.json"));

        Machine::with_defaults().save(&mut store).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_write_replaces_previous_snapshot() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        let mut machine = Machine::with_defaults();
        machine.save(&mut store).unwrap();
        machine.restock_all(2);
        machine.save(&mut store).unwrap();

        let snapshot = store.read_snapshot().unwrap();
        assert!(snapshot.products.iter().all(|p| p.quantity == 2));

        // Only the snapshot remains; no temp files left behind
        let files = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 1);
    }

    #[test]
    fn test_compact_output() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(
            StoreConfig::new(dir.path().join("machine.json")).pretty(false),
        );
        Machine::with_defaults().save(&mut store).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        assert!(!contents.contains('\n'));
    }

    #[test]
    fn test_bad_json_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(store.read_snapshot(), Err(LoadError::Corrupt(_))));
    }

    #[test]
    fn test_directory_in_place_of_file_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::at(dir.path());

        assert!(matches!(store.read_snapshot(), Err(LoadError::Unreadable(_))));
    }

    #[test]
    fn test_bootstrap_missing_seeds_defaults() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        let (machine, outcome) = bootstrap(&mut store, MachineConfig::default());
        assert_eq!(outcome, LoadOutcome::Defaulted(LoadError::Missing));
        assert_eq!(machine.catalog(), &Catalog::with_defaults());

        // Defaults were written back
        assert!(store.path().exists());
        let (_, second) = bootstrap(&mut store, MachineConfig::default());
        assert!(second.is_restored());
    }

    #[test]
    fn test_bootstrap_corrupt_falls_back_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        fs::write(
            store.path(),
            r#"{ "products": [ { "code": "A1", "name": "", "price": 100, "quantity": 1 } ], "total_sales": 0 }"#,
        )
        .unwrap();

        let (machine, outcome) = bootstrap(&mut store, MachineConfig::default());
        assert!(matches!(outcome, LoadOutcome::Defaulted(LoadError::Corrupt(_))));
        assert_eq!(machine.catalog().len(), 24);
        assert_eq!(store.read_snapshot().unwrap().products.len(), 24);
    }

    #[test]
    fn test_bootstrap_restores() {
        let mut memory = MemorySnapshot::new();
        let mut saved = Machine::with_defaults();
        saved.insert_funds(Money::from_cents(100)).unwrap();
        saved.purchase("F4").unwrap();
        saved.save(&mut memory).unwrap();

        let (machine, outcome) = bootstrap(&mut memory, MachineConfig::default());
        assert_eq!(outcome, LoadOutcome::Restored);
        assert_eq!(machine.total_sales(), Money::from_cents(75));
        assert_eq!(machine.balance(), Money::zero());
    }

    #[test]
    fn test_default_location_env_override() {
        std::env::set_var(STATE_PATH_ENV, "/tmp/vend-test/state.json");
        let config = StoreConfig::default_location().unwrap();
        std::env::remove_var(STATE_PATH_ENV);

        assert_eq!(config.path, PathBuf::from("/tmp/vend-test/state.json"));
    }
}
