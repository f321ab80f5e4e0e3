//! # Web Configuration
//!
//! Settings for the HTTP adapter, loaded in layers.
//!
//! ## Load Order (later overrides earlier)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults            0.0.0.0:10000, retain policy, persistence on    │
//! │  2. vend.toml           $VEND_CONFIG or the platform config dir         │
//! │  3. Environment         VEND_BIND_ADDR, VEND_PORT / PORT,               │
//! │                         VEND_BALANCE_POLICY, VEND_RESTOCK_QUANTITY,     │
//! │                         VEND_STATE_PATH, VEND_PERSIST                   │
//! │  4. validate()                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example File
//! ```toml
//! [server]
//! bind_addr = "127.0.0.1"
//! port = 8080
//!
//! [machine]
//! balance_policy = "reset_to_zero"
//! restock_quantity = 12
//!
//! [storage]
//! state_path = "/var/lib/vend/machine.json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

use vend_core::{
    BalancePolicy, MachineConfig, ADMIN_LOG_LIMIT, DEFAULT_RESTOCK_QUANTITY,
    SNAPSHOT_TRANSACTION_LIMIT,
};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "VEND_CONFIG";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not encode config: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("Could not write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    10000
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    /// `addr:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

/// Machine rules chosen by the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineSettings {
    #[serde(default)]
    pub balance_policy: BalancePolicy,

    #[serde(default = "default_restock_quantity")]
    pub restock_quantity: u32,

    #[serde(default = "default_snapshot_limit")]
    pub snapshot_transaction_limit: usize,

    /// Entries returned by the admin endpoint.
    #[serde(default = "default_admin_log_limit")]
    pub admin_log_limit: usize,
}

fn default_restock_quantity() -> u32 {
    DEFAULT_RESTOCK_QUANTITY
}

fn default_snapshot_limit() -> usize {
    SNAPSHOT_TRANSACTION_LIMIT
}

fn default_admin_log_limit() -> usize {
    ADMIN_LOG_LIMIT
}

impl Default for MachineSettings {
    fn default() -> Self {
        MachineSettings {
            balance_policy: BalancePolicy::default(),
            restock_quantity: default_restock_quantity(),
            snapshot_transaction_limit: default_snapshot_limit(),
            admin_log_limit: default_admin_log_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Write snapshots at all.
    #[serde(default = "default_true")]
    pub persist: bool,

    /// Snapshot file; the platform data directory when unset.
    #[serde(default)]
    pub state_path: Option<PathBuf>,

    #[serde(default = "default_true")]
    pub pretty: bool,
}

fn default_true() -> bool {
    true
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            persist: true,
            state_path: None,
            pretty: true,
        }
    }
}

// =============================================================================
// Web Config
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub machine: MachineSettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

impl WebConfig {
    /// Loads configuration from file, environment, and defaults.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path).map_err(|source| {
                    ConfigError::Read {
                        path: path.clone(),
                        source,
                    }
                })?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Writes the configuration as TOML.
    pub fn save(&self, path: &std::path::Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        info!(?path, "Config saved");
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.bind_addr.trim().is_empty() {
            return Err(ConfigError::Invalid("bind_addr must not be empty".into()));
        }

        if self.machine.snapshot_transaction_limit == 0 {
            return Err(ConfigError::Invalid(
                "snapshot_transaction_limit must be greater than 0".into(),
            ));
        }

        if self.machine.admin_log_limit == 0 {
            return Err(ConfigError::Invalid(
                "admin_log_limit must be greater than 0".into(),
            ));
        }

        if let Some(ref path) = self.storage.state_path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("state_path must not be empty".into()));
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(addr) = std::env::var("VEND_BIND_ADDR") {
            debug!(addr = %addr, "Overriding bind address from environment");
            self.server.bind_addr = addr;
        }

        // VEND_PORT wins over the generic PORT used by hosting platforms
        for key in ["PORT", "VEND_PORT"] {
            if let Ok(port) = std::env::var(key) {
                match port.parse::<u16>() {
                    Ok(p) => self.server.port = p,
                    Err(_) => warn!(key, value = %port, "Ignoring invalid port in environment"),
                }
            }
        }

        if let Ok(policy) = std::env::var("VEND_BALANCE_POLICY") {
            match policy.parse() {
                Ok(parsed) => {
                    debug!(policy = %policy, "Overriding balance policy from environment");
                    self.machine.balance_policy = parsed;
                }
                Err(e) => warn!(error = %e, "Ignoring balance policy in environment"),
            }
        }

        if let Ok(quantity) = std::env::var("VEND_RESTOCK_QUANTITY") {
            if let Ok(q) = quantity.parse::<u32>() {
                self.machine.restock_quantity = q;
            }
        }

        if let Ok(path) = std::env::var(vend_store::STATE_PATH_ENV) {
            if !path.trim().is_empty() {
                self.storage.state_path = Some(PathBuf::from(path));
            }
        }

        if let Ok(persist) = std::env::var("VEND_PERSIST") {
            match persist.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.storage.persist = true,
                "0" | "false" | "no" | "off" => self.storage.persist = false,
                _ => warn!(value = %persist, "Unknown VEND_PERSIST value"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "vendor", "pro")
            .map(|dirs| dirs.config_dir().join("vend.toml"))
    }

    /// Core machine configuration derived from these settings.
    pub fn machine_config(&self) -> MachineConfig {
        MachineConfig {
            balance_policy: self.machine.balance_policy,
            restock_quantity: self.machine.restock_quantity,
            snapshot_transaction_limit: self.machine.snapshot_transaction_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = WebConfig::default();
        assert_eq!(config.server.bind_address(), "0.0.0.0:10000");
        assert_eq!(config.machine.balance_policy, BalancePolicy::RetainRemainder);
        assert_eq!(config.machine.restock_quantity, 10);
        assert!(config.storage.persist);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut config = WebConfig::default();
        config.machine.snapshot_transaction_limit = 0;
        assert!(config.validate().is_err());

        config.machine.snapshot_transaction_limit = 100;
        config.server.bind_addr = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: WebConfig = toml::from_str(
            r#"
            [machine]
            balance_policy = "reset_to_zero"
            "#,
        )
        .unwrap();

        assert_eq!(config.machine.balance_policy, BalancePolicy::ResetToZero);
        assert_eq!(config.machine.restock_quantity, 10);
        assert_eq!(config.server.port, 10000);
        assert_eq!(
            config.machine_config().balance_policy,
            BalancePolicy::ResetToZero
        );
    }

    #[test]
    fn test_save_and_reload_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("conf/vend.toml");

        let mut config = WebConfig::default();
        config.server.port = 8088;
        config.machine.admin_log_limit = 7;
        config.save(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let reloaded: WebConfig = toml::from_str(&contents).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_bad_toml_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vend.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();

        assert!(matches!(
            WebConfig::load(Some(path)),
            Err(ConfigError::Parse(_))
        ));
    }
}
