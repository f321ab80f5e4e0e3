//! # Seed Snapshot Writer
//!
//! Writes the factory catalog as a fresh snapshot.
//!
//! ## Usage
//! ```bash
//! # Default data directory (or $VEND_STATE_PATH)
//! cargo run -p vend-store --bin seed
//!
//! # Explicit path, overwriting an existing snapshot
//! cargo run -p vend-store --bin seed -- --path ./data/machine.json --force
//!
//! # Start every slot at 5 units
//! cargo run -p vend-store --bin seed -- --quantity 5
//! ```

use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vend_core::Machine;
use vend_store::{JsonFileStore, StoreConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,vend=debug")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut path: Option<String> = None;
    let mut quantity: Option<u32> = None;
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--path" | "-p" => {
                if i + 1 < args.len() {
                    path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--quantity" | "-q" => {
                if i + 1 < args.len() {
                    quantity = Some(args[i + 1].parse()?);
                    i += 1;
                }
            }
            "--force" | "-f" => force = true,
            "--help" | "-h" => {
                println!("Vendor Pro Seed Snapshot Writer");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -p, --path <PATH>      Snapshot file (default: data dir or $VEND_STATE_PATH)");
                println!("  -q, --quantity <N>     Units per slot (default: factory quantities)");
                println!("  -f, --force            Overwrite an existing snapshot");
                println!("  -h, --help             Show this help message");
                return Ok(());
            }
            other => warn!(argument = other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    let config = match path {
        Some(path) => StoreConfig::new(path),
        None => StoreConfig::default_location()?,
    };
    let mut store = JsonFileStore::new(config);

    if store.path().exists() && !force {
        warn!(
            path = %store.path().display(),
            "Snapshot already exists, pass --force to overwrite"
        );
        return Ok(());
    }

    let mut machine = Machine::with_defaults();
    if let Some(quantity) = quantity {
        machine.restock_all(quantity);
    }
    machine.save(&mut store)?;

    info!(
        path = %store.path().display(),
        products = machine.catalog().len(),
        "Default snapshot written"
    );
    Ok(())
}
