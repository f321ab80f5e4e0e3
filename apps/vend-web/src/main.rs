//! Vendor Pro web server entry point.
//!
//! ```bash
//! VEND_PORT=8080 VEND_BALANCE_POLICY=retain cargo run -p vend-web
//! ```

use tracing::info;
use vend_web::config::WebConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    vend_web::init_tracing();

    info!("Starting Vendor Pro web server...");

    let config = WebConfig::load(None)?;
    info!(
        addr = %config.server.bind_address(),
        policy = %config.machine.balance_policy,
        persist = config.storage.persist,
        "Configuration loaded"
    );

    vend_web::run(config).await
}
