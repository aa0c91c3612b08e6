//! `orders-svc` — order service binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise structured logging.
//! 3. Build the [`FieldCipher`](fieldsec::FieldCipher) from the configured keys.
//! 4. Create the in-memory stores and optionally seed demo data.
//! 5. Build the Axum router and start the HTTP server.

mod config;
mod data;
mod server;
mod telemetry;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use tracing::info;

use config::Config;
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_port = cfg.listen_port,
        "orders-svc starting"
    );

    // -----------------------------------------------------------------------
    // 3. Field cipher
    // -----------------------------------------------------------------------
    let cipher = cfg.field_cipher()?;
    let (cipher_name, mac_name) = cipher.algorithms();
    info!(cipher = cipher_name, mac = mac_name, "field cipher ready");

    // -----------------------------------------------------------------------
    // 4. Stores
    // -----------------------------------------------------------------------
    let state = AppState::new(cipher, cfg.principal_header_name.clone());
    if cfg.seed_demo_data {
        let demo = data::seed::seed_demo_data(&state.users, &state.orders)
            .context("failed to seed demo data")?;
        info!(
            admin = %demo.admin.id,
            user1 = %demo.user1.id,
            user2 = %demo.user2.id,
            "demo principals"
        );
    }

    // -----------------------------------------------------------------------
    // 5. HTTP server
    // -----------------------------------------------------------------------
    let router = server::router::build(state);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
