//! Service entry point for the UpNext catalog API.
//!
//! Connects to `MongoDB`, prepares indexes and the system list, then serves
//! the HTTP API until `Ctrl-C` or `SIGTERM`.
//!
//! # Startup
//!
//! ```text
//! env --> ServiceConfig --> MongoStore::connect (fatal on failure)
//!                               |
//!                               +-- ensure_indexes  (warn on failure)
//!                               +-- bootstrap       (warn on failure)
//!                               +-- start_server
//! ```

mod config;

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use upnext_api::AppState;
use upnext_db::MongoStore;

use crate::config::ServiceConfig;

/// Application entry point.
///
/// Initializes logging, loads configuration from environment variables,
/// connects to the store and runs the HTTP server until shutdown.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the store is unreachable,
/// or the server cannot bind.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("upnext-server starting");

    let config = ServiceConfig::from_env()?;
    info!(
        db_name = %config.db_name,
        host = %config.host,
        port = config.port,
        request_timeout_ms = config.request_timeout.as_millis(),
        connect_timeout_ms = config.connect_timeout.as_millis(),
        "configuration loaded"
    );

    let store = MongoStore::connect(&config.mongo()).await?;

    if let Err(e) = store.ensure_indexes().await {
        warn!(error = %e, "failed to ensure indexes; continuing");
    }

    let state = AppState::new(Arc::new(store.clone())).with_request_timeout(config.request_timeout);
    upnext_api::bootstrap(&state).await;

    upnext_api::start_server(&config.server(), Arc::new(state)).await?;

    store.shutdown().await;
    info!("upnext-server stopped");
    Ok(())
}

/// Install the global subscriber. `LOG_FORMAT=json` selects JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}
