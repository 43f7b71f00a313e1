//! twbind server
//!
//! Subscribes to the sidecar's `tweets` input binding and logs every tweet it
//! delivers.

mod api;
mod config;
mod logging;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::ConfigLoader;
use config::runtime::{LogConfig, RuntimeConfig};
use logging::init_tracing;
use server::{bind, build_router, run_server};
use shutdown::{broadcast_shutdown, shutdown_signal, spawn_config_reload_handler};
use state::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use twbind_core::{BindingRegistry, RegistrationError, TweetHandler};
use twbind_sdk::routes::TWEETS_BINDING;

/// twbind - tweet input-binding endpoint
#[derive(Parser, Debug)]
#[command(name = "twbind-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to an optional TOML configuration file
    #[arg(short, long, env = "TWBIND_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen address (e.g., :8080 or 127.0.0.1:3000)
    #[arg(short, long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration; logging starts with defaults if that fails
    let config_loader = Arc::new(ConfigLoader::new(args.config.as_ref(), args.listen));
    let loaded_config = config_loader.load();
    let log_handle = match &loaded_config {
        Ok(config) => init_tracing(&config.log),
        Err(_) => init_tracing(&LogConfig::default()),
    };

    tracing::info!("Starting twbind-server v{}", env!("CARGO_PKG_VERSION"));

    let config = loaded_config.map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::info!("Configuration loaded, listen address {}", config.server.listen);

    // Spawn config reload handler (listens for SIGHUP)
    let reload_notify =
        spawn_config_reload_handler(config_loader, log_handle, config.server.clone());

    let result = run(config, register_bindings, shutdown_signal()).await;

    // Signal the config reload handler to stop
    reload_notify.notify_one();

    result
}

/// Register every binding this app subscribes to.
fn register_bindings(registry: &mut BindingRegistry) -> Result<(), RegistrationError> {
    registry.register(TWEETS_BINDING, TweetHandler)
}

/// Register handlers, bind the listener and serve until `shutdown` resolves.
///
/// Registration happens before binding, so a registration failure never
/// opens the port.
async fn run(
    config: RuntimeConfig,
    register: impl FnOnce(&mut BindingRegistry) -> Result<(), RegistrationError>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let mut registry = BindingRegistry::new();
    register(&mut registry).map_err(|e| {
        tracing::error!("error adding binding handler: {}", e);
        e
    })?;
    tracing::info!(bindings = ?registry, "Binding handlers registered");

    // Create application state
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let state = AppState::new(registry, shutdown_rx);

    // Build the router
    let router = build_router(state, config.server.max_payload_bytes);

    // Run the server
    let listener = bind(&config.server.listen).await.map_err(|e| {
        tracing::error!("Failed to bind {}: {}", config.server.listen, e);
        e
    })?;
    run_server(router, listener, broadcast_shutdown(shutdown, shutdown_tx))
        .await
        .map_err(|e| {
            tracing::error!("error starting service: {}", e);
            e
        })?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
