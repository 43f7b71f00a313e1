//! Axum server setup and router configuration.

use crate::api;
use crate::config::runtime::ListenAddress;
use crate::state::AppState;
use axum::{Router, extract::DefaultBodyLimit, http::StatusCode, routing::get};
use tokio::net::TcpListener;
use twbind_sdk::routes::HEALTH_ROUTE;

/// Build the main application router.
pub fn build_router(state: AppState, max_payload_bytes: usize) -> Router {
    Router::new()
        // Health check endpoint polled by the sidecar
        .route(HEALTH_ROUTE, get(health_check))
        .merge(api::router())
        .layer(DefaultBodyLimit::max(max_payload_bytes))
        // Add state to all routes
        .with_state(state)
}

/// Simple health check - returns 204 if the server is running.
async fn health_check() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Bind the listener for `addr`.
pub async fn bind(addr: &ListenAddress) -> Result<TcpListener, std::io::Error> {
    let listener = TcpListener::bind((addr.host(), addr.port())).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Run the server until `shutdown` resolves, then drain in-flight requests.
///
/// Returns `Ok` after a graceful shutdown; any other exit is an error.
pub async fn run_server(
    router: Router,
    listener: TcpListener,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}
