//! Input-binding API.
//!
//! The sidecar drives these endpoints.
//!
//! # Endpoints
//!
//! - `OPTIONS /{binding}` – startup probe, `200` when the app subscribes
//! - `POST    /{binding}` – deliver one event
//! - `PUT     /{binding}` – same as `POST`

use axum::{Router, routing::post};

use crate::state::AppState;

mod bindings;
pub mod extractors;

/// Build the binding API router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{binding}",
        post(bindings::invoke_binding)
            .put(bindings::invoke_binding)
            .options(bindings::probe_binding),
    )
}
