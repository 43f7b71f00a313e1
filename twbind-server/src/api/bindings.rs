//! Binding invocation and probe handlers.

use axum::{
    extract::{FromRequest, Path, Request, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::Instrument;
use twbind_core::{InvocationContext, InvocationError};
use uuid::Uuid;

use crate::api::extractors::{DeliveredEvent, DeliveredEventError};
use crate::state::AppState;

/// `POST /{binding}` – hand one delivered event to its handler.
///
/// Replies `200` with the handler's output as the body, or an empty body
/// when the handler produced nothing. The body is only read once the binding
/// is known to be registered.
pub async fn invoke_binding(
    State(state): State<AppState>,
    Path(binding): Path<String>,
    request: Request,
) -> Result<Response, BindingApiError> {
    let handler = state
        .registry
        .get(&binding)
        .ok_or_else(|| BindingApiError::NotRegistered(binding.clone()))?;

    let DeliveredEvent(event) = DeliveredEvent::from_request(request, &state)
        .await
        .map_err(BindingApiError::Delivery)?;

    let ctx = InvocationContext::new(binding, state.shutdown_rx.clone());
    let span = tracing::info_span!(
        "binding",
        binding = %ctx.binding(),
        invocation_id = %Uuid::now_v7(),
    );

    let output = handler
        .invoke(ctx, event)
        .instrument(span)
        .await
        .map_err(BindingApiError::Handler)?;

    if output.is_empty() {
        return Ok(StatusCode::OK.into_response());
    }
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        output,
    )
        .into_response())
}

/// `OPTIONS /{binding}` – tell the sidecar whether this app subscribes.
pub async fn probe_binding(
    State(state): State<AppState>,
    Path(binding): Path<String>,
) -> Response {
    if state.registry.contains(&binding) {
        (StatusCode::OK, [(header::ALLOW, "OPTIONS, POST, PUT")]).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

/// Errors that can occur in binding handlers.
#[derive(Debug)]
pub enum BindingApiError {
    /// No handler is registered under the requested name.
    NotRegistered(String),
    /// The delivery could not be read.
    Delivery(DeliveredEventError),
    /// The handler reported an error.
    Handler(InvocationError),
}

impl IntoResponse for BindingApiError {
    fn into_response(self) -> Response {
        match self {
            BindingApiError::NotRegistered(binding) => {
                tracing::debug!(binding = %binding, "Delivery for unregistered binding");
                (StatusCode::NOT_FOUND, "binding not registered").into_response()
            }
            BindingApiError::Delivery(e) => e.into_response(),
            BindingApiError::Handler(InvocationError::Cancelled) => {
                (StatusCode::SERVICE_UNAVAILABLE, "invocation cancelled").into_response()
            }
            BindingApiError::Handler(e) => {
                tracing::error!(error = %e, "Binding handler error");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
            }
        }
    }
}
