use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use switchyard_core::RequestEnvelope;
use switchyard_gateway::Dispatcher;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::error::ApiError;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The dispatcher instance; request handling shares it without locking.
    pub dispatcher: Arc<Dispatcher>,
}

/// Build the router with all routes and middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/handle", post(handle))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `POST /handle` -- submit one request envelope for dispatch.
///
/// The response body is always a [`UniformResponse`]; the HTTP status
/// mirrors the error classification (200 success, 400 validation,
/// 401 unauthorized, 502 downstream failure).
///
/// [`UniformResponse`]: switchyard_core::UniformResponse
async fn handle(
    State(state): State<AppState>,
    body: Result<Json<RequestEnvelope>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(envelope) = body.map_err(|rejection| {
        debug!(error = %rejection, "rejecting undecodable request body");
        ApiError::MalformedBody
    })?;
    let response = state.dispatcher.submit(envelope).await?;
    Ok((StatusCode::OK, Json(response)))
}

/// `GET /health` -- liveness probe.
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
