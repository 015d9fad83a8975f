use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use switchyard_core::UniformResponse;
use switchyard_gateway::GatewayError;
use thiserror::Error;

/// Errors that can occur while starting the gateway server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error (e.g. binding the listener).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A startup dependency never became reachable. Fatal.
    #[error("startup failed: {0}")]
    Startup(#[from] switchyard_bus::BusError),
}

/// Request-scoped error surfaced through the API.
///
/// Every variant renders as a uniform `{error, message}` JSON body with the
/// HTTP status mirroring the gateway's classification, so callers see one
/// shape regardless of which downstream or transport failed. Body decode
/// failures are folded in here too; the parser's internal detail stays in
/// local logs only.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The request body was not a decodable envelope.
    #[error("malformed request body")]
    MalformedBody,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Gateway(GatewayError::Invalid(_)) | Self::MalformedBody => {
                StatusCode::BAD_REQUEST
            }
            Self::Gateway(GatewayError::AuthRejected(_)) => StatusCode::UNAUTHORIZED,
            Self::Gateway(GatewayError::Upstream(_)) => StatusCode::BAD_GATEWAY,
        };
        let body = UniformResponse::failure(self.to_string());
        (status, Json(body)).into_response()
    }
}
