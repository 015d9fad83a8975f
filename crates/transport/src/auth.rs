use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use switchyard_core::AuthPayload;
use tracing::debug;

use crate::error::TransportError;

/// Verdict from the credential store, already folded into the two shapes
/// the dispatcher cares about.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    /// Credentials accepted; `user` is the store's user record, passed
    /// through verbatim and never inspected here.
    Accepted { user: serde_json::Value },
    /// Credentials rejected, either by status code or by an embedded error
    /// flag in an otherwise successful reply.
    Denied { message: String },
}

/// Client for the credential store's authenticate endpoint.
#[async_trait]
pub trait AuthClient: Send + Sync {
    async fn authenticate(&self, credentials: &AuthPayload) -> Result<AuthOutcome, TransportError>;
}

/// The credential store's response body; same shape as the uniform
/// response but decoded locally so `data` stays an opaque document.
#[derive(Debug, Deserialize)]
struct StoreResponse {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// HTTP client for the credential store: `POST {base}/authenticate` with
/// `{email, password}`; 202 is the only success status, 401 means the
/// credentials were rejected.
#[derive(Debug, Clone)]
pub struct HttpAuthClient {
    client: reqwest::Client,
    url: String,
}

impl HttpAuthClient {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            url: format!("{}/authenticate", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl AuthClient for HttpAuthClient {
    async fn authenticate(&self, credentials: &AuthPayload) -> Result<AuthOutcome, TransportError> {
        debug!(url = %self.url, email = %credentials.email, "forwarding authenticate request");
        let response = self.client.post(&self.url).json(credentials).send().await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Ok(AuthOutcome::Denied {
                message: "invalid credentials".to_owned(),
            }),
            StatusCode::ACCEPTED => {
                let body: StoreResponse = response.json().await?;
                if body.error {
                    Ok(AuthOutcome::Denied {
                        message: body.message,
                    })
                } else {
                    Ok(AuthOutcome::Accepted {
                        user: body.data.unwrap_or(serde_json::Value::Null),
                    })
                }
            }
            status => Err(TransportError::UnexpectedStatus(status.as_u16())),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};

    use super::*;
    use crate::testsupport::spawn_router;

    fn credentials() -> AuthPayload {
        AuthPayload {
            email: "admin@example.com".into(),
            password: "verysecret".into(),
        }
    }

    #[tokio::test]
    async fn accepted_reply_passes_user_record_through() {
        let user = serde_json::json!({"id": 1, "email": "admin@example.com", "active": 1});
        let body = serde_json::json!({
            "error": false,
            "message": "Logged in user admin@example.com",
            "data": user,
        });
        let router = Router::new().route(
            "/authenticate",
            post(move |Json(req): Json<serde_json::Value>| async move {
                assert_eq!(req["email"], "admin@example.com");
                (StatusCode::ACCEPTED, Json(body))
            }),
        );
        let addr = spawn_router(router).await;

        let client = HttpAuthClient::new(reqwest::Client::new(), &format!("http://{addr}"));
        let outcome = client.authenticate(&credentials()).await.unwrap();

        assert_eq!(outcome, AuthOutcome::Accepted { user });
    }

    #[tokio::test]
    async fn unauthorized_maps_to_denied() {
        let router = Router::new().route(
            "/authenticate",
            post(|| async { StatusCode::UNAUTHORIZED }),
        );
        let addr = spawn_router(router).await;

        let client = HttpAuthClient::new(reqwest::Client::new(), &format!("http://{addr}"));
        let outcome = client.authenticate(&credentials()).await.unwrap();

        assert_eq!(
            outcome,
            AuthOutcome::Denied {
                message: "invalid credentials".into()
            }
        );
    }

    #[tokio::test]
    async fn embedded_error_flag_propagates_store_message() {
        let router = Router::new().route(
            "/authenticate",
            post(|| async {
                (
                    StatusCode::ACCEPTED,
                    Json(serde_json::json!({"error": true, "message": "account disabled"})),
                )
            }),
        );
        let addr = spawn_router(router).await;

        let client = HttpAuthClient::new(reqwest::Client::new(), &format!("http://{addr}"));
        let outcome = client.authenticate(&credentials()).await.unwrap();

        assert_eq!(
            outcome,
            AuthOutcome::Denied {
                message: "account disabled".into()
            }
        );
    }

    #[tokio::test]
    async fn other_statuses_are_unexpected() {
        let router = Router::new().route(
            "/authenticate",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let addr = spawn_router(router).await;

        let client = HttpAuthClient::new(reqwest::Client::new(), &format!("http://{addr}"));
        let err = client.authenticate(&credentials()).await.unwrap_err();

        assert!(matches!(err, TransportError::UnexpectedStatus(500)));
    }
}
