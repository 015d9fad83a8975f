use async_trait::async_trait;
use switchyard_core::MailPayload;
use tracing::debug;

use crate::error::TransportError;

/// Client for the mail transport's HTTP front door.
#[async_trait]
pub trait MailClient: Send + Sync {
    async fn send(&self, mail: &MailPayload) -> Result<(), TransportError>;
}

/// HTTP client for the mail service: `POST {base}/send` with
/// `{from, to, subject, message}`; any 2xx status is success.
#[derive(Debug, Clone)]
pub struct HttpMailClient {
    client: reqwest::Client,
    url: String,
}

impl HttpMailClient {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            url: format!("{}/send", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl MailClient for HttpMailClient {
    async fn send(&self, mail: &MailPayload) -> Result<(), TransportError> {
        debug!(url = %self.url, to = %mail.to, "forwarding mail request");
        let response = self.client.post(&self.url).json(mail).send().await?;

        if !response.status().is_success() {
            return Err(TransportError::UnexpectedStatus(response.status().as_u16()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};

    use super::*;
    use crate::testsupport::spawn_router;

    fn mail() -> MailPayload {
        MailPayload {
            from: "ops@example.com".into(),
            to: "admin@example.com".into(),
            subject: "status".into(),
            message: "all quiet".into(),
        }
    }

    #[tokio::test]
    async fn send_posts_all_four_fields() {
        let router = Router::new().route(
            "/send",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["from"], "ops@example.com");
                assert_eq!(body["to"], "admin@example.com");
                assert_eq!(body["subject"], "status");
                assert_eq!(body["message"], "all quiet");
                StatusCode::ACCEPTED
            }),
        );
        let addr = spawn_router(router).await;

        let client = HttpMailClient::new(reqwest::Client::new(), &format!("http://{addr}"));
        client.send(&mail()).await.unwrap();
    }

    #[tokio::test]
    async fn downstream_5xx_is_unexpected_status() {
        let router = Router::new().route(
            "/send",
            post(|| async { StatusCode::BAD_GATEWAY }),
        );
        let addr = spawn_router(router).await;

        let client = HttpMailClient::new(reqwest::Client::new(), &format!("http://{addr}"));
        let err = client.send(&mail()).await.unwrap_err();

        assert!(matches!(err, TransportError::UnexpectedStatus(502)));
    }
}
