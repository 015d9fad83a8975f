use async_trait::async_trait;
use serde::Serialize;
use switchyard_core::LogEvent;
use tracing::debug;

use crate::error::TransportError;
use crate::log::{LogTransport, WriteAck};

/// Log write adapter speaking plain HTTP: `POST {base}/log` with
/// `{name, data}`; any 2xx status is success.
#[derive(Debug, Clone)]
pub struct HttpLogTransport {
    client: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct LogBody<'a> {
    name: &'a str,
    data: &'a str,
}

impl HttpLogTransport {
    /// `base_url` is the log store's front door, e.g. `http://logger-service`.
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            url: format!("{}/log", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl LogTransport for HttpLogTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn write(&self, event: &LogEvent) -> Result<WriteAck, TransportError> {
        debug!(url = %self.url, name = %event.name, "forwarding log entry over HTTP");
        let response = self
            .client
            .post(&self.url)
            .json(&LogBody {
                name: &event.name,
                data: &event.data,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TransportError::UnexpectedStatus(response.status().as_u16()));
        }

        Ok(WriteAck::new("Logged"))
    }
}
