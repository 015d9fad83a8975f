use async_trait::async_trait;
use switchyard_core::LogEvent;

use crate::error::TransportError;

/// Acknowledgment returned by a successful log write.
///
/// `message` becomes the uniform response message; `detail` carries an
/// adapter-specific result string when the protocol returns one (gRPC).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteAck {
    pub message: String,
    pub detail: Option<String>,
}

impl WriteAck {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: Some(detail.into()),
        }
    }
}

/// A protocol-specific way of writing one log event downstream.
///
/// Implementations must be safe to call concurrently; the dispatcher holds
/// one instance behind an `Arc` for the life of the process.
#[async_trait]
pub trait LogTransport: Send + Sync {
    /// Short name used in logs and configuration (`http`, `rpc`, `grpc`, `bus`).
    fn name(&self) -> &'static str;

    /// Serialize the event for this protocol, perform the call, and report
    /// the downstream's acknowledgment.
    async fn write(&self, event: &LogEvent) -> Result<WriteAck, TransportError>;
}
