use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use switchyard_core::LogEvent;
use tokio::net::TcpStream;
use tokio_util::codec::{Framed, LinesCodec};
use tracing::debug;

use crate::DEFAULT_TIMEOUT;
use crate::error::TransportError;
use crate::log::{LogTransport, WriteAck};

/// Remote procedure invoked on the log store's RPC listener.
const LOG_INFO_METHOD: &str = "RPCServer.LogInfo";

/// Replies longer than this indicate a confused peer, not a log result.
const MAX_LINE_BYTES: usize = 64 * 1024;

/// Log write adapter speaking a framed binary RPC protocol: one
/// newline-delimited JSON request per connection, one reply line back.
///
/// Success returns the literal result string from the remote procedure,
/// which becomes the uniform response message verbatim.
#[derive(Debug, Clone)]
pub struct RpcLogTransport {
    addr: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    method: &'static str,
    params: RpcParams<'a>,
}

#[derive(Serialize)]
struct RpcParams<'a> {
    name: &'a str,
    data: &'a str,
}

#[derive(Deserialize)]
struct RpcReply {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl RpcLogTransport {
    /// `addr` is a host:port pair, e.g. `logger-service:5001`.
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn call(&self, event: &LogEvent) -> Result<String, TransportError> {
        let stream = TcpStream::connect(&self.addr)
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        let mut framed = Framed::new(stream, LinesCodec::new_with_max_length(MAX_LINE_BYTES));

        let request = serde_json::to_string(&RpcRequest {
            method: LOG_INFO_METHOD,
            params: RpcParams {
                name: &event.name,
                data: &event.data,
            },
        })
        .map_err(|e| TransportError::Serialization(e.to_string()))?;

        framed
            .send(request)
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let line = framed
            .next()
            .await
            .ok_or_else(|| TransportError::Connection("connection closed before reply".into()))?
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let reply: RpcReply =
            serde_json::from_str(&line).map_err(|e| TransportError::Serialization(e.to_string()))?;

        match (reply.result, reply.error) {
            (_, Some(error)) => Err(TransportError::Call(error)),
            (Some(result), None) => Ok(result),
            (None, None) => Err(TransportError::Call("empty reply".into())),
        }
    }
}

#[async_trait]
impl LogTransport for RpcLogTransport {
    fn name(&self) -> &'static str {
        "rpc"
    }

    async fn write(&self, event: &LogEvent) -> Result<WriteAck, TransportError> {
        debug!(addr = %self.addr, name = %event.name, "forwarding log entry over RPC");
        let result = tokio::time::timeout(self.timeout, self.call(event))
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))??;
        Ok(WriteAck::new(result))
    }
}
