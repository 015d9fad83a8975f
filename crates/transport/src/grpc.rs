use std::time::Duration;

use async_trait::async_trait;
use switchyard_core::LogEvent;
use switchyard_proto::{Log, LogRequest, LogServiceClient};
use tracing::debug;

use crate::DEFAULT_TIMEOUT;
use crate::error::TransportError;
use crate::log::{LogTransport, WriteAck};

/// Log write adapter speaking gRPC: `LogService.Write` on the log store's
/// gRPC front door.
///
/// The channel is dialed per call, mirroring the other adapters'
/// connection-per-request behavior; all of it runs under one deadline.
#[derive(Debug, Clone)]
pub struct GrpcLogTransport {
    endpoint: String,
    timeout: Duration,
}

impl GrpcLogTransport {
    /// `endpoint` is a full URI, e.g. `http://logger-service:50001`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn call(&self, event: &LogEvent) -> Result<String, TransportError> {
        let mut client = LogServiceClient::connect(self.endpoint.clone())
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let request = tonic::Request::new(LogRequest {
            log_entry: Some(Log {
                name: event.name.clone(),
                data: event.data.clone(),
            }),
        });

        let response = client
            .write(request)
            .await
            .map_err(|status| TransportError::Call(status.message().to_owned()))?;

        Ok(response.into_inner().result)
    }
}

#[async_trait]
impl LogTransport for GrpcLogTransport {
    fn name(&self) -> &'static str {
        "grpc"
    }

    async fn write(&self, event: &LogEvent) -> Result<WriteAck, TransportError> {
        debug!(endpoint = %self.endpoint, name = %event.name, "forwarding log entry over gRPC");
        let result = tokio::time::timeout(self.timeout, self.call(event))
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))??;
        Ok(WriteAck::with_detail("Logged via GRPC", result))
    }
}

#[cfg(test)]
mod tests {
    use switchyard_proto::{LogResponse, LogService, LogServiceServer};
    use tokio_stream::wrappers::TcpListenerStream;
    use tonic::transport::Server;
    use tonic::{Request, Response, Status};

    use super::*;

    struct StubLogService;

    #[tonic::async_trait]
    impl LogService for StubLogService {
        async fn write(
            &self,
            request: Request<LogRequest>,
        ) -> Result<Response<LogResponse>, Status> {
            let entry = request
                .into_inner()
                .log_entry
                .ok_or_else(|| Status::invalid_argument("empty payload"))?;
            Ok(Response::new(LogResponse {
                result: format!("wrote {}", entry.name),
            }))
        }
    }

    async fn spawn_grpc_stub() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(
            Server::builder()
                .add_service(LogServiceServer::new(StubLogService))
                .serve_with_incoming(TcpListenerStream::new(listener)),
        );
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn write_carries_result_as_detail() {
        let endpoint = spawn_grpc_stub().await;
        let transport = GrpcLogTransport::new(endpoint);

        let ack = transport
            .write(&LogEvent::new("login", "user 42"))
            .await
            .unwrap();

        assert_eq!(ack, WriteAck::with_detail("Logged via GRPC", "wrote login"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_connection_error() {
        let transport = GrpcLogTransport::new("http://127.0.0.1:9")
            .with_timeout(Duration::from_millis(500));
        let err = transport
            .write(&LogEvent::new("login", "x"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TransportError::Connection(_) | TransportError::Timeout(_)
        ));
    }
}
