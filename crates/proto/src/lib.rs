//! Generated protobuf/gRPC types for the `logs.v1` package.
//!
//! The client half is used by the gateway's gRPC transport adapter; the
//! server half exists for the log store's front door and for test stubs.

pub mod logs {
    tonic::include_proto!("logs.v1");
}

pub use logs::log_service_client::LogServiceClient;
pub use logs::log_service_server::{LogService, LogServiceServer};
pub use logs::{Log, LogRequest, LogResponse};
