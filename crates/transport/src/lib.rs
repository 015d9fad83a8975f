//! Transport adapters for the Switchyard gateway.
//!
//! Each downstream service speaks its own protocol and success/error
//! contract; the adapters here perform the protocol-specific call and hand
//! back a protocol-neutral result the dispatcher can normalize. Three log
//! write adapters (HTTP, framed binary RPC, gRPC) implement the same
//! [`LogTransport`] trait, so the deployed transport is a configuration
//! choice invisible to the dispatcher.

pub mod auth;
pub mod error;
pub mod grpc;
pub mod http;
pub mod log;
pub mod mail;
pub mod rpc;

pub use auth::{AuthClient, AuthOutcome, HttpAuthClient};
pub use error::TransportError;
pub use grpc::GrpcLogTransport;
pub use http::HttpLogTransport;
pub use log::{LogTransport, WriteAck};
pub use mail::{HttpMailClient, MailClient};
pub use rpc::RpcLogTransport;

use std::time::Duration;

/// Client-side deadline applied to every downstream round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Build the shared reqwest client used by the HTTP adapters.
pub fn default_http_client() -> Result<reqwest::Client, TransportError> {
    reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .map_err(|e| TransportError::Configuration(e.to_string()))
}
