use switchyard_core::EnvelopeError;
use thiserror::Error;

/// Dispatch failures, already classified for the HTTP boundary.
///
/// The `Display` text of each variant is the complete user-visible error
/// content; downstream driver/stack detail only ever reaches local logs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// Malformed or incomplete input; never reaches the network.
    /// 400-equivalent.
    #[error(transparent)]
    Invalid(#[from] EnvelopeError),

    /// The credential store rejected the credentials. 401-equivalent.
    #[error("{0}")]
    AuthRejected(String),

    /// Network failure, timeout, or unexpected status from a downstream.
    /// 502-equivalent: a gateway-side classification, never the
    /// downstream's literal status or error text.
    #[error("{0}")]
    Upstream(String),
}
