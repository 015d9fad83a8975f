use std::time::Duration;

use thiserror::Error;

/// Errors raised by transport adapters and downstream clients.
///
/// These never reach gateway callers verbatim: the dispatcher logs them and
/// re-expresses every variant as a gateway-phrased uniform response.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The downstream did not respond within the client-side deadline.
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    /// A network or transport-level failure (dial, reset, closed stream).
    #[error("connection error: {0}")]
    Connection(String),

    /// The downstream answered with a status outside its success contract.
    #[error("unexpected status {0}")]
    UnexpectedStatus(u16),

    /// The remote call completed but reported a failure of its own.
    #[error("remote call failed: {0}")]
    Call(String),

    /// A request or reply body could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The adapter was built with unusable settings.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(crate::DEFAULT_TIMEOUT)
        } else if err.is_decode() {
            Self::Serialization(err.to_string())
        } else {
            Self::Connection(err.to_string())
        }
    }
}
