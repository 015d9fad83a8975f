use thiserror::Error;

/// Errors raised by the event bus.
#[derive(Debug, Error)]
pub enum BusError {
    /// The broker rejected an operation or the connection failed.
    #[error("broker error: {0}")]
    Broker(#[from] lapin::Error),

    /// An event could not be serialized for publishing.
    #[error("event encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// The delivery stream ended: the underlying channel or connection was
    /// torn down. Callers restart the whole bootstrap + listen sequence.
    #[error("message channel closed")]
    ChannelClosed,

    /// The dependency never became reachable within the attempt bound.
    /// Fatal: the process exits and relies on external restart.
    #[error("dependency not reachable after {attempts} attempts: {last_error}")]
    StartupExhausted { attempts: u32, last_error: String },
}
