//! The asynchronous event bus: a durable topic exchange decoupling
//! producers of operational events from the durable log sink.
//!
//! Three pieces live here. The [`bootstrap`] routine dials a dependency
//! under unreliable startup ordering with bounded quadratic backoff. The
//! [`Emitter`] publishes severity-tagged events onto the `logs_topic`
//! exchange, fire-and-forget. The [`Consumer`] binds an ephemeral exclusive
//! queue to a set of routing-key patterns and relays matching events to the
//! log store's HTTP front door through a bounded pool of concurrent tasks.

pub mod bootstrap;
pub mod consumer;
pub mod emitter;
pub mod error;

pub use bootstrap::{backoff_delay, connect_broker, connect_with_backoff};
pub use consumer::{AckMode, Consumer, ConsumerOptions};
pub use emitter::{AmqpLogTransport, Emitter};
pub use error::BusError;

/// Name of the durable topic exchange every emitter and consumer declares.
pub const LOGS_EXCHANGE: &str = "logs_topic";
