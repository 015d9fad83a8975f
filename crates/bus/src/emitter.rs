use std::sync::Arc;

use async_trait::async_trait;
use lapin::options::{BasicPublishOptions, ExchangeDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Connection, ExchangeKind};
use switchyard_core::{LogEvent, Severity};
use switchyard_transport::{LogTransport, TransportError, WriteAck};
use tracing::debug;

use crate::LOGS_EXCHANGE;
use crate::error::BusError;

/// Declare the durable `logs_topic` exchange on a throwaway channel.
///
/// Declaration is idempotent: a no-op when the exchange already exists
/// with matching attributes. Both emitter and consumer call this on
/// construction so neither cares which process starts first.
pub(crate) async fn declare_logs_exchange(conn: &Connection) -> Result<(), BusError> {
    let channel = conn.create_channel().await?;
    channel
        .exchange_declare(
            LOGS_EXCHANGE,
            ExchangeKind::Topic,
            ExchangeDeclareOptions {
                durable: true,
                ..ExchangeDeclareOptions::default()
            },
            FieldTable::default(),
        )
        .await?;
    Ok(())
}

/// Publishes severity-tagged events onto the topic exchange.
///
/// Publishing is fire-and-forget: non-mandatory, non-immediate, no consumer
/// acknowledgment awaited. The broker silently drops the message if no
/// queue is bound, which is accepted behavior. Each publish opens a fresh
/// channel on the shared connection and closes it again.
pub struct Emitter {
    conn: Arc<Connection>,
}

impl Emitter {
    pub async fn new(conn: Arc<Connection>) -> Result<Self, BusError> {
        declare_logs_exchange(&conn).await?;
        Ok(Self { conn })
    }

    /// Publish one event at the given severity.
    pub async fn publish(&self, event: &LogEvent, severity: Severity) -> Result<(), BusError> {
        let body = serde_json::to_vec(event)?;
        debug!(
            name = %event.name,
            routing_key = severity.routing_key(),
            "publishing event"
        );

        let channel = self.conn.create_channel().await?;
        channel
            .basic_publish(
                LOGS_EXCHANGE,
                severity.routing_key(),
                BasicPublishOptions::default(),
                &body,
                BasicProperties::default().with_content_type("application/json".into()),
            )
            .await?;

        Ok(())
    }
}

/// Log write adapter that routes the gateway's `log` action through the
/// event bus instead of a synchronous downstream call.
pub struct AmqpLogTransport {
    emitter: Emitter,
}

impl AmqpLogTransport {
    pub fn new(emitter: Emitter) -> Self {
        Self { emitter }
    }
}

#[async_trait]
impl LogTransport for AmqpLogTransport {
    fn name(&self) -> &'static str {
        "bus"
    }

    async fn write(&self, event: &LogEvent) -> Result<WriteAck, TransportError> {
        self.emitter
            .publish(event, Severity::Info)
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        Ok(WriteAck::new("Logged via queue"))
    }
}
