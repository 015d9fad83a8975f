use std::convert::Infallible;
use std::sync::Arc;

use futures::StreamExt;
use lapin::Connection;
use lapin::message::Delivery;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicNackOptions, QueueBindOptions, QueueDeclareOptions,
};
use lapin::types::FieldTable;
use switchyard_core::LogEvent;
use switchyard_transport::LogTransport;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::LOGS_EXCHANGE;
use crate::emitter::declare_logs_exchange;
use crate::error::BusError;

/// Delivery guarantee for the relay step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AckMode {
    /// Broker auto-ack: a message counts as handled the instant it is
    /// delivered, before the relay runs. At-most-once; a crash between
    /// delivery and relay loses the message.
    #[default]
    Auto,
    /// Manual ack after the relay succeeds; nack without requeue on
    /// failure so a dead-letter policy can catch it. At-least-once.
    OnRelay,
}

/// Tuning knobs for a [`Consumer`].
#[derive(Debug, Clone)]
pub struct ConsumerOptions {
    /// Upper bound on concurrent in-flight relays. Deliveries past the
    /// bound wait for a permit instead of spawning without limit.
    pub max_in_flight: usize,
    pub ack_mode: AckMode,
}

impl Default for ConsumerOptions {
    fn default() -> Self {
        Self {
            max_in_flight: 64,
            ack_mode: AckMode::Auto,
        }
    }
}

/// What to do with one delivered message body.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Disposition {
    /// A well-formed event that should reach the log sink.
    Relay(LogEvent),
    /// A well-formed event filtered out (authentication noise).
    Skip,
    /// Not a decodable event; logged and dropped.
    Invalid,
}

pub(crate) fn classify(body: &[u8]) -> Disposition {
    match serde_json::from_slice::<LogEvent>(body) {
        // Authentication events are not relayed to the generic log sink.
        Ok(event) if event.name == "auth" => Disposition::Skip,
        Ok(event) => Disposition::Relay(event),
        Err(_) => Disposition::Invalid,
    }
}

/// Drains matching events from the topic exchange and relays each to the
/// log sink.
///
/// Each consumer owns one anonymous, exclusive, auto-deleting queue for its
/// lifetime; exclusivity is a correctness requirement, not an optimization.
/// The delivery loop is single-threaded, but relays run as spawned tasks
/// bounded by a semaphore, so relay order is not guaranteed to match
/// delivery order.
pub struct Consumer {
    conn: Arc<Connection>,
    sink: Arc<dyn LogTransport>,
    options: ConsumerOptions,
}

impl Consumer {
    pub async fn new(
        conn: Arc<Connection>,
        sink: Arc<dyn LogTransport>,
        options: ConsumerOptions,
    ) -> Result<Self, BusError> {
        declare_logs_exchange(&conn).await?;
        Ok(Self {
            conn,
            sink,
            options,
        })
    }

    /// Consume until the delivery channel itself closes.
    ///
    /// Never returns on success; the `ChannelClosed` error means the caller
    /// should restart the whole bootstrap + listen sequence rather than
    /// resume in place. Per-message decode and relay failures are recovered
    /// locally and never terminate the loop.
    pub async fn listen(&self, patterns: &[&str]) -> Result<Infallible, BusError> {
        let channel = self.conn.create_channel().await?;

        let queue = channel
            .queue_declare(
                "",
                QueueDeclareOptions {
                    exclusive: true,
                    auto_delete: true,
                    ..QueueDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await?;

        for pattern in patterns {
            channel
                .queue_bind(
                    queue.name().as_str(),
                    LOGS_EXCHANGE,
                    pattern,
                    QueueBindOptions::default(),
                    FieldTable::default(),
                )
                .await?;
        }

        let auto_ack = self.options.ack_mode == AckMode::Auto;
        let mut deliveries = channel
            .basic_consume(
                queue.name().as_str(),
                "",
                BasicConsumeOptions {
                    no_ack: auto_ack,
                    ..BasicConsumeOptions::default()
                },
                FieldTable::default(),
            )
            .await?;

        info!(
            exchange = LOGS_EXCHANGE,
            queue = %queue.name(),
            ?patterns,
            "waiting for messages"
        );

        let limiter = Arc::new(Semaphore::new(self.options.max_in_flight));

        while let Some(delivery) = deliveries.next().await {
            let delivery = delivery?;
            self.handle_delivery(delivery, &limiter).await;
        }

        Err(BusError::ChannelClosed)
    }

    async fn handle_delivery(&self, delivery: Delivery, limiter: &Arc<Semaphore>) {
        let manual_ack = self.options.ack_mode == AckMode::OnRelay;

        let event = match classify(&delivery.data) {
            Disposition::Relay(event) => event,
            Disposition::Skip => {
                debug!("discarding authentication event");
                if manual_ack {
                    settle(&delivery, true).await;
                }
                return;
            }
            Disposition::Invalid => {
                warn!("discarding undecodable message body");
                if manual_ack {
                    settle(&delivery, false).await;
                }
                return;
            }
        };

        // Semaphore is never closed, so acquire only fails if it were.
        let Ok(permit) = Arc::clone(limiter).acquire_owned().await else {
            return;
        };

        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            let _permit = permit;
            let relayed = match sink.write(&event).await {
                Ok(_) => true,
                Err(e) => {
                    // Logged, never retried, never surfaced to the broker
                    // beyond the nack below.
                    warn!(error = %e, name = %event.name, "relay to log sink failed");
                    false
                }
            };
            if manual_ack {
                settle(&delivery, relayed).await;
            }
        });
    }
}

/// Ack or nack a delivery, logging a failed settlement rather than
/// propagating it: the consume loop must survive per-message trouble.
async fn settle(delivery: &Delivery, ack: bool) {
    let outcome = if ack {
        delivery.ack(BasicAckOptions::default()).await
    } else {
        delivery
            .nack(BasicNackOptions {
                requeue: false,
                ..BasicNackOptions::default()
            })
            .await
    };
    if let Err(e) = outcome {
        warn!(error = %e, "broker acknowledgment failed");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use switchyard_transport::{TransportError, WriteAck};

    use super::*;

    struct RecordingSink {
        relayed: Mutex<Vec<LogEvent>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                relayed: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LogTransport for RecordingSink {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn write(&self, event: &LogEvent) -> Result<WriteAck, TransportError> {
            self.relayed.lock().unwrap().push(event.clone());
            Ok(WriteAck::new("Logged"))
        }
    }

    #[test]
    fn auth_events_are_skipped() {
        let body = serde_json::to_vec(&LogEvent::new("auth", "x")).unwrap();
        assert_eq!(classify(&body), Disposition::Skip);
    }

    #[test]
    fn other_events_are_relayed() {
        let body = serde_json::to_vec(&LogEvent::new("login", "y")).unwrap();
        assert_eq!(
            classify(&body),
            Disposition::Relay(LogEvent::new("login", "y"))
        );
    }

    #[test]
    fn garbage_is_invalid_not_fatal() {
        assert_eq!(classify(b"not json at all"), Disposition::Invalid);
        assert_eq!(classify(br#"{"name": 7}"#), Disposition::Invalid);
    }

    #[tokio::test]
    async fn only_non_auth_events_reach_the_sink() {
        // The filter rule from the delivery pipeline: an auth event
        // followed by a login event relays only the login.
        let sink = RecordingSink::new();
        let stream = [
            serde_json::to_vec(&LogEvent::new("auth", "x")).unwrap(),
            serde_json::to_vec(&LogEvent::new("login", "y")).unwrap(),
        ];

        for body in &stream {
            if let Disposition::Relay(event) = classify(body) {
                sink.write(&event).await.unwrap();
            }
        }

        let relayed = sink.relayed.lock().unwrap();
        assert_eq!(relayed.as_slice(), &[LogEvent::new("login", "y")]);
    }

    #[test]
    fn default_options_are_bounded_at_most_once() {
        let options = ConsumerOptions::default();
        assert_eq!(options.ack_mode, AckMode::Auto);
        assert_eq!(options.max_in_flight, 64);
    }
}
