//! Startup connection bootstrapping.
//!
//! Container-orchestrated startup gives no ordering guarantee between a
//! service and its dependencies, so every process dials its dependency
//! through this routine before serving traffic. The whole retry sequence
//! blocks the caller; a connection dropped later is a restart condition,
//! not something this module recovers.

use std::time::Duration;

use lapin::{Connection, ConnectionProperties};
use tracing::{info, warn};

use crate::error::BusError;

/// Delay slept after the failure of 0-based attempt `n`: `n²` seconds.
///
/// Attempts 0 and 1 both sleep at most one second; growth is unbounded
/// beyond that, with total wait capped by the attempt bound alone.
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(u64::from(attempt).pow(2))
}

/// Dial a dependency until it answers or `max_attempts` consecutive
/// failures have accumulated.
///
/// Generic over the dial closure so callers can bootstrap any dependency
/// (and tests can drive it with virtual time).
pub async fn connect_with_backoff<T, E, F, Fut>(
    max_attempts: u32,
    mut dial: F,
) -> Result<T, BusError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut last_error = String::new();

    for attempt in 0..max_attempts {
        match dial().await {
            Ok(connection) => {
                info!(attempt, "dependency reachable");
                return Ok(connection);
            }
            Err(e) => {
                last_error = e.to_string();
                // No sleep after the final failure; nothing follows it.
                if attempt + 1 < max_attempts {
                    let delay = backoff_delay(attempt);
                    warn!(
                        attempt,
                        delay_secs = delay.as_secs(),
                        error = %e,
                        "dependency not yet ready, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    Err(BusError::StartupExhausted {
        attempts: max_attempts,
        last_error,
    })
}

/// Bootstrap the AMQP broker connection.
pub async fn connect_broker(url: &str, max_attempts: u32) -> Result<Connection, BusError> {
    connect_with_backoff(max_attempts, || {
        Connection::connect(url, ConnectionProperties::default())
    })
    .await
}
