use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::request::LogPayload;

/// A severity-tagged operational event published on the topic exchange.
///
/// `created_at` is assigned by the log store, not by producers, so it is
/// omitted from the wire until set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    pub name: String,
    pub data: String,
    #[serde(
        rename = "createdAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl LogEvent {
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            created_at: None,
        }
    }
}

impl From<LogPayload> for LogEvent {
    fn from(payload: LogPayload) -> Self {
        Self::new(payload.name, payload.data)
    }
}

/// Event severity, mapped one-to-one onto topic-exchange routing keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// The dot-segmented routing key used when publishing at this severity.
    pub fn routing_key(self) -> &'static str {
        match self {
            Self::Info => "log.INFO",
            Self::Warning => "log.WARNING",
            Self::Error => "log.ERROR",
        }
    }

    /// Every routing key a catch-all consumer should bind.
    pub fn all_routing_keys() -> [&'static str; 3] {
        [
            Self::Info.routing_key(),
            Self::Warning.routing_key(),
            Self::Error.routing_key(),
        ]
    }
}
