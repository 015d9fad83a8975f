//! Core wire types shared by the Switchyard gateway, transports, and bus.
//!
//! Everything here is plain data: the request envelope accepted by the
//! gateway front door, the payloads it carries, the log event that travels
//! over the topic exchange, and the uniform response shape every transport
//! adapter must produce.

pub mod event;
pub mod request;
pub mod response;

pub use event::{LogEvent, Severity};
pub use request::{AuthPayload, EnvelopeError, LogPayload, MailPayload, Request, RequestEnvelope};
pub use response::{ResponseData, UniformResponse};
