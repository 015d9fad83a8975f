use std::sync::Arc;

use switchyard_core::{
    AuthPayload, LogEvent, LogPayload, MailPayload, Request, RequestEnvelope, ResponseData,
    UniformResponse,
};
use switchyard_transport::{AuthClient, AuthOutcome, LogTransport, MailClient};
use tracing::{info, warn};

use crate::error::GatewayError;

/// Routes one request envelope to the matching downstream client and
/// normalizes the result.
///
/// All handles are injected at construction; concurrent `submit` calls
/// share them without locking because the dispatcher holds no mutable
/// state. Exactly one downstream call is made per invocation, and the log
/// path goes through whichever transport adapter deployment configuration
/// selected.
pub struct Dispatcher {
    auth: Arc<dyn AuthClient>,
    mail: Arc<dyn MailClient>,
    log: Arc<dyn LogTransport>,
}

impl Dispatcher {
    pub fn new(
        auth: Arc<dyn AuthClient>,
        mail: Arc<dyn MailClient>,
        log: Arc<dyn LogTransport>,
    ) -> Self {
        Self { auth, mail, log }
    }

    /// Validate the envelope, route it, and produce the uniform response.
    ///
    /// Unknown actions and payload validation failures return before any
    /// network hop.
    pub async fn submit(&self, envelope: RequestEnvelope) -> Result<UniformResponse, GatewayError> {
        match Request::try_from(envelope)? {
            Request::Auth(credentials) => self.authenticate(credentials).await,
            Request::Log(payload) => self.write_log(payload).await,
            Request::Mail(mail) => self.send_mail(mail).await,
        }
    }

    async fn authenticate(
        &self,
        credentials: AuthPayload,
    ) -> Result<UniformResponse, GatewayError> {
        match self.auth.authenticate(&credentials).await {
            Ok(AuthOutcome::Accepted { user }) => {
                info!(email = %credentials.email, "authentication accepted");
                Ok(UniformResponse::ok_with_data(
                    "Authenticated!",
                    ResponseData::Record(user),
                ))
            }
            Ok(AuthOutcome::Denied { message }) => Err(GatewayError::AuthRejected(message)),
            Err(e) => {
                warn!(error = %e, "credential store call failed");
                Err(GatewayError::Upstream("error calling auth service".into()))
            }
        }
    }

    async fn write_log(&self, payload: LogPayload) -> Result<UniformResponse, GatewayError> {
        let event = LogEvent::from(payload);
        match self.log.write(&event).await {
            Ok(ack) => Ok(match ack.detail {
                Some(detail) => {
                    UniformResponse::ok_with_data(ack.message, ResponseData::Text(detail))
                }
                None => UniformResponse::ok(ack.message),
            }),
            Err(e) => {
                warn!(transport = self.log.name(), error = %e, "log write failed");
                Err(GatewayError::Upstream("error calling log service".into()))
            }
        }
    }

    async fn send_mail(&self, mail: MailPayload) -> Result<UniformResponse, GatewayError> {
        // Local validation first: a malformed mail request never costs a
        // network round trip.
        mail.validate()?;

        match self.mail.send(&mail).await {
            Ok(()) => Ok(UniformResponse::ok("Mail sent")),
            Err(e) => {
                warn!(error = %e, to = %mail.to, "mail service call failed");
                Err(GatewayError::Upstream("error calling mail service".into()))
            }
        }
    }
}
