use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire shape of a gateway submission: an action discriminant plus one
/// payload field per known action. Exactly one payload is meaningful for a
/// given action; the others are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Which downstream capability this request targets.
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<LogPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail: Option<MailPayload>,
}

/// Credentials forwarded to the credential store. Transient; never
/// persisted by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthPayload {
    pub email: String,
    pub password: String,
}

/// A log entry as submitted by a client. `name` doubles as the filtering
/// key in the event consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogPayload {
    pub name: String,
    pub data: String,
}

/// An outbound mail request. All four fields must be non-blank; the
/// gateway validates before any network hop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailPayload {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub message: String,
}

impl MailPayload {
    /// Check that every field is non-empty after trimming whitespace.
    pub fn validate(&self) -> Result<(), EnvelopeError> {
        for (field, value) in [
            ("from", &self.from),
            ("to", &self.to),
            ("subject", &self.subject),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(EnvelopeError::BlankField(field));
            }
        }
        Ok(())
    }
}

/// A validated request: the closed set of actions the gateway knows how to
/// route. Converting from [`RequestEnvelope`] is the only way to build one,
/// so an unknown action can never reach the dispatch match.
#[derive(Debug, Clone)]
pub enum Request {
    Auth(AuthPayload),
    Log(LogPayload),
    Mail(MailPayload),
}

/// Rejections raised while turning an envelope into a [`Request`].
///
/// These are client errors: the envelope never reaches the network.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    /// The action discriminant is not one of the known values.
    #[error("invalid action")]
    UnknownAction,

    /// The action was recognized but its payload field was absent.
    #[error("missing {0} payload")]
    MissingPayload(&'static str),

    /// A required payload field was empty or whitespace-only.
    #[error("missing or blank field: {0}")]
    BlankField(&'static str),
}

impl TryFrom<RequestEnvelope> for Request {
    type Error = EnvelopeError;

    fn try_from(envelope: RequestEnvelope) -> Result<Self, Self::Error> {
        match envelope.action.as_str() {
            "auth" => envelope
                .auth
                .map(Request::Auth)
                .ok_or(EnvelopeError::MissingPayload("auth")),
            "log" => envelope
                .log
                .map(Request::Log)
                .ok_or(EnvelopeError::MissingPayload("log")),
            "mail" => envelope
                .mail
                .map(Request::Mail)
                .ok_or(EnvelopeError::MissingPayload("mail")),
            _ => Err(EnvelopeError::UnknownAction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail() -> MailPayload {
        MailPayload {
            from: "ops@example.com".into(),
            to: "admin@example.com".into(),
            subject: "status".into(),
            message: "all quiet".into(),
        }
    }

    #[test]
    fn unknown_action_is_rejected() {
        let envelope = RequestEnvelope {
            action: "reboot".into(),
            ..RequestEnvelope::default()
        };
        let err = Request::try_from(envelope).unwrap_err();
        assert_eq!(err, EnvelopeError::UnknownAction);
        assert_eq!(err.to_string(), "invalid action");
    }

    #[test]
    fn known_action_with_missing_payload_is_rejected() {
        let envelope = RequestEnvelope {
            action: "mail".into(),
            ..RequestEnvelope::default()
        };
        assert_eq!(
            Request::try_from(envelope).unwrap_err(),
            EnvelopeError::MissingPayload("mail")
        );
    }

    #[test]
    fn auth_envelope_converts() {
        let envelope = RequestEnvelope {
            action: "auth".into(),
            auth: Some(AuthPayload {
                email: "a@b.c".into(),
                password: "secret".into(),
            }),
            ..RequestEnvelope::default()
        };
        assert!(matches!(Request::try_from(envelope), Ok(Request::Auth(_))));
    }

    #[test]
    fn extra_payload_fields_are_ignored() {
        // A log envelope may also carry a mail payload; only the one named
        // by the action matters.
        let envelope = RequestEnvelope {
            action: "log".into(),
            log: Some(LogPayload {
                name: "event".into(),
                data: "x".into(),
            }),
            mail: Some(mail()),
            ..RequestEnvelope::default()
        };
        assert!(matches!(Request::try_from(envelope), Ok(Request::Log(_))));
    }

    #[test]
    fn blank_mail_fields_fail_validation() {
        for field in ["from", "to", "subject", "message"] {
            let mut payload = mail();
            match field {
                "from" => payload.from = "   ".into(),
                "to" => payload.to = String::new(),
                "subject" => payload.subject = "\t".into(),
                _ => payload.message = " \n ".into(),
            }
            assert_eq!(
                payload.validate().unwrap_err(),
                EnvelopeError::BlankField(field)
            );
        }
    }

    #[test]
    fn valid_mail_passes_validation() {
        assert!(mail().validate().is_ok());
    }

    #[test]
    fn envelope_deserializes_from_client_json() {
        let envelope: RequestEnvelope = serde_json::from_str(
            r#"{"action":"auth","auth":{"email":"a@b.c","password":"pw"}}"#,
        )
        .unwrap();
        assert_eq!(envelope.action, "auth");
        assert!(envelope.log.is_none());
    }
}
