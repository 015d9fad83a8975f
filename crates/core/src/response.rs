use serde::{Deserialize, Serialize};

/// The single response shape every transport adapter must produce,
/// regardless of native protocol.
///
/// Invariant: `error == false` means the caller may treat the request as
/// succeeded; `error == true` always carries a human-readable message and
/// never leaks raw downstream error text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformResponse {
    pub error: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl UniformResponse {
    /// A successful response with no data.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            error: false,
            message: message.into(),
            data: None,
        }
    }

    /// A successful response carrying downstream data.
    pub fn ok_with_data(message: impl Into<String>, data: ResponseData) -> Self {
        Self {
            error: false,
            message: message.into(),
            data: Some(data),
        }
    }

    /// A failed response. The message is the only error content a caller
    /// ever sees.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            data: None,
        }
    }
}

/// The known downstream payload shapes.
///
/// `Record` holds an opaque JSON document (e.g. the credential store's user
/// record) passed through verbatim; the gateway never inspects its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    Text(String),
    Record(serde_json::Value),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_omits_data_field() {
        let json = serde_json::to_string(&UniformResponse::ok("Logged")).unwrap();
        assert_eq!(json, r#"{"error":false,"message":"Logged"}"#);
    }

    #[test]
    fn record_data_round_trips_verbatim() {
        let user = serde_json::json!({"id": 7, "email": "a@b.c", "active": 1});
        let resp =
            UniformResponse::ok_with_data("Authenticated!", ResponseData::Record(user.clone()));
        let back: UniformResponse =
            serde_json::from_str(&serde_json::to_string(&resp).unwrap()).unwrap();
        assert_eq!(back.data, Some(ResponseData::Record(user)));
    }

    #[test]
    fn text_data_deserializes_as_text() {
        let back: UniformResponse =
            serde_json::from_str(r#"{"error":false,"message":"ok","data":"done"}"#).unwrap();
        assert_eq!(back.data, Some(ResponseData::Text("done".into())));
    }

    #[test]
    fn failure_sets_error_flag() {
        let resp = UniformResponse::failure("invalid action");
        assert!(resp.error);
        assert_eq!(resp.message, "invalid action");
    }
}
