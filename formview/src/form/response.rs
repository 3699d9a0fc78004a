use serde::Deserialize;
use serde_json::Value;

use super::events::FormEvent;
use super::form_view::FormView;
use crate::base::dom::Dom;
use crate::base::translate::UNEXPECTED_ERROR;
use crate::base::view::View;
use crate::FormError;

/// Response of a completed submission.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub ok: bool,
    pub text: String,
    // `text` parsed as JSON, when it is JSON
    pub body: Option<Value>,
}

impl HttpResponse {
    pub fn new(status: u16, text: &str) -> Self {
        Self {
            status,
            ok: (200..300).contains(&status),
            text: text.to_string(),
            body: serde_json::from_str(text).ok(),
        }
    }

    pub fn json(status: u16, body: Value) -> Self {
        Self::new(status, &body.to_string())
    }

    /// Error flagged by a well-formed body, e.g. `{"error": "duplicate"}`.
    pub fn business_error(&self) -> Option<String> {
        self.body
            .as_ref()
            .and_then(|body| body.get("error"))
            .and_then(truthy_message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError(pub String);

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub type SubmitOutcome = Result<HttpResponse, TransportError>;

#[derive(Deserialize)]
struct ErrorPayload {
    error: Option<Value>,
}

/// Error for a response with a non-OK status.
pub fn parse_error_body(res: &HttpResponse) -> FormError {
    match serde_json::from_str::<ErrorPayload>(&res.text) {
        Ok(ErrorPayload { error: Some(error) }) => FormError::Server {
            status: res.status,
            message: truthy_message(&error).unwrap_or_default(),
        },
        Ok(ErrorPayload { error: None }) => FormError::MalformedErrorBody {
            status: res.status,
            details: "missing field `error`".to_string(),
        },
        Err(err) => FormError::MalformedErrorBody {
            status: res.status,
            details: err.to_string(),
        },
    }
}

fn truthy_message(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

impl<D: Dom> FormView<D> {
    /// Render the outcome of a submission. Unexpected failures are also
    /// emitted as [`FormEvent::Error`]; rejections carried by a well-formed
    /// body are only shown inline.
    pub fn response(&self, outcome: &SubmitOutcome) {
        let res = match outcome {
            Err(transport) => {
                let err = FormError::Transport(transport.0.clone());
                log::warn!("Submission failed: {}", err);
                self.emit(FormEvent::Error(err));
                self.errors(transport.0.as_str());
                return;
            }
            Ok(res) => res,
        };

        if !res.ok {
            let err = parse_error_body(res);
            log::warn!("Submission rejected: {}", err);
            let message = match err.message() {
                Some(message) => message.to_string(),
                None => self.collaborators().translator.t(UNEXPECTED_ERROR),
            };
            self.emit(FormEvent::Error(err));
            self.errors(message);
            return;
        }

        if let Some(message) = res.business_error() {
            log::debug!("Submission declined: {}", message);
            self.errors(message);
            return;
        }

        self.emit(FormEvent::Success(res.clone()));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_http_response() {
        let res = HttpResponse::new(201, "{\"id\": 1}");
        assert!(res.ok);
        assert_eq!(res.body, Some(json!({"id": 1})));
        assert_eq!(res.business_error(), None);

        let res = HttpResponse::new(500, "<html>oops</html>");
        assert!(!res.ok);
        assert_eq!(res.body, None);

        let res = HttpResponse::json(200, json!({"error": "dup"}));
        assert_eq!(res.business_error(), Some("dup".to_string()));
        for falsy in [json!({"error": ""}), json!({"error": null}), json!({"error": false}), json!({"error": 0})] {
            assert_eq!(HttpResponse::json(200, falsy).business_error(), None);
        }
    }

    #[test]
    fn test_parse_error_body() {
        assert_eq!(
            parse_error_body(&HttpResponse::new(400, "{\"error\":\"bad\"}")),
            FormError::Server {
                status: 400,
                message: "bad".to_string()
            }
        );
        assert!(matches!(
            parse_error_body(&HttpResponse::new(502, "Bad Gateway")),
            FormError::MalformedErrorBody { status: 502, .. }
        ));
        assert!(matches!(
            parse_error_body(&HttpResponse::new(400, "{\"message\":\"x\"}")),
            FormError::MalformedErrorBody { status: 400, .. }
        ));
        assert_eq!(
            parse_error_body(&HttpResponse::new(409, "{\"error\":\"taken\"}")).message(),
            Some("taken")
        );
        assert_eq!(
            parse_error_body(&HttpResponse::new(502, "Bad Gateway")).message(),
            None
        );
    }
}
