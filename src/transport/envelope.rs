//! Response envelope classification.
//!
//! The service has no consistent top-level schema: failures come back as
//! `{"detail": ..}`, `{"error": ..}`, `{"comment": ..}`, `{"status": "Error .."}` or
//! `{"force_login": true}`, sometimes with a 200 status. Each decoded body is classified
//! exactly once here, and callers only ever see `Ok(value)` or a typed [`Error`].

use crate::{Error, Result};
use serde_json::{Map, Value};

/// Keys that may accompany a `comment` in a WebSocket/neo protocol error.
const COMMENT_ENVELOPE_KEYS: &[&str] = &["command", "comment", "request_id", "error_code"];

/// A decoded response body, classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Success(Value),
    /// `{"force_login": true}`
    ForceLogin,
    /// `{"detail": ...}`
    Detail(String),
    /// `{"error": ...}` with a non-null value
    ErrorMessage(String),
    /// `{"command": "neo_error", "comment": ...}` or a bare `{"comment": "..."}`
    Comment(String),
    /// `{"status": "Error ..."}`
    StatusError(String),
    /// `{"abort": true}` outside the streaming chat path
    Abort,
}

impl Envelope {
    pub fn classify(value: Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Envelope::Success(value);
        };

        if obj.get("force_login").and_then(Value::as_bool) == Some(true) {
            return Envelope::ForceLogin;
        }
        if let Some(detail) = obj.get("detail").filter(|d| !d.is_null()) {
            return Envelope::Detail(message_of(detail));
        }
        if obj.get("command").and_then(Value::as_str) == Some("neo_error") {
            let comment = obj
                .get("comment")
                .map(message_of)
                .unwrap_or_else(|| "neo_error".to_string());
            return Envelope::Comment(comment);
        }
        if let Some(comment) = bare_comment(obj) {
            return Envelope::Comment(comment);
        }
        if let Some(error) = obj.get("error").filter(|e| !e.is_null()) {
            return Envelope::ErrorMessage(message_of(error));
        }
        if let Some(status) = obj.get("status").and_then(Value::as_str) {
            if status.starts_with("Error") {
                return Envelope::StatusError(status.to_string());
            }
        }
        if obj.get("abort").and_then(Value::as_bool) == Some(true) {
            return Envelope::Abort;
        }

        Envelope::Success(value)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success(_))
    }

    pub fn into_result(self) -> Result<Value> {
        match self {
            Envelope::Success(v) => Ok(v),
            Envelope::ForceLogin => Err(Error::authentication("login required")),
            Envelope::Detail(d) => Err(Error::authentication(d)),
            Envelope::ErrorMessage(m) | Envelope::Comment(m) | Envelope::StatusError(m) => {
                Err(Error::server(m))
            }
            Envelope::Abort => Err(Error::filtered()),
        }
    }
}

/// A `comment` is only an error when it is text and nothing but protocol bookkeeping
/// surrounds it. `{"comment": {..}}` is a comment record.
fn bare_comment(obj: &Map<String, Value>) -> Option<String> {
    let comment = obj.get("comment")?.as_str()?;
    obj.keys()
        .all(|k| COMMENT_ENVELOPE_KEYS.contains(&k.as_str()))
        .then(|| comment.to_string())
}

/// Render an error payload as a message: strings verbatim, `{"message": ..}` unwrapped,
/// anything else as compact JSON.
pub(crate) fn message_of(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Object(o) => match o.get("message") {
            Some(Value::String(s)) => s.clone(),
            _ => v.to_string(),
        },
        other => other.to_string(),
    }
}
