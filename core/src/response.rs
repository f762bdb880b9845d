//! Normalized outcome of one API call.
//!
//! # Design
//! Success versus failure is decided once, in `Response::from_http`, instead
//! of every caller probing the body for `error`/`errors` keys. A failure
//! still carries the parsed body and the raw text so callers can dig into
//! the service's own error vocabulary, which this crate does not interpret.

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::http::HttpResponse;

/// Status used for failures where no HTTP response was received.
pub const NO_STATUS: u16 = 0;

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// 2xx without an error marker. `body` is `None` when the payload was
    /// empty or not valid JSON.
    Success {
        status: u16,
        body: Option<Value>,
        token: Option<String>,
    },
    /// Non-2xx status, an error marker in the body, or no response at all
    /// (`status == NO_STATUS`).
    Failure {
        status: u16,
        message: String,
        body: Option<Value>,
        raw: String,
    },
}

impl Response {
    /// Classify a raw response. `expects_token` selects the authentication
    /// shape, where a session token is read from the body.
    pub fn from_http(response: HttpResponse, expects_token: bool) -> Self {
        let status = response.status;
        let body = parse_body(&response.body);

        let marked = body.as_ref().is_some_and(has_error_marker);
        if !(200..300).contains(&status) || marked {
            let message = body
                .as_ref()
                .and_then(failure_message)
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Response::Failure {
                status,
                message,
                body,
                raw: response.body,
            };
        }

        let token = if expects_token {
            body.as_ref().and_then(extract_token)
        } else {
            None
        };

        Response::Success {
            status,
            body,
            token,
        }
    }

    /// A failure produced before or instead of an HTTP exchange.
    pub fn local_failure(message: impl Into<String>) -> Self {
        let message = message.into();
        let body = json!({ "error": message });
        let raw = body.to_string();
        Response::Failure {
            status: NO_STATUS,
            message,
            body: Some(body),
            raw,
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Response::Success { status, .. } | Response::Failure { status, .. } => *status,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. })
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            Response::Success { body, .. } | Response::Failure { body, .. } => body.as_ref(),
        }
    }

    pub fn into_body(self) -> Option<Value> {
        match self {
            Response::Success { body, .. } | Response::Failure { body, .. } => body,
        }
    }

    /// Session token from an `authenticate` response.
    pub fn token(&self) -> Option<&str> {
        match self {
            Response::Success { token, .. } => token.as_deref(),
            Response::Failure { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Response::Success { .. } => None,
            Response::Failure { message, .. } => Some(message),
        }
    }

    /// Deserialize the body into `T`. A missing body deserializes as `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match self.body() {
            Some(body) => T::deserialize(body),
            None => T::deserialize(&Value::Null),
        }
    }
}

fn parse_body(raw: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        return None;
    }
    serde_json::from_str(raw).ok()
}

/// Whether the body carries a non-empty `error` or `errors` key.
fn has_error_marker(body: &Value) -> bool {
    body.as_object().is_some_and(|object| {
        ["error", "errors"]
            .iter()
            .any(|key| object.get(*key).is_some_and(is_marker))
    })
}

/// `null`, `false` and empty values mean "no error".
fn is_marker(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

/// First of `error`, `message`, then the first `errors` entry that reads
/// as text.
fn failure_message(body: &Value) -> Option<String> {
    let object = body.as_object()?;
    let marked = |key: &str| object.get(key).filter(|v| is_marker(v));
    marked("error")
        .and_then(describe)
        .or_else(|| object.get("message").and_then(Value::as_str).map(str::to_string))
        .or_else(|| {
            marked("errors").and_then(|errors| match errors {
                Value::Object(map) => map.values().find_map(describe),
                other => describe(other),
            })
        })
}

fn describe(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => lookup(map, "message").and_then(describe),
        Value::Array(items) => items.iter().find_map(describe),
        _ => None,
    }
}

fn lookup<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v)
}

fn extract_token(body: &Value) -> Option<String> {
    let map = body.as_object()?;
    lookup(map, "token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
