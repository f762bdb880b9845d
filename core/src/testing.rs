//! In-memory transport for unit tests.

use std::cell::RefCell;

use crate::client::EazyScriptsClient;
use crate::config::ClientConfig;
use crate::http::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// Records every request and answers with a canned reply.
pub(crate) struct RecordingTransport {
    requests: RefCell<Vec<HttpRequest>>,
    reply: Result<(u16, String), String>,
}

impl RecordingTransport {
    pub(crate) fn replying(status: u16, body: &str) -> Self {
        Self {
            requests: RefCell::new(Vec::new()),
            reply: Ok((status, body.to_string())),
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            requests: RefCell::new(Vec::new()),
            reply: Err(message.to_string()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub(crate) fn last(&self) -> HttpRequest {
        self.requests
            .borrow()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

impl HttpTransport for RecordingTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        match &self.reply {
            Ok((status, body)) => Ok(HttpResponse {
                status: *status,
                headers: Vec::new(),
                body: body.clone(),
            }),
            Err(message) => Err(TransportError::Connection(message.clone())),
        }
    }
}

/// Client for tenant `demo` with session token `tok`, answering every
/// request with `status` and `body`.
pub(crate) fn authed_client(status: u16, body: &str) -> EazyScriptsClient<RecordingTransport> {
    let mut client = EazyScriptsClient::new(
        ClientConfig::new("K", "S", "demo"),
        RecordingTransport::replying(status, body),
    )
    .expect("valid test config");
    client.set_token("tok");
    client
}

/// Decode a recorded request body.
pub(crate) fn sent_json(request: &HttpRequest) -> serde_json::Value {
    serde_json::from_str(request.body.as_deref().expect("request has a body"))
        .expect("request body is JSON")
}
