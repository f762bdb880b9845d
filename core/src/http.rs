//! HTTP transport types and the injected transport seam.
//!
//! # Design
//! Requests and responses are plain data. The core builds `HttpRequest`
//! values and turns `HttpResponse` values into a `Response`, but the bytes
//! move through whatever implements `HttpTransport`. Connection handling,
//! TLS, timeouts and cancellation all belong to the transport.
//!
//! All fields use owned types (`String`, `Vec`) so a request can be recorded,
//! cloned or handed to another thread without lifetime concerns.

use thiserror::Error;

/// HTTP method for a request. The remote service only uses these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outbound HTTP request described as plain data.
///
/// `url` is fully qualified and already carries the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Look up a header value, comparing names case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Failure to complete an HTTP exchange at all (no status was received).
#[derive(Debug, Error)]
pub enum TransportError {
    /// Could not connect, resolve, negotiate TLS, or the exchange timed out.
    #[error("connection failed: {0}")]
    Connection(String),

    /// A response arrived but its body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Anything that can execute an `HttpRequest`.
///
/// Implementations must return non-2xx statuses as `Ok(HttpResponse)`;
/// `Err` is reserved for exchanges that produced no response.
pub trait HttpTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}
