//! Per-call request construction and dispatch.
//!
//! # Design
//! A `RequestBuilder` is a throwaway value: the client makes a fresh one for
//! every call, so headers set for one request can never leak into the next.
//! It holds a borrowed `ServiceTarget` (origin plus application keys, fixed
//! when the client is built) and the path, headers and payload for this call.
//!
//! Dispatch never returns `Err`. Anything that stops a request from being
//! sent or answered becomes `Response::Failure` with status `NO_STATUS`.

use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::http::{HttpMethod, HttpRequest, HttpTransport};
use crate::query::Params;
use crate::response::Response;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const AUTHORIZATION: &str = "Authorization";
pub const APPLICATION_KEY_HEADER: &str = "ApplicationKey";
pub const APPLICATION_SECRET_HEADER: &str = "ApplicationSecret";

/// Headers every request starts with.
pub const DEFAULT_HEADERS: [(&str, &str); 1] = [(CONTENT_TYPE, "application/json")];

/// Where requests go and which application is calling.
#[derive(Clone)]
pub struct ServiceTarget {
    base_url: Url,
    application_key: String,
    application_secret: String,
}

impl ServiceTarget {
    pub fn new(
        base_url: Url,
        application_key: impl Into<String>,
        application_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url,
            application_key: application_key.into(),
            application_secret: application_secret.into(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn application_key(&self) -> &str {
        &self.application_key
    }

    pub fn application_secret(&self) -> &str {
        &self.application_secret
    }
}

impl std::fmt::Debug for ServiceTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceTarget")
            .field("base_url", &self.base_url.as_str())
            .field("application_key", &self.application_key)
            .finish_non_exhaustive()
    }
}

/// What travels with the request besides headers.
#[derive(Debug, Default)]
pub enum Payload {
    #[default]
    None,
    /// Appended to the URL as a form-urlencoded query string.
    Query(Params),
    /// Sent verbatim as the request body.
    Json(String),
}

#[derive(Debug)]
pub struct RequestBuilder<'a> {
    target: &'a ServiceTarget,
    path: String,
    segments: Vec<String>,
    headers: Vec<(String, String)>,
    payload: Payload,
    expects_token: bool,
    serialize_error: Option<serde_json::Error>,
}

impl<'a> RequestBuilder<'a> {
    /// Start a request for `path` (leading slash included) with the default headers.
    pub fn new(target: &'a ServiceTarget, path: impl Into<String>) -> Self {
        Self {
            target,
            path: path.into(),
            segments: Vec::new(),
            headers: DEFAULT_HEADERS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            payload: Payload::None,
            expects_token: false,
            serialize_error: None,
        }
    }

    /// Replace the header set entirely.
    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers.clear();
        for (name, value) in headers {
            self.set_header(name.into(), value.into());
        }
        self
    }

    /// Append one path segment after `path`. The value is percent-encoded as
    /// a single segment, so `/`, `?` and `#` inside it stay data. `.` and `..`
    /// are refused when the URL is built; an empty value yields a trailing slash.
    pub fn segment(mut self, value: impl std::fmt::Display) -> Self {
        self.segments.push(value.to_string());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name.into(), value.into());
        self
    }

    pub fn query(mut self, params: Params) -> Self {
        self.payload = Payload::Query(params);
        self
    }

    /// Serialize `body` as the JSON payload. A serialization failure is held
    /// until dispatch, where it becomes a failed `Response`.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        match serde_json::to_string(body) {
            Ok(json) => self.payload = Payload::Json(json),
            Err(e) => self.serialize_error = Some(e),
        }
        self
    }

    /// Use an already-serialized JSON document as the payload.
    pub fn raw_json(mut self, json: impl Into<String>) -> Self {
        self.payload = Payload::Json(json.into());
        self
    }

    /// Mark this as the authentication call, whose response carries the
    /// session token.
    pub fn expect_token(mut self) -> Self {
        self.expects_token = true;
        self
    }

    /// Attach the application keys and, when `as_bearer` is set and a token
    /// is present, `Authorization: Bearer <token>`. Calling this again
    /// replaces what an earlier call set.
    pub fn with_authorization(mut self, token: Option<&str>, as_bearer: bool) -> Self {
        match token {
            Some(token) if as_bearer => {
                self.set_header(AUTHORIZATION.to_string(), format!("Bearer {token}"));
            }
            _ => self.remove_header(AUTHORIZATION),
        }
        let key = self.target.application_key.clone();
        let secret = self.target.application_secret.clone();
        self.set_header(APPLICATION_KEY_HEADER.to_string(), key);
        self.set_header(APPLICATION_SECRET_HEADER.to_string(), secret);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Fully qualified URL for this request, query string included. No I/O.
    pub fn url(&self) -> Result<Url> {
        let base = self.target.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}{}", self.path))?;
        if let Some(dots) = self.segments.iter().find(|s| *s == "." || *s == "..") {
            return Err(Error::Validation(format!("{dots:?} is not a valid path segment")));
        }
        if !self.segments.is_empty() {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| Error::Config(format!("{base} cannot take a path")))?;
            path.pop_if_empty().extend(&self.segments);
        }
        if let Payload::Query(params) = &self.payload {
            if !params.is_empty() {
                url.query_pairs_mut().extend_pairs(params.iter());
            }
        }
        Ok(url)
    }

    /// Produce the request descriptor for `method`.
    pub fn build(self, method: HttpMethod) -> Result<HttpRequest> {
        if let Some(e) = self.serialize_error {
            return Err(e.into());
        }
        let url = self.url()?;
        let body = match self.payload {
            Payload::Json(json) => Some(json),
            Payload::None | Payload::Query(_) => None,
        };
        Ok(HttpRequest {
            method,
            url: url.into(),
            headers: self.headers,
            body,
        })
    }

    pub fn get<T: HttpTransport>(self, transport: &T) -> Response {
        self.dispatch(HttpMethod::Get, transport)
    }

    pub fn post<T: HttpTransport>(self, transport: &T) -> Response {
        self.dispatch(HttpMethod::Post, transport)
    }

    pub fn put<T: HttpTransport>(self, transport: &T) -> Response {
        self.dispatch(HttpMethod::Put, transport)
    }

    fn dispatch<T: HttpTransport>(self, method: HttpMethod, transport: &T) -> Response {
        let expects_token = self.expects_token;
        let path = self.path.clone();

        let request = match self.build(method) {
            Ok(request) => request,
            Err(e) => {
                warn!(%method, %path, error = %e, "request could not be built");
                return Response::local_failure(e.to_string());
            }
        };

        debug!(%method, %path, "dispatching request");
        match transport.send(&request) {
            Ok(http) => {
                let response = Response::from_http(http, expects_token);
                if response.is_success() {
                    debug!(%method, %path, status = response.status(), "request completed");
                } else {
                    warn!(
                        %method,
                        %path,
                        status = response.status(),
                        error = response.error_message().unwrap_or_default(),
                        "request failed"
                    );
                }
                response
            }
            Err(e) => {
                warn!(%method, %path, error = %e, "transport failure");
                Response::local_failure(e.to_string())
            }
        }
    }

    fn set_header(&mut self, name: String, value: String) {
        self.remove_header(&name);
        self.headers.push((name, value));
    }

    fn remove_header(&mut self, name: &str) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    }
}
