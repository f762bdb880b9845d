//! The API facade: credentials, session token and request plumbing.
//!
//! # Design
//! `EazyScriptsClient` owns its configuration, a transport and the session
//! token. The endpoint catalog lives in `crate::endpoints` as further
//! `impl` blocks on this type; every endpoint builds a fresh
//! `RequestBuilder`, so no header state survives between calls.
//!
//! The token is the only mutable state. `set_token` takes `&mut self`, so
//! swapping it while another call on the same client is in flight requires
//! the caller to add their own synchronization.

use serde::Serialize;
use serde_json::{json, Value};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::HttpTransport;
use crate::query::{Params, SearchQuery};
use crate::request::{RequestBuilder, ServiceTarget};
use crate::response::Response;

pub struct EazyScriptsClient<T> {
    config: ClientConfig,
    target: ServiceTarget,
    transport: T,
    token: Option<String>,
}

impl<T: HttpTransport> EazyScriptsClient<T> {
    /// Bind `config` to `transport`. No request is made.
    pub fn new(config: ClientConfig, transport: T) -> Result<Self> {
        let target = ServiceTarget::new(config.resolve_base_url()?, config.key(), config.secret());
        Ok(Self {
            config,
            target,
            transport,
            token: None,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The session token sent as `Authorization: Bearer`, if one was set.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Use `token` for every subsequent authorized call.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Exchange user credentials for a session token.
    ///
    /// The body is `credentials` with `ApplicationKey`, `ApplicationSecret`
    /// and `Subdomain` filled in where the caller did not supply them. No
    /// bearer token is attached. On success read `Response::token` and pass
    /// it to `set_token`.
    pub fn authenticate<B: Serialize + ?Sized>(&self, credentials: &B) -> Response {
        let defaults = json!({
            "ApplicationKey": self.config.key(),
            "ApplicationSecret": self.config.secret(),
            "Subdomain": self.config.subdomain(),
        });
        let body = match body_with_defaults(defaults, credentials) {
            Ok(body) => body,
            Err(e) => return Response::local_failure(e.to_string()),
        };
        self.request("/account/authenticate")
            .json(&body)
            .expect_token()
            .post(&self.transport)
    }

    pub(crate) fn request(&self, path: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(&self.target, path)
    }

    /// A request carrying the bearer token and application keys.
    pub(crate) fn authorized(&self, path: impl Into<String>) -> RequestBuilder<'_> {
        self.request(path).with_authorization(self.token(), true)
    }

    /// Authorized request whose JSON body is `body` with `defaults` filled in
    /// underneath it.
    pub(crate) fn authorized_json_with_defaults<B: Serialize + ?Sized>(
        &self,
        path: impl Into<String>,
        defaults: Value,
        body: &B,
    ) -> std::result::Result<RequestBuilder<'_>, Response> {
        let body = body_with_defaults(defaults, body)
            .map_err(|e| Response::local_failure(e.to_string()))?;
        Ok(self.authorized(path).json(&body))
    }
}

#[cfg(feature = "ureq-transport")]
impl EazyScriptsClient<crate::transport::UreqTransport> {
    /// Client using the bundled blocking `ureq` transport.
    pub fn with_default_transport(config: ClientConfig) -> Result<Self> {
        Self::new(config, crate::transport::UreqTransport::new())
    }
}

impl<T> std::fmt::Debug for EazyScriptsClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EazyScriptsClient")
            .field("config", &self.config)
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

/// Serialize `body` and, when it is a JSON object, add every key of
/// `defaults` it does not already have. Other JSON values pass through.
pub(crate) fn body_with_defaults<B: Serialize + ?Sized>(
    defaults: Value,
    body: &B,
) -> serde_json::Result<Value> {
    let mut body = serde_json::to_value(body)?;
    if let (Value::Object(map), Value::Object(defaults)) = (&mut body, defaults) {
        for (key, value) in defaults {
            map.entry(key).or_insert(value);
        }
    }
    Ok(body)
}

/// `defaults` with the optional filter applied on top.
pub(crate) fn with_search(mut defaults: Params, search: Option<&SearchQuery>) -> Params {
    if let Some(search) = search {
        defaults.merge(search.to_params());
    }
    defaults
}
