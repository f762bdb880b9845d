//! Typed client for the EazyScripts prescription-management API.
//!
//! # Overview
//! `EazyScriptsClient` maps one method to each remote endpoint (patients,
//! prescribers, pharmacies, medicines, prescriptions, permissions) and
//! returns a `Response` that has already been classified as success or
//! failure. The HTTP exchange itself goes through an injected
//! `HttpTransport`; `UreqTransport` is bundled behind the default
//! `ureq-transport` feature.
//!
//! # Design
//! - A fresh `RequestBuilder` is made per call, so no header state is shared.
//! - Remote and transport failures come back as `Response::Failure`; only
//!   caller mistakes (missing required fields, no token for browser URLs,
//!   bad configuration) are `Err`.
//! - The session token is set explicitly by the caller after `authenticate`
//!   and is never refreshed or persisted here.
//!
//! ```no_run
//! use eazyscripts_core::{ClientConfig, EazyScriptsClient, Login};
//!
//! # fn main() -> eazyscripts_core::Result<()> {
//! let mut client = EazyScriptsClient::with_default_transport(ClientConfig::from_env()?)?;
//! let auth = client.authenticate(&Login::server("doc@example.com", "pa55word"));
//! if let Some(token) = auth.token() {
//!     client.set_token(token);
//! }
//! let patient = client.get_patient("123");
//! println!("{}: {:?}", patient.status(), patient.body());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod query;
pub mod request;
pub mod response;
#[cfg(feature = "ureq-transport")]
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use client::EazyScriptsClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};
pub use query::{Params, SearchQuery};
pub use request::{RequestBuilder, ServiceTarget};
pub use response::Response;
#[cfg(feature = "ureq-transport")]
pub use transport::UreqTransport;
pub use types::{ContactType, Gender, Login, PharmacyType, PlatformType, UserLevel};
