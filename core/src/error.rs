//! Errors raised by the client itself.
//!
//! # Design
//! Remote failures (bad credentials, unknown ids, server-side validation,
//! unreachable host) never show up here; they arrive as
//! `Response::Failure`. `Error` only covers mistakes the caller can fix
//! before anything is sent: missing required fields, a missing session
//! token for browser URLs, bad configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A required field was not supplied.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A browser URL was requested before `set_token` was called.
    #[error("no session token set; authenticate and call set_token first")]
    Unauthenticated,

    /// The configured base URL, or a URL derived from it, is not valid.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A request body could not be serialized to JSON.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Client configuration is incomplete or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
