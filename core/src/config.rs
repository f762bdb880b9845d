//! Client credentials and target resolution.

use url::Url;

use crate::error::{Error, Result};

/// Host every tenant subdomain lives under.
pub const SERVICE_HOST: &str = "eazyscripts.com";

pub const ENV_KEY: &str = "EAZYSCRIPTS_KEY";
pub const ENV_SECRET: &str = "EAZYSCRIPTS_SECRET";
pub const ENV_SUBDOMAIN: &str = "EAZYSCRIPTS_SUBDOMAIN";
pub const ENV_BASE_URL: &str = "EAZYSCRIPTS_BASE_URL";

/// Application credentials plus the tenant to talk to.
///
/// Immutable once handed to the client.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    key: String,
    secret: String,
    subdomain: String,
    base_url: Option<String>,
}

impl ClientConfig {
    pub fn new(
        key: impl Into<String>,
        secret: impl Into<String>,
        subdomain: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            subdomain: subdomain.into(),
            base_url: None,
        }
    }

    /// Send requests to `base_url` instead of `https://{subdomain}.eazyscripts.com`.
    /// The subdomain is still sent wherever the service expects it.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Read credentials from `EAZYSCRIPTS_KEY`, `EAZYSCRIPTS_SECRET`,
    /// `EAZYSCRIPTS_SUBDOMAIN` and, optionally, `EAZYSCRIPTS_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| Error::Config(format!("{name} is not set")))
        };
        let mut config = Self::new(
            required(ENV_KEY)?,
            required(ENV_SECRET)?,
            required(ENV_SUBDOMAIN)?,
        );
        config.base_url = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty());
        Ok(config)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn subdomain(&self) -> &str {
        &self.subdomain
    }

    /// The origin requests are sent to, without a trailing slash.
    pub fn resolve_base_url(&self) -> Result<Url> {
        let raw = match &self.base_url {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => {
                let subdomain = self.subdomain.as_str();
                if subdomain.trim().is_empty() {
                    return Err(Error::Config("subdomain must not be empty".to_string()));
                }
                if !is_dns_label(subdomain) {
                    return Err(Error::Config(format!(
                        "subdomain {subdomain:?} is not a single DNS label"
                    )));
                }
                format!("https://{subdomain}.{SERVICE_HOST}")
            }
        };
        Ok(Url::parse(&raw)?)
    }
}

/// ASCII letters, digits and inner hyphens, at most 63 characters.
fn is_dns_label(label: &str) -> bool {
    label.len() <= 63
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .field("subdomain", &self.subdomain)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_target_embeds_subdomain() {
        let config = ClientConfig::new("K", "S", "demo");
        let url = config.resolve_base_url().unwrap();
        assert_eq!(url.as_str(), "https://demo.eazyscripts.com/");
        assert_eq!(url.host_str(), Some("demo.eazyscripts.com"));
    }

    #[test]
    fn base_url_override_wins() {
        let config = ClientConfig::new("K", "S", "demo").with_base_url("http://127.0.0.1:3000/");
        let url = config.resolve_base_url().unwrap();
        assert_eq!(url.host_str(), Some("127.0.0.1"));
        assert_eq!(url.port(), Some(3000));
        assert_eq!(config.subdomain(), "demo");
    }

    #[test]
    fn blank_subdomain_is_rejected() {
        let err = ClientConfig::new("K", "S", "  ").resolve_base_url().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn subdomain_must_be_a_single_label() {
        for subdomain in [
            "attacker.example/x",
            "evil.com#",
            "user@evil.com",
            "demo:8080",
            "a.b",
            " demo",
            "-demo",
            "demo-",
        ] {
            let err = ClientConfig::new("K", "S", subdomain)
                .resolve_base_url()
                .unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{subdomain:?} accepted");
        }
        let url = ClientConfig::new("K", "S", "my-clinic2").resolve_base_url().unwrap();
        assert_eq!(url.host_str(), Some("my-clinic2.eazyscripts.com"));
    }

    #[test]
    fn invalid_override_is_rejected() {
        let err = ClientConfig::new("K", "S", "demo")
            .with_base_url("not a url")
            .resolve_base_url()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn lookup_reads_all_variables() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_KEY, "K"),
            (ENV_SECRET, "S"),
            (ENV_SUBDOMAIN, "demo"),
            (ENV_BASE_URL, "http://localhost:3000"),
        ]);
        let config = ClientConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();
        assert_eq!(config.key(), "K");
        assert_eq!(config.secret(), "S");
        assert_eq!(config.subdomain(), "demo");
        assert_eq!(config.resolve_base_url().unwrap().port(), Some(3000));
    }

    #[test]
    fn lookup_reports_missing_variable() {
        let vars: HashMap<&str, &str> = HashMap::from([(ENV_KEY, "K"), (ENV_SUBDOMAIN, "demo")]);
        let err = ClientConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap_err();
        match err {
            Error::Config(msg) => assert!(msg.contains(ENV_SECRET)),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn debug_output_hides_secret() {
        let config = ClientConfig::new("K", "very-secret", "demo");
        assert!(!format!("{config:?}").contains("very-secret"));
    }
}
