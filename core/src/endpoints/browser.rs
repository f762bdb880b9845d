//! Browser URLs: links an end user opens to reach a hosted UI flow.
//!
//! Each URL carries the session token and application credentials in its
//! query string, followed by the caller's own parameters (which win on a
//! key collision). Nothing is sent; the transport is never used.

use crate::client::EazyScriptsClient;
use crate::error::{Error, Result};
use crate::http::HttpTransport;
use crate::query::Params;

pub const AUTO_LOGIN_PATH: &str = "/browser/auto-login";
pub const NEW_PRESCRIPTION_PATH: &str = "/browser/new-prescription";
pub const REFILL_PATH: &str = "/browser/refill";
pub const CANCEL_PRESCRIPTION_PATH: &str = "/browser/cancel-prescription";

impl<T: HttpTransport> EazyScriptsClient<T> {
    /// Link that signs the session's user straight into the web UI.
    pub fn get_auto_login_url(&self, params: Params) -> Result<String> {
        self.browser_url(AUTO_LOGIN_PATH, self.browser_defaults()?, params)
    }

    /// Link to the new-prescription flow. `PatientId` is required.
    pub fn get_new_prescription_url(&self, params: Params) -> Result<String> {
        require(&params, "PatientId", "generating a new-prescription url")?;
        self.browser_url(NEW_PRESCRIPTION_PATH, self.browser_defaults()?, params)
    }

    /// Link to the refill flow. `PatientId` and `RefillRequestId` are required.
    pub fn get_refill_url(&self, params: Params) -> Result<String> {
        require(&params, "PatientId", "generating a refill url")?;
        require(&params, "RefillRequestId", "generating a refill url")?;
        self.browser_url(REFILL_PATH, self.browser_defaults()?, params)
    }

    /// Link to the cancellation flow. Needs a `PrescriptionId` or a
    /// `ConsultationId`; the tenant `Subdomain` is added to the defaults.
    pub fn cancel_prescription(&self, params: Params) -> Result<String> {
        if !present(&params, "PrescriptionId") && !present(&params, "ConsultationId") {
            return Err(Error::Validation(
                "a PrescriptionId or a ConsultationId is required when canceling a prescription"
                    .to_string(),
            ));
        }
        let defaults = self
            .browser_defaults()?
            .with("Subdomain", self.config().subdomain());
        self.browser_url(CANCEL_PRESCRIPTION_PATH, defaults, params)
    }

    fn browser_defaults(&self) -> Result<Params> {
        let token = self.token().ok_or(Error::Unauthenticated)?;
        Ok(Params::new()
            .with("Token", token)
            .with("ApplicationKey", self.config().key())
            .with("ApplicationSecret", self.config().secret()))
    }

    fn browser_url(&self, path: &str, mut defaults: Params, params: Params) -> Result<String> {
        defaults.merge(params);
        Ok(self.request(path).query(defaults).url()?.into())
    }
}

/// A parameter counts as supplied when it is set to a non-blank value.
fn present(params: &Params, key: &str) -> bool {
    params.get(key).is_some_and(|v| !v.trim().is_empty())
}

fn require(params: &Params, key: &str, action: &str) -> Result<()> {
    if present(params, key) {
        Ok(())
    } else {
        Err(Error::Validation(format!("a {key} is required when {action}")))
    }
}
