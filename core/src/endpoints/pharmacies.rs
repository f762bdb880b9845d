//! Pharmacy lookups. Search terms are trimmed before they are sent.

use std::fmt::Display;

use crate::client::EazyScriptsClient;
use crate::http::HttpTransport;
use crate::query::Params;
use crate::response::Response;
use crate::types::PharmacyType;

/// Radius used by the advanced search when none is given.
pub const DEFAULT_PHARMACY_RANGE: u32 = 50;
/// Page size used by the advanced search when none is given.
pub const DEFAULT_ADVANCED_TAKE: u32 = 100;

impl<T: HttpTransport> EazyScriptsClient<T> {
    pub fn get_pharmacies(&self, search: &str, take: u32, skip: u32) -> Response {
        let query = Params::new()
            .with("Search", search.trim())
            .with("Take", take)
            .with("Skip", skip);
        self.authorized("/pharmacies").query(query).get(self.transport())
    }

    /// Pharmacies matching `search` within `range` of `address`.
    pub fn get_pharmacies_advanced(
        &self,
        search: &str,
        address: &str,
        range: Option<u32>,
        take: Option<u32>,
    ) -> Response {
        let query = Params::new()
            .with("Search", search.trim())
            .with("Range", range.unwrap_or(DEFAULT_PHARMACY_RANGE))
            .with("Address", address)
            .with("Take", take.unwrap_or(DEFAULT_ADVANCED_TAKE));
        self.authorized("/pharmacies/advancepharmacysearch")
            .query(query)
            .get(self.transport())
    }

    /// Mail-order pharmacies licensed in `state`.
    pub fn get_mail_in_pharmacies(&self, search: &str, state: &str, skip: u32, take: u32) -> Response {
        let query = Params::new()
            .with("Search", search.trim())
            .with("Take", take)
            .with("Skip", skip)
            .with("State", state)
            .with("Type", u8::from(PharmacyType::MailIn));
        self.authorized("/pharmacies/types").query(query).get(self.transport())
    }

    pub fn get_pharmacy(&self, id: impl Display) -> Response {
        // The service routes this one with a trailing slash.
        self.authorized("/pharmacies")
            .segment(id)
            .segment("")
            .get(self.transport())
    }
}
