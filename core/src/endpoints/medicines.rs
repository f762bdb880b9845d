//! Medicine catalog.

use std::fmt::Display;

use crate::client::EazyScriptsClient;
use crate::http::HttpTransport;
use crate::query::Params;
use crate::response::Response;

pub const DEFAULT_MEDICINE_TAKE: u32 = 24;
pub const DEFAULT_MEDICINE_SKIP: u32 = 0;

impl<T: HttpTransport> EazyScriptsClient<T> {
    /// Search the catalog. `search` is trimmed; `None` lists without a term.
    pub fn get_medicines(&self, search: Option<&str>, take: Option<u32>, skip: Option<u32>) -> Response {
        let mut query = Params::new();
        if let Some(search) = search {
            query.insert("Search", search.trim());
        }
        query.insert("Take", take.unwrap_or(DEFAULT_MEDICINE_TAKE));
        query.insert("Skip", skip.unwrap_or(DEFAULT_MEDICINE_SKIP));
        self.authorized("/medicines").query(query).get(self.transport())
    }

    pub fn get_potency_unit_codes(&self, medicine_id: impl Display) -> Response {
        self.authorized("/medicines")
            .segment(medicine_id)
            .segment("potency-unit-codes")
            .get(self.transport())
    }
}
