//! Prescribers, their specialties and locations.

use std::fmt::Display;

use serde::Serialize;

use crate::client::{with_search, EazyScriptsClient};
use crate::http::HttpTransport;
use crate::query::{Params, SearchQuery};
use crate::response::Response;

impl<T: HttpTransport> EazyScriptsClient<T> {
    pub fn get_prescriber_specialties(&self, search: Option<&SearchQuery>) -> Response {
        self.authorized("/prescribers/specialties")
            .query(with_search(Params::new(), search))
            .get(self.transport())
    }

    pub fn get_prescriber_specialty_qualifiers(&self, search: Option<&SearchQuery>) -> Response {
        self.authorized("/prescribers/specialty-qualifiers")
            .query(with_search(Params::new(), search))
            .get(self.transport())
    }

    pub fn get_prescribers(&self, search: Option<&SearchQuery>) -> Response {
        self.authorized("/prescribers")
            .query(with_search(Params::new(), search))
            .get(self.transport())
    }

    pub fn get_prescriber(&self, id: impl Display) -> Response {
        self.authorized("/prescribers")
            .segment(id)
            .get(self.transport())
    }

    /// Create a prescriber user. The body is sent as given, so it must carry
    /// `Level` ([`crate::UserLevel::Doctor`]) itself.
    pub fn add_prescriber<B: Serialize + ?Sized>(&self, body: &B) -> Response {
        self.authorized("/users").json(body).put(self.transport())
    }

    pub fn update_prescriber<B: Serialize + ?Sized>(&self, id: impl Display, body: &B) -> Response {
        self.authorized("/prescribers")
            .segment(id)
            .segment("info")
            .json(body)
            .post(self.transport())
    }

    pub fn add_prescriber_location<B: Serialize + ?Sized>(
        &self,
        prescriber_id: impl Display,
        body: &B,
    ) -> Response {
        self.authorized("/prescribers")
            .segment(prescriber_id)
            .segment("locations")
            .json(body)
            .put(self.transport())
    }

    pub fn update_prescriber_location<B: Serialize + ?Sized>(
        &self,
        prescriber_id: impl Display,
        location_id: impl Display,
        body: &B,
    ) -> Response {
        self.authorized("/prescribers")
            .segment(prescriber_id)
            .segment("locations")
            .segment(location_id)
            .json(body)
            .post(self.transport())
    }

    pub fn get_prescriber_locations(&self, prescriber_id: impl Display) -> Response {
        self.authorized("/prescribers")
            .segment(prescriber_id)
            .segment("locations")
            .get(self.transport())
    }

    /// Preferred prescriptions of the prescriber the session belongs to.
    pub fn get_prescribers_preferred_prescriptions(&self) -> Response {
        self.authorized("/prescriber/preferred-prescriptions")
            .get(self.transport())
    }
}
