//! Prescriptions, refill requests and prescriber permissions.

use std::fmt::Display;

use serde::Serialize;

use crate::client::{with_search, EazyScriptsClient};
use crate::http::HttpTransport;
use crate::query::{Params, SearchQuery};
use crate::response::Response;

impl<T: HttpTransport> EazyScriptsClient<T> {
    pub fn get_active_patient_medications(
        &self,
        patient_id: u64,
        search: Option<&SearchQuery>,
    ) -> Response {
        self.authorized("/patients")
            .segment(patient_id)
            .segment("prescriptions")
            .segment("active")
            .query(with_search(Params::new(), search))
            .get(self.transport())
    }

    pub fn get_pending_permissions(&self, search: Option<&SearchQuery>) -> Response {
        self.authorized("/prescriber/permissions/pendings")
            .query(with_search(Params::new(), search))
            .get(self.transport())
    }

    pub fn get_refill_requests(&self, search: Option<&SearchQuery>) -> Response {
        self.authorized("/requests/refills")
            .query(with_search(Params::new(), search))
            .get(self.transport())
    }

    /// Submit a prescription for a patient.
    ///
    /// The service expects a JSON array holding exactly one prescription, so
    /// `body` is serialized and wrapped as `[body]` on the wire.
    pub fn submit_prescription<B: Serialize + ?Sized>(
        &self,
        patient_id: impl Display,
        body: &B,
    ) -> Response {
        let body = match serde_json::to_string(body) {
            Ok(body) => body,
            Err(e) => return Response::local_failure(e.to_string()),
        };
        self.authorized("/patients")
            .segment(patient_id)
            .segment("prescriptions")
            .segment("submit")
            .raw_json(format!("[{body}]"))
            .post(self.transport())
    }

    pub fn get_prescription_details(
        &self,
        patient_id: impl Display,
        prescription_id: impl Display,
    ) -> Response {
        self.authorized("/patients")
            .segment(patient_id)
            .segment("prescriptions")
            .segment(prescription_id)
            .get(self.transport())
    }
}
