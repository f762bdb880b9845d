//! Patients, their addresses and phone numbers, and user records.

use std::fmt::Display;

use serde::Serialize;
use serde_json::json;

use crate::client::EazyScriptsClient;
use crate::http::HttpTransport;
use crate::query::Params;
use crate::response::Response;
use crate::types::UserLevel;

impl<T: HttpTransport> EazyScriptsClient<T> {
    /// Page through all patients.
    pub fn get_patients(&self, take: u32, skip: u32) -> Response {
        self.authorized("/patients")
            .query(Params::from([("Take", take), ("Skip", skip)]))
            .get(self.transport())
    }

    pub fn get_patient(&self, id: impl Display) -> Response {
        self.authorized("/patients")
            .segment(id)
            .segment("info")
            .get(self.transport())
    }

    /// Look a patient up by the email they sign in with.
    pub fn search_patient(&self, email: &str) -> Response {
        self.authorized("/patients/searchbyusername")
            .query(Params::from([("Email", email)]))
            .get(self.transport())
    }

    pub fn get_patient_addresses(&self, id: impl Display) -> Response {
        self.authorized("/patients")
            .segment(id)
            .segment("addresses")
            .get(self.transport())
    }

    pub fn get_patient_phone_numbers(&self, id: impl Display) -> Response {
        self.authorized("/patients")
            .segment(id)
            .segment("phone-numbers")
            .get(self.transport())
    }

    /// Create a patient user. `Level` defaults to [`UserLevel::Patient`]
    /// unless `body` sets it.
    pub fn add_patient<B: Serialize + ?Sized>(&self, body: &B) -> Response {
        let defaults = json!({ "Level": UserLevel::Patient });
        match self.authorized_json_with_defaults("/users", defaults, body) {
            Ok(request) => request.put(self.transport()),
            Err(failure) => failure,
        }
    }

    /// Update the account fields shared by every user type.
    pub fn update_user_info<B: Serialize + ?Sized>(&self, id: impl Display, body: &B) -> Response {
        self.authorized("/users")
            .segment(id)
            .segment("info")
            .json(body)
            .post(self.transport())
    }

    pub fn update_patient<B: Serialize + ?Sized>(&self, id: impl Display, body: &B) -> Response {
        self.authorized("/patients")
            .segment(id)
            .segment("info")
            .json(body)
            .post(self.transport())
    }

    pub fn update_patient_address<B: Serialize + ?Sized>(
        &self,
        patient_id: impl Display,
        address_id: impl Display,
        body: &B,
    ) -> Response {
        self.authorized("/patients")
            .segment(patient_id)
            .segment("addresses")
            .segment(address_id)
            .json(body)
            .post(self.transport())
    }

    pub fn update_patient_phone_number<B: Serialize + ?Sized>(
        &self,
        patient_id: impl Display,
        phone_id: impl Display,
        body: &B,
    ) -> Response {
        self.authorized("/patients")
            .segment(patient_id)
            .segment("phone-numbers")
            .segment(phone_id)
            .json(body)
            .post(self.transport())
    }
}
