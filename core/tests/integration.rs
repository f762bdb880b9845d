//! End-to-end runs against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the client over real
//! HTTP through `UreqTransport`. Validates that request construction,
//! authorization headers and response classification line up with an
//! actual server.

use eazyscripts_core::response::NO_STATUS;
use eazyscripts_core::{
    ClientConfig, EazyScriptsClient, Login, Params, SearchQuery, UreqTransport, UserLevel,
};
use mock_server::{APPLICATION_KEY, APPLICATION_SECRET, USER_EMAIL, USER_PASSWORD};
use serde_json::json;

/// Start the mock server on a random port and return its origin.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn client(base_url: &str) -> EazyScriptsClient<UreqTransport> {
    let config = ClientConfig::new(APPLICATION_KEY, APPLICATION_SECRET, "demo").with_base_url(base_url);
    EazyScriptsClient::with_default_transport(config).unwrap()
}

fn signed_in(base_url: &str) -> EazyScriptsClient<UreqTransport> {
    let mut client = client(base_url);
    let auth = client.authenticate(&Login::server(USER_EMAIL, USER_PASSWORD));
    let token = auth.token().expect("login succeeds").to_string();
    client.set_token(token);
    client
}

#[test]
fn authenticate_then_use_token() {
    let base = start_server();
    let mut client = client(&base);

    // Step 1: authorized call before login is rejected, not raised.
    let response = client.get_patients(10, 0);
    assert!(!response.is_success());
    assert_eq!(response.status(), 401);

    // Step 2: wrong password.
    let response = client.authenticate(&Login::server(USER_EMAIL, "wrong"));
    assert_eq!(response.status(), 401);
    assert_eq!(response.token(), None);
    assert_eq!(response.error_message(), Some("Invalid credentials"));

    // Step 3: real login.
    let response = client.authenticate(&Login::server(USER_EMAIL, USER_PASSWORD));
    assert!(response.is_success(), "login failed: {response:?}");
    let token = response.token().unwrap().to_string();
    assert!(!token.is_empty());
    client.set_token(token.clone());
    assert_eq!(client.token(), Some(token.as_str()));

    // Step 4: the token now opens authorized endpoints.
    let response = client.get_patients(10, 0);
    assert!(response.is_success(), "{response:?}");
    assert_eq!(response.body().unwrap(), &json!([]));
}

#[test]
fn patient_lifecycle() {
    let base = start_server();
    let client = signed_in(&base);

    // Step 1: create a patient; Level is filled in by the client.
    let response = client.add_patient(&json!({
        "FirstName": "Testing",
        "LastName": "Patient",
        "Email": "testing+patient@testemail.com",
        "Password": "pa55word",
        "DateOfBirth": "1970-2-1",
        "Gender": 2,
        "Patient": {
            "HomeAddress": {"Address1": "123 Test Road", "City": "San Diego", "Type": 1},
            "HomePhoneNumber": {"Number": "4155552671", "Extension": "+1", "Type": 1},
        },
    }));
    assert!(response.is_success(), "{response:?}");
    let id = response.body().unwrap()["id"].as_u64().unwrap();

    // Step 2: fetch it back.
    let response = client.get_patient(id);
    assert!(response.is_success());
    assert_eq!(response.body().unwrap()["FirstName"], "Testing");
    assert_eq!(response.body().unwrap()["Level"], 3);

    // Step 3: update.
    let response = client.update_patient(id, &json!({"consent": null, "LastName": "Updated"}));
    assert!(response.is_success());
    let response = client.get_patient(id);
    assert_eq!(response.body().unwrap()["LastName"], "Updated");

    // Step 4: sub-resources.
    let response = client.get_patient_addresses(id);
    assert_eq!(response.body().unwrap()[0]["City"], "San Diego");
    let response = client.get_patient_phone_numbers(id);
    assert_eq!(response.body().unwrap()[0]["Number"], "4155552671");
    let response = client.update_patient_address(id, 1, &json!({"City": "Chicago"}));
    assert_eq!(response.body().unwrap()["City"], "Chicago");

    // Step 5: search by email.
    let response = client.search_patient("testing+patient@testemail.com");
    assert_eq!(response.body().unwrap()["id"], id);

    // Step 6: duplicate email surfaces the service's errors list.
    let response = client.add_patient(&json!({"Email": "testing+patient@testemail.com"}));
    assert!(!response.is_success());
    assert_eq!(response.status(), 400);
    assert_eq!(response.error_message(), Some("Email is already taken"));

    // Step 7: unknown patient.
    let response = client.get_patient(9999);
    assert_eq!(response.status(), 404);
}

#[test]
fn prescriber_lifecycle() {
    let base = start_server();
    let client = signed_in(&base);

    let specialties = client.get_prescriber_specialties(None);
    let specialty = specialties.body().unwrap()[0]["value"].clone();
    let qualifiers = client.get_prescriber_specialty_qualifiers(None);
    let qualifier = qualifiers.body().unwrap()[0]["value"].clone();

    let response = client.add_prescriber(&json!({
        "FirstName": "Testing",
        "LastName": "Doctor",
        "Email": "testing+doctor@testemail.com",
        "Level": UserLevel::Doctor,
        "Prescriber": {
            "Npi": "1234567890",
            "Specialty": specialty,
            "SpecialtyQualifier": qualifier,
        },
    }));
    assert!(response.is_success(), "{response:?}");
    let id = response.body().unwrap()["id"].as_u64().unwrap();

    let response = client.get_prescriber(id);
    assert_eq!(response.body().unwrap()["Level"], 2);

    let response = client.update_prescriber(id, &json!({"Npi": "0987654321"}));
    assert!(response.is_success());

    let response = client.add_prescriber_location(id, &json!({"Name": "Test Clinic"}));
    assert!(response.is_success());
    let response = client.get_prescriber_locations(id);
    assert_eq!(response.body().unwrap()[0]["Name"], "Test Clinic");

    let response = client.get_prescribers(Some(&SearchQuery::new().take(5)));
    assert_eq!(response.body().unwrap().as_array().unwrap().len(), 1);

    assert!(client.get_prescribers_preferred_prescriptions().is_success());
    assert!(client.get_pending_permissions(None).is_success());
    assert!(client.get_refill_requests(None).is_success());
}

#[test]
fn catalog_searches() {
    let base = start_server();
    let client = signed_in(&base);

    // The mock never matches a padded term, so this passes only if trimmed.
    let response = client.get_pharmacies(" acme ", 10, 0);
    assert_eq!(response.body().unwrap().as_array().unwrap().len(), 2);

    let response = client.get_mail_in_pharmacies("", "CA", 0, 24);
    let found = response.body().unwrap().as_array().unwrap().clone();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["type"], 4);

    let response = client.get_pharmacies_advanced("corner", "New York, NY", None, None);
    assert_eq!(response.body().unwrap()[0]["name"], "Corner Drugs");

    let response = client.get_pharmacy(1);
    assert_eq!(response.body().unwrap()["name"], "Acme Pharmacy");

    let response = client.get_medicines(Some("amox"), None, None);
    assert_eq!(response.body().unwrap()[0]["name"], "Amoxicillin 500mg");

    let response = client.get_potency_unit_codes(1);
    assert!(response.is_success());
}

#[test]
fn prescription_submission() {
    let base = start_server();
    let client = signed_in(&base);

    let patient = client.add_patient(&json!({"Email": "rx@example.com"}));
    let patient_id = patient.body().unwrap()["id"].as_u64().unwrap();

    let response = client.submit_prescription(patient_id, &json!({"MedicineId": 1, "Quantity": 30}));
    assert!(response.is_success(), "{response:?}");
    let rx_id = response.body().unwrap()[0]["id"].as_u64().unwrap();

    let response = client.get_active_patient_medications(patient_id, None);
    assert_eq!(response.body().unwrap().as_array().unwrap().len(), 1);

    let response = client.get_prescription_details(patient_id, rx_id);
    assert_eq!(response.body().unwrap()["Quantity"], 30);
}

#[test]
fn browser_urls_point_at_configured_origin() {
    let base = start_server();
    let client = signed_in(&base);

    let url = client
        .get_new_prescription_url(Params::from([("PatientId", "12")]))
        .unwrap();
    assert!(url.starts_with(&format!("{base}/browser/new-prescription?Token=")));
    assert!(url.contains(&format!("ApplicationKey={APPLICATION_KEY}")));
    assert!(url.ends_with("PatientId=12"));
}

#[test]
fn unreachable_server_is_a_failed_response() {
    // Grab a free port, then close it so nothing is listening.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let mut client = client(&format!("http://{addr}"));
    client.set_token("anything");

    let response = client.get_patient("123");
    assert!(!response.is_success());
    assert_eq!(response.status(), NO_STATUS);
    assert!(response.body().unwrap().get("error").is_some());
}
