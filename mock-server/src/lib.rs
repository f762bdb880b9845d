//! In-memory stand-in for the EazyScripts API, used by end-to-end tests.
//!
//! Only the behavior the client depends on is modelled: application-key and
//! bearer-token checks, user creation, patient and prescriber records,
//! static pharmacy and medicine catalogs, and prescription submission (which
//! insists on a JSON array, as the real service does).

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const APPLICATION_KEY: &str = "test-key";
pub const APPLICATION_SECRET: &str = "test-secret";
pub const USER_EMAIL: &str = "doctor@example.com";
pub const USER_PASSWORD: &str = "pa55word";

const LEVEL_DOCTOR: u64 = 2;
const LEVEL_PATIENT: u64 = 3;

#[derive(Clone, Debug, Serialize)]
pub struct Pharmacy {
    pub id: u64,
    pub name: String,
    pub state: String,
    #[serde(rename = "type")]
    pub kind: u8,
}

#[derive(Clone, Debug, Serialize)]
pub struct Medicine {
    pub id: u64,
    pub name: String,
}

#[derive(Default)]
pub struct Store {
    tokens: HashSet<String>,
    users: HashMap<u64, Map<String, Value>>,
    locations: HashMap<u64, Vec<Value>>,
    prescriptions: HashMap<u64, Vec<Value>>,
    next_id: u64,
}

impl Store {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn users_with_level(&self, level: u64) -> Vec<Value> {
        let mut users: Vec<_> = self
            .users
            .values()
            .filter(|u| u.get("Level").and_then(Value::as_u64) == Some(level))
            .cloned()
            .map(Value::Object)
            .collect();
        users.sort_by_key(|u| u["id"].as_u64());
        users
    }
}

pub type Db = Arc<RwLock<Store>>;

type ApiError = (StatusCode, Json<Value>);

fn error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "error": message })))
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/account/authenticate", post(authenticate))
        .route("/users", put(create_user))
        .route("/users/{id}/info", post(update_user))
        .route("/patients", get(list_patients))
        .route("/patients/searchbyusername", get(search_patient))
        .route("/patients/{id}/info", get(get_patient).post(update_user))
        .route("/patients/{id}/addresses", get(patient_addresses))
        .route("/patients/{id}/addresses/{address_id}", post(echo_update))
        .route("/patients/{id}/phone-numbers", get(patient_phone_numbers))
        .route("/patients/{id}/phone-numbers/{phone_id}", post(echo_update))
        .route("/patients/{id}/prescriptions/submit", post(submit_prescription))
        .route("/patients/{id}/prescriptions/active", get(active_prescriptions))
        .route("/patients/{id}/prescriptions/{prescription_id}", get(prescription_details))
        .route("/prescribers", get(list_prescribers))
        .route("/prescribers/specialties", get(specialties))
        .route("/prescribers/specialty-qualifiers", get(specialty_qualifiers))
        .route("/prescribers/{id}", get(get_prescriber))
        .route("/prescribers/{id}/info", post(update_user))
        .route("/prescribers/{id}/locations", get(list_locations).put(add_location))
        .route("/prescribers/{id}/locations/{location_id}", post(echo_update))
        .route("/prescriber/preferred-prescriptions", get(empty_list))
        .route("/prescriber/permissions/pendings", get(empty_list))
        .route("/requests/refills", get(empty_list))
        .route("/pharmacies", get(search_pharmacies))
        .route("/pharmacies/advancepharmacysearch", get(search_pharmacies))
        .route("/pharmacies/types", get(pharmacies_by_type))
        .route("/pharmacies/{id}/", get(get_pharmacy))
        .route("/medicines", get(search_medicines))
        .route("/medicines/{id}/potency-unit-codes", get(potency_unit_codes))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Proof that the request carried the application key and a live session token.
pub struct Authorized;

impl FromRequestParts<Db> for Authorized {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, db: &Db) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        if header("ApplicationKey").as_deref() != Some(APPLICATION_KEY)
            || header("ApplicationSecret").as_deref() != Some(APPLICATION_SECRET)
        {
            return Err(error(StatusCode::FORBIDDEN, "Unknown application"));
        }
        let token = header("Authorization")
            .and_then(|v| v.strip_prefix("Bearer ").map(str::to_string))
            .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Missing bearer token"))?;
        if !db.read().await.tokens.contains(&token) {
            return Err(error(StatusCode::UNAUTHORIZED, "Invalid token"));
        }
        Ok(Authorized)
    }
}

fn field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str)
}

async fn authenticate(State(db): State<Db>, Json(body): Json<Value>) -> Result<Json<Value>, ApiError> {
    if field(&body, "ApplicationKey") != Some(APPLICATION_KEY)
        || field(&body, "ApplicationSecret") != Some(APPLICATION_SECRET)
    {
        return Err(error(StatusCode::FORBIDDEN, "Unknown application"));
    }
    if field(&body, "Subdomain").map_or(true, str::is_empty) {
        return Err(error(StatusCode::BAD_REQUEST, "Subdomain is required"));
    }
    if field(&body, "Email") != Some(USER_EMAIL) || field(&body, "Password") != Some(USER_PASSWORD) {
        tracing::warn!("rejected login");
        return Err(error(StatusCode::UNAUTHORIZED, "Invalid credentials"));
    }
    let token = Uuid::new_v4().to_string();
    db.write().await.tokens.insert(token.clone());
    tracing::info!(subdomain = field(&body, "Subdomain").unwrap_or_default(), "session issued");
    Ok(Json(json!({ "token": token })))
}

async fn create_user(
    _: Authorized,
    State(db): State<Db>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let Value::Object(mut user) = body else {
        return Err(error(StatusCode::BAD_REQUEST, "Expected a JSON object"));
    };
    let email = user
        .get("Email")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": [{ "field": "Email", "message": "Email is required" }] })),
            )
        })?;
    match user.get("Level").and_then(Value::as_u64) {
        Some(LEVEL_DOCTOR) | Some(LEVEL_PATIENT) => {}
        _ => return Err(error(StatusCode::BAD_REQUEST, "Unknown user level")),
    }

    let mut store = db.write().await;
    let taken = store
        .users
        .values()
        .any(|u| u.get("Email").and_then(Value::as_str) == Some(email.as_str()));
    if taken {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "errors": [{ "field": "Email", "message": "Email is already taken" }] })),
        ));
    }
    user.remove("Password");
    let id = store.allocate_id();
    user.insert("id".to_string(), json!(id));
    store.users.insert(id, user);
    Ok(Json(json!({ "id": id })))
}

async fn update_user(
    _: Authorized,
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let mut store = db.write().await;
    let user = store
        .users
        .get_mut(&id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "User not found"))?;
    if let Value::Object(changes) = body {
        for (key, value) in changes {
            if key != "id" {
                user.insert(key, value);
            }
        }
    }
    Ok(Json(Value::Object(user.clone())))
}

async fn lookup_user(db: &Db, id: u64, level: u64) -> Result<Map<String, Value>, ApiError> {
    db.read()
        .await
        .users
        .get(&id)
        .filter(|u| u.get("Level").and_then(Value::as_u64) == Some(level))
        .cloned()
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Not found"))
}

fn page(items: Vec<Value>, query: &HashMap<String, String>, default_take: usize) -> Vec<Value> {
    let number = |key: &str, default: usize| {
        query
            .get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    };
    items
        .into_iter()
        .skip(number("Skip", 0))
        .take(number("Take", default_take))
        .collect()
}

async fn list_patients(
    _: Authorized,
    State(db): State<Db>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let patients = db.read().await.users_with_level(LEVEL_PATIENT);
    Json(Value::Array(page(patients, &query, 50)))
}

async fn search_patient(
    _: Authorized,
    State(db): State<Db>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let email = query.get("Email").map(String::as_str).unwrap_or_default();
    db.read()
        .await
        .users_with_level(LEVEL_PATIENT)
        .into_iter()
        .find(|u| u["Email"] == email)
        .map(Json)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Patient not found"))
}

async fn get_patient(_: Authorized, State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Value>, ApiError> {
    lookup_user(&db, id, LEVEL_PATIENT).await.map(|u| Json(Value::Object(u)))
}

async fn patient_addresses(
    _: Authorized,
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiError> {
    let patient = lookup_user(&db, id, LEVEL_PATIENT).await?;
    Ok(Json(nested_list(&patient, &["HomeAddress", "WorkAddress"])))
}

async fn patient_phone_numbers(
    _: Authorized,
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiError> {
    let patient = lookup_user(&db, id, LEVEL_PATIENT).await?;
    Ok(Json(nested_list(&patient, &["HomePhoneNumber", "WorkPhoneNumber"])))
}

fn nested_list(patient: &Map<String, Value>, keys: &[&str]) -> Value {
    let details = patient.get("Patient");
    let entries = keys
        .iter()
        .filter_map(|key| details.and_then(|d| d.get(*key)).cloned())
        .collect();
    Value::Array(entries)
}

async fn echo_update(
    _: Authorized,
    Path(ids): Path<(u64, u64)>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let (_, item_id) = ids;
    let mut updated = match body {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    updated.insert("id".to_string(), json!(item_id));
    Json(Value::Object(updated))
}

async fn list_prescribers(
    _: Authorized,
    State(db): State<Db>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let prescribers = db.read().await.users_with_level(LEVEL_DOCTOR);
    Json(Value::Array(page(prescribers, &query, 50)))
}

async fn get_prescriber(_: Authorized, State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Value>, ApiError> {
    lookup_user(&db, id, LEVEL_DOCTOR).await.map(|u| Json(Value::Object(u)))
}

async fn specialties(_: Authorized) -> Json<Value> {
    Json(json!([
        { "value": 1, "text": "Family Medicine" },
        { "value": 2, "text": "Dermatology" },
    ]))
}

async fn specialty_qualifiers(_: Authorized) -> Json<Value> {
    Json(json!([
        { "value": 10, "text": "Board Certified" },
    ]))
}

async fn list_locations(_: Authorized, State(db): State<Db>, Path(id): Path<u64>) -> Json<Value> {
    let locations = db.read().await.locations.get(&id).cloned().unwrap_or_default();
    Json(Value::Array(locations))
}

async fn add_location(
    _: Authorized,
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let mut store = db.write().await;
    lookup_level(&store, id, LEVEL_DOCTOR)?;
    let location_id = store.allocate_id();
    let mut location = match body {
        Value::Object(map) => map,
        _ => return Err(error(StatusCode::BAD_REQUEST, "Expected a JSON object")),
    };
    location.insert("id".to_string(), json!(location_id));
    let location = Value::Object(location);
    store.locations.entry(id).or_default().push(location.clone());
    Ok(Json(location))
}

fn lookup_level(store: &Store, id: u64, level: u64) -> Result<(), ApiError> {
    match store.users.get(&id).and_then(|u| u.get("Level")).and_then(Value::as_u64) {
        Some(found) if found == level => Ok(()),
        _ => Err(error(StatusCode::NOT_FOUND, "Not found")),
    }
}

async fn empty_list(_: Authorized) -> Json<Value> {
    Json(json!([]))
}

fn pharmacies() -> Vec<Pharmacy> {
    let pharmacy = |id, name: &str, state: &str, kind| Pharmacy {
        id,
        name: name.to_string(),
        state: state.to_string(),
        kind,
    };
    vec![
        pharmacy(1, "Acme Pharmacy", "CA", 1),
        pharmacy(2, "Corner Drugs", "NY", 1),
        pharmacy(3, "Acme Mail Order", "CA", 4),
    ]
}

fn matches_search(name: &str, query: &HashMap<String, String>) -> bool {
    match query.get("Search") {
        Some(term) if !term.is_empty() => {
            // A padded term never matches, so untrimmed searches show up in tests.
            name.to_lowercase().contains(&term.to_lowercase())
        }
        _ => true,
    }
}

async fn search_pharmacies(
    _: Authorized,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let found = pharmacies()
        .into_iter()
        .filter(|p| matches_search(&p.name, &query))
        .map(|p| json!(p))
        .collect();
    Json(Value::Array(page(found, &query, 100)))
}

async fn pharmacies_by_type(
    _: Authorized,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let kind: Option<u8> = query.get("Type").and_then(|v| v.parse().ok());
    let state = query.get("State");
    let found = pharmacies()
        .into_iter()
        .filter(|p| Some(p.kind) == kind)
        .filter(|p| state.map_or(true, |s| s.is_empty() || *s == p.state))
        .filter(|p| matches_search(&p.name, &query))
        .map(|p| json!(p))
        .collect();
    Json(Value::Array(page(found, &query, 100)))
}

async fn get_pharmacy(_: Authorized, Path(id): Path<u64>) -> Result<Json<Value>, ApiError> {
    pharmacies()
        .into_iter()
        .find(|p| p.id == id)
        .map(|p| Json(json!(p)))
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Pharmacy not found"))
}

fn medicines() -> Vec<Medicine> {
    ["Amoxicillin 500mg", "Atorvastatin 20mg", "Lisinopril 10mg"]
        .iter()
        .enumerate()
        .map(|(i, name)| Medicine {
            id: i as u64 + 1,
            name: name.to_string(),
        })
        .collect()
}

async fn search_medicines(
    _: Authorized,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let found = medicines()
        .into_iter()
        .filter(|m| matches_search(&m.name, &query))
        .map(|m| json!(m))
        .collect();
    Json(Value::Array(page(found, &query, 24)))
}

async fn potency_unit_codes(_: Authorized, Path(id): Path<u64>) -> Result<Json<Value>, ApiError> {
    if medicines().iter().all(|m| m.id != id) {
        return Err(error(StatusCode::NOT_FOUND, "Medicine not found"));
    }
    Ok(Json(json!([{ "code": "C48542", "text": "Tablet" }])))
}

async fn submit_prescription(
    _: Authorized,
    State(db): State<Db>,
    Path(patient_id): Path<u64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let Value::Array(items) = body else {
        return Err(error(StatusCode::BAD_REQUEST, "Expected an array of prescriptions"));
    };
    let mut store = db.write().await;
    lookup_level(&store, patient_id, LEVEL_PATIENT)?;
    let mut created = Vec::new();
    for item in items {
        let Value::Object(mut rx) = item else {
            return Err(error(StatusCode::BAD_REQUEST, "Prescription must be an object"));
        };
        let id = store.allocate_id();
        rx.insert("id".to_string(), json!(id));
        rx.insert("Status".to_string(), json!("Active"));
        store.prescriptions.entry(patient_id).or_default().push(Value::Object(rx));
        created.push(json!({ "id": id }));
    }
    Ok(Json(Value::Array(created)))
}

async fn active_prescriptions(
    _: Authorized,
    State(db): State<Db>,
    Path(patient_id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let prescriptions = db
        .read()
        .await
        .prescriptions
        .get(&patient_id)
        .cloned()
        .unwrap_or_default();
    Json(Value::Array(page(prescriptions, &query, 50)))
}

async fn prescription_details(
    _: Authorized,
    State(db): State<Db>,
    Path((patient_id, prescription_id)): Path<(u64, u64)>,
) -> Result<Json<Value>, ApiError> {
    db.read()
        .await
        .prescriptions
        .get(&patient_id)
        .and_then(|list| list.iter().find(|rx| rx["id"] == prescription_id))
        .cloned()
        .map(Json)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Prescription not found"))
}
