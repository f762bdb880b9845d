//! Enumerations and request DTOs the service defines.
//!
//! Numeric codes serialize as plain integers, matching what the service
//! stores. Bodies for most endpoints are free-form (`serde_json::Value` or
//! any `Serialize` type with PascalCase fields); only the login payload is
//! typed here.

use serde::Serialize;

/// Account level sent as `Level` when creating users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum UserLevel {
    Doctor = 2,
    Patient = 3,
}

impl From<UserLevel> for u8 {
    fn from(level: UserLevel) -> Self {
        level as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum Gender {
    Unknown = 0,
    Male = 1,
    Female = 2,
}

impl From<Gender> for u8 {
    fn from(gender: Gender) -> Self {
        gender as u8
    }
}

/// `Type` of an address or phone number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum ContactType {
    Home = 1,
    Work = 2,
    Fax = 3,
}

impl From<ContactType> for u8 {
    fn from(kind: ContactType) -> Self {
        kind as u8
    }
}

/// Pharmacy category filter for `/pharmacies/types`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum PharmacyType {
    MailIn = 4,
}

impl From<PharmacyType> for u8 {
    fn from(kind: PharmacyType) -> Self {
        kind as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlatformType {
    #[serde(rename = "SERVER")]
    Server,
}

/// User credentials for `authenticate`. The client adds its application
/// key, secret and subdomain.
#[derive(Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Login {
    pub email: String,
    pub password: String,
    pub platform_type: PlatformType,
}

impl Login {
    pub fn server(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            platform_type: PlatformType::Server,
        }
    }
}

impl std::fmt::Debug for Login {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Login")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("platform_type", &self.platform_type)
            .finish()
    }
}
