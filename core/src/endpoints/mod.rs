//! The endpoint catalog, one file per resource family.
//!
//! Every method here is an `impl` block on `EazyScriptsClient` and returns
//! the `Response` unmodified. All of them attach the bearer token; the only
//! unauthenticated call, `authenticate`, lives next to the token handling
//! in `crate::client`. The browser URL builders never touch the transport.

mod browser;
mod medicines;
mod patients;
mod pharmacies;
mod prescribers;
mod prescriptions;

pub use browser::{
    AUTO_LOGIN_PATH, CANCEL_PRESCRIPTION_PATH, NEW_PRESCRIPTION_PATH, REFILL_PATH,
};
pub use medicines::{DEFAULT_MEDICINE_SKIP, DEFAULT_MEDICINE_TAKE};
pub use pharmacies::{DEFAULT_ADVANCED_TAKE, DEFAULT_PHARMACY_RANGE};
