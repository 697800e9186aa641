//! Session and authorization layer for the clinic stores.
//!
//! Every store operation is reachable only through [`Clinic`], which checks
//! the [`SessionGate`] before touching the [`PatientStore`]. Credentials are
//! an externally-supplied username → SHA-256 digest mapping; no plaintext
//! password survives past the comparison.

pub mod clinic;
pub mod credentials;
pub mod gate;

#[cfg(test)]
mod tests;

pub use clinic::Clinic;
pub use credentials::{Credentials, password_digest};
pub use gate::SessionGate;
