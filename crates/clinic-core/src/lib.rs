//! Core types for the clinic record store.
//!
//! This crate holds the domain value objects and the error taxonomy shared
//! by every other crate. It is deliberately free of file-system and session
//! concerns; those live in `clinic-store-json` and `clinic-session`.

pub mod error;
pub mod note;

pub use error::{Error, Result};

/// Personal Health Number — the clinic-wide primary key for a patient.
///
/// Real PHNs (e.g. 9790012000) exceed `u32`, so the key is a `u64`. On disk
/// the document is keyed by the decimal string form of this value.
pub type Phn = u64;
