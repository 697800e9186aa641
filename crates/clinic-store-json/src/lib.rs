//! File-backed patient and note stores.
//!
//! Each store owns its durability: [`PatientStore`] writes one JSON document
//! for the whole clinic, and every patient's [`NoteStore`] writes one binary
//! snapshot file keyed by PHN. Serialization goes through explicit document
//! schemas in [`encode`]; the domain types never derive `Serialize`.

pub mod encode;
pub mod paths;
pub mod patient;
pub mod record;
pub mod store;


pub use patient::{Patient, PatientUpdate};
pub use paths::StorePaths;
pub use record::NoteStore;
pub use store::PatientStore;
