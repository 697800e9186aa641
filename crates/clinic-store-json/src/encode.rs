//! Serialization schemas for the on-disk formats, decoupled from the domain
//! types.
//!
//! The patient document is JSON: one object keyed by the decimal form of the
//! PHN, each value a [`PatientDoc`]. Note snapshots are bincode-encoded
//! [`RecordSnapshot`]s, an internal structural dump with no cross-version
//! compatibility promise. Timestamps are RFC 3339 strings in both formats.

use bincode::{Decode, Encode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clinic_core::{Error, Phn, Result, note::Note};

// ─── Patient document ────────────────────────────────────────────────────────

/// One patient entry in the clinic document.
#[derive(Debug, Serialize, Deserialize)]
pub struct PatientDoc {
  pub phn:          Phn,
  pub name:         String,
  pub birth_date:   String,
  pub phone_number: String,
  pub email:        String,
  pub address:      String,
  #[serde(default)]
  pub record:       RecordDoc,
}

/// The note data embedded with a patient entry.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RecordDoc {
  #[serde(default)]
  pub notes: Vec<NoteDoc>,
}

/// A note as embedded in the JSON document.
#[derive(Debug, Serialize, Deserialize)]
pub struct NoteDoc {
  pub code:      u64,
  pub text:      String,
  pub timestamp: String,
}

// ─── Note snapshot ───────────────────────────────────────────────────────────

/// The payload of a per-patient `records/<phn>.dat` file.
#[derive(Debug, Encode, Decode)]
pub struct RecordSnapshot {
  pub notes: Vec<NoteSnapshot>,
}

#[derive(Debug, Encode, Decode)]
pub struct NoteSnapshot {
  pub code:      u64,
  pub text:      String,
  pub timestamp: String,
}

// ─── Timestamps ──────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Keys ────────────────────────────────────────────────────────────────────

/// Parse a document key into a PHN.
///
/// Keys are always the decimal form of the PHN; anything else is a malformed
/// document, not a coercion candidate.
pub fn decode_phn_key(key: &str) -> Result<Phn> {
  key.parse().map_err(|_| Error::DocumentKey(key.to_owned()))
}

// ─── Note mapping ────────────────────────────────────────────────────────────

pub fn note_to_doc(note: &Note) -> NoteDoc {
  NoteDoc {
    code:      note.code,
    text:      note.text.clone(),
    timestamp: encode_dt(note.timestamp),
  }
}

pub fn note_from_doc(doc: &NoteDoc) -> Result<Note> {
  Ok(Note {
    code:      doc.code,
    text:      doc.text.clone(),
    timestamp: decode_dt(&doc.timestamp)?,
  })
}

pub fn note_to_snapshot(note: &Note) -> NoteSnapshot {
  NoteSnapshot {
    code:      note.code,
    text:      note.text.clone(),
    timestamp: encode_dt(note.timestamp),
  }
}

pub fn note_from_snapshot(snap: &NoteSnapshot) -> Result<Note> {
  Ok(Note {
    code:      snap.code,
    text:      snap.text.clone(),
    timestamp: decode_dt(&snap.timestamp)?,
  })
}
