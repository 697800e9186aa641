//! Error types for the clinic record store.

use thiserror::Error;

use crate::Phn;

#[derive(Debug, Error)]
pub enum Error {
  // ── Session ───────────────────────────────────────────────────────────
  #[error("no active session")]
  Unauthorized,

  #[error("a session is already active")]
  DuplicateSession,

  #[error("invalid username or password")]
  InvalidCredentials,

  #[error("no session to log out of")]
  NotLoggedIn,

  #[error("no current patient is set")]
  NoCurrentPatient,

  // ── Keyed stores ──────────────────────────────────────────────────────
  #[error("patient not found: {0}")]
  PatientNotFound(Phn),

  #[error("note not found: {0}")]
  NoteNotFound(u64),

  #[error("a patient with PHN {0} already exists")]
  DuplicatePhn(Phn),

  #[error("patient {0} is the current session patient")]
  ActivePatient(Phn),

  // ── Persistence ───────────────────────────────────────────────────────
  #[error("credentials file line {0} is malformed")]
  MalformedCredentials(usize),

  #[error("patient document key is not a PHN: {0:?}")]
  DocumentKey(String),

  #[error("timestamp parse error: {0}")]
  DateParse(String),

  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),

  #[error("patient document error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("snapshot encode error: {0}")]
  SnapshotEncode(#[from] bincode::error::EncodeError),

  #[error("snapshot decode error: {0}")]
  SnapshotDecode(#[from] bincode::error::DecodeError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
