//! Note — the record unit of a patient's clinical log.
//!
//! Notes carry an identity (`code`) that is assigned once by the note store
//! and never reused, even after deletion. The timestamp is owned by the
//! store lifecycle: set at creation, refreshed on every text update, and
//! never accepted from callers.

use chrono::{DateTime, Utc};

/// A clinical note. `code` is unique within one patient's note store and
/// assigned monotonically.
#[derive(Debug, Clone)]
pub struct Note {
  pub code:      u64,
  pub text:      String,
  /// Set at creation and on every text update; not user-settable.
  pub timestamp: DateTime<Utc>,
}

impl Note {
  /// Build a note stamped with the current time.
  pub fn new(code: u64, text: impl Into<String>) -> Self {
    Self {
      code,
      text: text.into(),
      timestamp: Utc::now(),
    }
  }

  /// Replace the text in place and refresh the timestamp.
  pub fn update_text(&mut self, text: impl Into<String>) {
    self.text = text.into();
    self.timestamp = Utc::now();
  }
}

/// Two notes are the same note when code and text match; the timestamp is
/// deliberately excluded.
impl PartialEq for Note {
  fn eq(&self, other: &Self) -> bool {
    self.code == other.code && self.text == other.text
  }
}

impl Eq for Note {}
