//! Patient — demographics plus the owned note store.

use clinic_core::{Phn, Result, note::Note};

use crate::{paths::StorePaths, record::NoteStore};

/// A patient's demographic record. Owns exactly one [`NoteStore`], created
/// with the patient and keyed by the patient's PHN.
///
/// The demographic fields are caller-supplied strings with no internal
/// validation; `birth_date` is expected in ISO `YYYY-MM-DD` form but stored
/// verbatim. The PHN is private because changing it must re-key both the
/// clinic document entry and the note snapshot file.
#[derive(Debug, Clone)]
pub struct Patient {
  phn:            Phn,
  pub name:       String,
  pub birth_date: String,
  pub phone:      String,
  pub email:      String,
  pub address:    String,
  record:         NoteStore,
}

impl Patient {
  /// Build a fresh patient with an empty note store.
  #[allow(clippy::too_many_arguments)]
  pub fn new(
    phn: Phn,
    name: impl Into<String>,
    birth_date: impl Into<String>,
    phone: impl Into<String>,
    email: impl Into<String>,
    address: impl Into<String>,
    paths: StorePaths,
    autosave: bool,
  ) -> Self {
    Self {
      phn,
      name: name.into(),
      birth_date: birth_date.into(),
      phone: phone.into(),
      email: email.into(),
      address: address.into(),
      record: NoteStore::new(phn, paths, autosave),
    }
  }

  /// Rebuild a patient from document fields, attaching a loaded note store.
  pub(crate) fn with_record(
    phn: Phn,
    name: String,
    birth_date: String,
    phone: String,
    email: String,
    address: String,
    record: NoteStore,
  ) -> Self {
    Self {
      phn,
      name,
      birth_date,
      phone,
      email,
      address,
      record,
    }
  }

  pub fn phn(&self) -> Phn { self.phn }

  pub fn record(&self) -> &NoteStore { &self.record }

  /// Change the primary key; the note store follows (its snapshot file is
  /// renamed to the new PHN path).
  pub(crate) fn rekey(&mut self, new_phn: Phn) -> Result<()> {
    self.record.rekey(new_phn)?;
    self.phn = new_phn;
    Ok(())
  }

  // ── Note operations, delegated to the owned store ───────────────────────

  pub fn create_note(&mut self, text: &str) -> Result<Note> {
    self.record.create(text)
  }

  pub fn search_note(&self, code: u64) -> Option<Note> {
    self.record.search(code)
  }

  pub fn retrieve_notes(&self, query: &str) -> Vec<Note> {
    self.record.retrieve_by_text(query)
  }

  pub fn update_note(&mut self, code: u64, text: &str) -> Result<Note> {
    self.record.update(code, text)
  }

  pub fn delete_note(&mut self, code: u64) -> Result<()> {
    self.record.delete(code)
  }

  /// All notes, most recent first.
  pub fn list_notes(&self) -> Vec<Note> {
    self.record.list_all()
  }
}

/// Demographic equality; the note store is excluded.
impl PartialEq for Patient {
  fn eq(&self, other: &Self) -> bool {
    self.phn == other.phn
      && self.name == other.name
      && self.birth_date == other.birth_date
      && self.phone == other.phone
      && self.email == other.email
      && self.address == other.address
  }
}

impl Eq for Patient {}

/// Field updates for [`PatientStore::update`](crate::store::PatientStore::update);
/// `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct PatientUpdate {
  pub phn:        Option<Phn>,
  pub name:       Option<String>,
  pub birth_date: Option<String>,
  pub phone:      Option<String>,
  pub email:      Option<String>,
  pub address:    Option<String>,
}
