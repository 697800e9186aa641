//! [`Clinic`] — the session-facing service wrapping the stores.

use clinic_core::{Error, Phn, Result, note::Note};
use clinic_store_json::{Patient, PatientStore, PatientUpdate, StorePaths};

use crate::{credentials::Credentials, gate::SessionGate};

/// The single entry point for callers: owns the session gate, the patient
/// store, and the credential mapping, and checks the gate before every store
/// operation. Note operations act on the session's current patient.
pub struct Clinic {
  gate:        SessionGate,
  store:       PatientStore,
  credentials: Credentials,
}

impl Clinic {
  /// Open the clinic stores under `paths`.
  pub fn open(paths: StorePaths, autosave: bool, credentials: Credentials) -> Result<Self> {
    Ok(Self {
      gate: SessionGate::new(),
      store: PatientStore::open(paths, autosave)?,
      credentials,
    })
  }

  pub fn gate(&self) -> &SessionGate {
    &self.gate
  }

  // ── Session ─────────────────────────────────────────────────────────────

  pub fn login(&mut self, username: &str, password: &str) -> Result<()> {
    self.gate.login(&self.credentials, username, password)
  }

  pub fn logout(&mut self) -> Result<()> {
    self.gate.logout()
  }

  /// Select the session's current patient.
  pub fn set_current_patient(&mut self, phn: Phn) -> Result<()> {
    self.gate.require_authenticated()?;
    if !self.store.contains(phn) {
      return Err(Error::PatientNotFound(phn));
    }
    self.gate.set_current(phn);
    Ok(())
  }

  pub fn get_current_patient(&self) -> Result<Patient> {
    Ok(self.current_patient()?.clone())
  }

  pub fn unset_current_patient(&mut self) -> Result<()> {
    self.gate.clear_current()
  }

  // ── Patients ────────────────────────────────────────────────────────────

  pub fn create_patient(
    &mut self,
    phn: Phn,
    name: &str,
    birth_date: &str,
    phone: &str,
    email: &str,
    address: &str,
  ) -> Result<Patient> {
    self.gate.require_authenticated()?;
    self
      .store
      .create(phn, name, birth_date, phone, email, address)
  }

  /// Look up a patient by PHN; a miss is a normal absent result.
  pub fn search_patient(&self, phn: Phn) -> Result<Option<Patient>> {
    self.gate.require_authenticated()?;
    Ok(self.store.search(phn))
  }

  /// All patients whose name contains `name`, case-insensitively.
  pub fn retrieve_patients(&self, name: &str) -> Result<Vec<Patient>> {
    self.gate.require_authenticated()?;
    Ok(self.store.retrieve_by_name(name))
  }

  /// Update a patient's fields, re-keying when `update.phn` is supplied.
  ///
  /// Re-keying onto the session's current patient's PHN is rejected even
  /// when no other patient holds that key; unset the current patient first.
  /// When the current patient itself is re-keyed to a fresh PHN, the
  /// session's key follows it.
  pub fn update_patient(&mut self, old_phn: Phn, update: PatientUpdate) -> Result<Patient> {
    self.gate.require_authenticated()?;
    if let (Some(new_phn), Some(current)) = (update.phn, self.gate.current_patient())
      && new_phn == current
    {
      return Err(Error::DuplicatePhn(new_phn));
    }
    let updated = self.store.update(old_phn, update)?;
    if self.gate.current_patient() == Some(old_phn) && updated.phn() != old_phn {
      self.gate.set_current(updated.phn());
    }
    Ok(updated)
  }

  /// Delete a patient. The session's current patient must be unset first.
  pub fn delete_patient(&mut self, phn: Phn) -> Result<()> {
    self.gate.require_authenticated()?;
    if self.gate.current_patient() == Some(phn) {
      return Err(Error::ActivePatient(phn));
    }
    self.store.delete(phn)
  }

  /// All patients, insertion order.
  pub fn list_patients(&self) -> Result<Vec<Patient>> {
    self.gate.require_authenticated()?;
    Ok(self.store.list_all())
  }

  // ── Notes (on the current patient) ──────────────────────────────────────

  fn current_patient(&self) -> Result<&Patient> {
    let phn = self.gate.require_current_patient()?;
    self.store.get(phn).ok_or(Error::PatientNotFound(phn))
  }

  fn current_patient_mut(&mut self) -> Result<&mut Patient> {
    let phn = self.gate.require_current_patient()?;
    self.store.get_mut(phn).ok_or(Error::PatientNotFound(phn))
  }

  pub fn create_note(&mut self, text: &str) -> Result<Note> {
    self.current_patient_mut()?.create_note(text)
  }

  pub fn search_note(&self, code: u64) -> Result<Option<Note>> {
    Ok(self.current_patient()?.search_note(code))
  }

  pub fn retrieve_notes(&self, query: &str) -> Result<Vec<Note>> {
    Ok(self.current_patient()?.retrieve_notes(query))
  }

  pub fn update_note(&mut self, code: u64, text: &str) -> Result<Note> {
    self.current_patient_mut()?.update_note(code, text)
  }

  pub fn delete_note(&mut self, code: u64) -> Result<()> {
    self.current_patient_mut()?.delete_note(code)
  }

  /// All of the current patient's notes, most recent first.
  pub fn list_notes(&self) -> Result<Vec<Note>> {
    Ok(self.current_patient()?.list_notes())
  }

  // ── Durability ──────────────────────────────────────────────────────────

  /// Flush the document and every note snapshot — the explicit save for
  /// deferred (autosave-off) mode, e.g. after a batch import.
  pub fn save(&self) -> Result<()> {
    self.gate.require_authenticated()?;
    self.store.save_all()
  }
}
