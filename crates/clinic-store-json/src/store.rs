//! [`PatientStore`] — the clinic-wide keyed patient collection.

use std::fs;

use serde_json::{Map, Value};

use clinic_core::{Error, Phn, Result};

use crate::{
  encode::{PatientDoc, RecordDoc, decode_phn_key, note_from_doc, note_to_doc},
  patient::{Patient, PatientUpdate},
  paths::StorePaths,
  record::NoteStore,
};

/// Insertion-ordered, PHN-unique collection of patients, durably backed by
/// one JSON document.
///
/// A `Vec` with linear key lookup is the in-memory shape: it preserves
/// insertion order exactly and a single clinic's roster never grows past the
/// point where a scan matters. Uniqueness is enforced by the operations.
///
/// Session-dependent conflict rules (deleting or re-keying onto the current
/// session patient) are enforced by the session layer, which owns that state;
/// this type enforces only the keyed-store invariants.
#[derive(Debug)]
pub struct PatientStore {
  patients: Vec<Patient>,
  paths:    StorePaths,
  autosave: bool,
}

impl PatientStore {
  /// Open the store, loading the patient document if one exists. A missing
  /// document yields an empty store, not an error.
  pub fn open(paths: StorePaths, autosave: bool) -> Result<Self> {
    let mut store = Self {
      patients: Vec::new(),
      paths,
      autosave,
    };
    store.load()?;
    Ok(store)
  }

  pub fn paths(&self) -> &StorePaths { &self.paths }

  pub fn autosave(&self) -> bool { self.autosave }

  fn load(&mut self) -> Result<()> {
    let path = self.paths.patient_document();
    let raw = match fs::read_to_string(&path) {
      Ok(raw) => raw,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        tracing::debug!(path = %path.display(), "no patient document, starting empty");
        return Ok(());
      }
      Err(e) => return Err(e.into()),
    };

    // serde_json's preserve_order feature keeps document order, which is the
    // store's insertion order.
    let document: Map<String, Value> = serde_json::from_str(&raw)?;
    for (key, value) in document {
      let phn = decode_phn_key(&key)?;
      let doc: PatientDoc = serde_json::from_value(value)?;
      let notes = doc
        .record
        .notes
        .iter()
        .map(note_from_doc)
        .collect::<Result<Vec<_>>>()?;
      let record = NoteStore::load(phn, self.paths.clone(), self.autosave, notes)?;
      self.patients.push(Patient::with_record(
        phn,
        doc.name,
        doc.birth_date,
        doc.phone_number,
        doc.email,
        doc.address,
        record,
      ));
    }
    tracing::info!(patients = self.patients.len(), "loaded patient document");
    Ok(())
  }

  // ── Operations ──────────────────────────────────────────────────────────

  /// Insert a new patient under `phn`. The PHN must be unused.
  pub fn create(
    &mut self,
    phn: Phn,
    name: &str,
    birth_date: &str,
    phone: &str,
    email: &str,
    address: &str,
  ) -> Result<Patient> {
    if self.contains(phn) {
      return Err(Error::DuplicatePhn(phn));
    }
    let patient = Patient::new(
      phn,
      name,
      birth_date,
      phone,
      email,
      address,
      self.paths.clone(),
      self.autosave,
    );
    self.patients.push(patient.clone());
    self.persist()?;
    Ok(patient)
  }

  /// Look up a patient by PHN. A miss is a normal absent result.
  pub fn search(&self, phn: Phn) -> Option<Patient> {
    self.patients.iter().find(|p| p.phn() == phn).cloned()
  }

  pub fn contains(&self, phn: Phn) -> bool {
    self.patients.iter().any(|p| p.phn() == phn)
  }

  /// Borrow a patient without cloning its note store.
  pub fn get(&self, phn: Phn) -> Option<&Patient> {
    self.patients.iter().find(|p| p.phn() == phn)
  }

  /// Borrow a patient for in-place note operations.
  pub fn get_mut(&mut self, phn: Phn) -> Option<&mut Patient> {
    self.patients.iter_mut().find(|p| p.phn() == phn)
  }

  /// All patients whose name contains `query`, case-insensitively, in
  /// insertion order.
  pub fn retrieve_by_name(&self, query: &str) -> Vec<Patient> {
    let query = query.to_lowercase();
    self
      .patients
      .iter()
      .filter(|p| p.name.to_lowercase().contains(&query))
      .cloned()
      .collect()
  }

  /// Overwrite the supplied fields of the patient at `old_phn`, re-keying
  /// the entry when a new PHN is given. Re-keying to the same value is a
  /// permitted no-op; re-keying onto another patient's PHN is rejected.
  pub fn update(&mut self, old_phn: Phn, update: PatientUpdate) -> Result<Patient> {
    let index = self
      .patients
      .iter()
      .position(|p| p.phn() == old_phn)
      .ok_or(Error::PatientNotFound(old_phn))?;
    if let Some(new_phn) = update.phn
      && new_phn != old_phn
      && self.contains(new_phn)
    {
      return Err(Error::DuplicatePhn(new_phn));
    }

    let patient = &mut self.patients[index];
    if let Some(new_phn) = update.phn
      && new_phn != old_phn
    {
      patient.rekey(new_phn)?;
    }
    if let Some(name) = update.name {
      patient.name = name;
    }
    if let Some(birth_date) = update.birth_date {
      patient.birth_date = birth_date;
    }
    if let Some(phone) = update.phone {
      patient.phone = phone;
    }
    if let Some(email) = update.email {
      patient.email = email;
    }
    if let Some(address) = update.address {
      patient.address = address;
    }
    let updated = patient.clone();
    self.persist()?;
    Ok(updated)
  }

  /// Remove the patient at `phn`, discarding its note snapshot file.
  pub fn delete(&mut self, phn: Phn) -> Result<()> {
    let index = self
      .patients
      .iter()
      .position(|p| p.phn() == phn)
      .ok_or(Error::PatientNotFound(phn))?;
    let patient = self.patients.remove(index);
    patient.record().discard_snapshot()?;
    self.persist()?;
    Ok(())
  }

  /// All patients, insertion order.
  pub fn list_all(&self) -> Vec<Patient> {
    self.patients.clone()
  }

  pub fn len(&self) -> usize { self.patients.len() }

  pub fn is_empty(&self) -> bool { self.patients.is_empty() }

  // ── Durability ──────────────────────────────────────────────────────────

  fn persist(&self) -> Result<()> {
    if self.autosave { self.save() } else { Ok(()) }
  }

  /// Write the whole patient document, replacing any previous content.
  pub fn save(&self) -> Result<()> {
    fs::create_dir_all(self.paths.data_dir())?;
    let mut document = Map::new();
    for patient in &self.patients {
      let doc = PatientDoc {
        phn:          patient.phn(),
        name:         patient.name.clone(),
        birth_date:   patient.birth_date.clone(),
        phone_number: patient.phone.clone(),
        email:        patient.email.clone(),
        address:      patient.address.clone(),
        record:       RecordDoc {
          notes: patient.record().notes().iter().map(note_to_doc).collect(),
        },
      };
      document.insert(patient.phn().to_string(), serde_json::to_value(doc)?);
    }
    let rendered = serde_json::to_string_pretty(&Value::Object(document))?;
    fs::write(self.paths.patient_document(), rendered)?;
    tracing::debug!(patients = self.patients.len(), "wrote patient document");
    Ok(())
  }

  /// Flush the document and every patient's note snapshot — the explicit
  /// counterpart of autosave for batch (deferred-durability) mode.
  pub fn save_all(&self) -> Result<()> {
    self.save()?;
    for patient in &self.patients {
      patient.record().save()?;
    }
    Ok(())
  }
}
