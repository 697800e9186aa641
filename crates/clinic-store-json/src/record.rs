//! [`NoteStore`] — one patient's append-mostly note log.

use std::fs;

use clinic_core::{Error, Phn, Result, note::Note};

use crate::{
  encode::{RecordSnapshot, note_from_snapshot, note_to_snapshot},
  paths::StorePaths,
};

/// The per-patient note collection.
///
/// Notes are kept in creation order. Codes are assigned from a counter that
/// never decreases, so a deleted code is never reused. When autosave is on,
/// every mutation rewrites this patient's snapshot file before returning.
#[derive(Debug, Clone)]
pub struct NoteStore {
  phn:      Phn,
  autosave: bool,
  paths:    StorePaths,
  notes:    Vec<Note>,
  counter:  u64,
}

impl NoteStore {
  /// An empty store for a brand-new patient. Nothing is written until the
  /// first mutation.
  pub fn new(phn: Phn, paths: StorePaths, autosave: bool) -> Self {
    Self {
      phn,
      autosave,
      paths,
      notes: Vec::new(),
      counter: 1,
    }
  }

  /// Rebuild the store for an existing patient.
  ///
  /// `document_notes` come from the clinic document; an existing snapshot
  /// file replaces them, since the snapshot is rewritten on every note
  /// mutation while the document only follows patient mutations. The counter
  /// restarts at `max(code) + 1`, or 1 when there are no notes.
  pub fn load(
    phn: Phn,
    paths: StorePaths,
    autosave: bool,
    document_notes: Vec<Note>,
  ) -> Result<Self> {
    let mut store = Self {
      phn,
      autosave,
      paths,
      notes: document_notes,
      counter: 1,
    };
    if let Some(notes) = store.read_snapshot()? {
      store.notes = notes;
    }
    store.counter = store
      .notes
      .iter()
      .map(|n| n.code)
      .max()
      .map_or(1, |max| max + 1);
    Ok(store)
  }

  pub fn phn(&self) -> Phn { self.phn }

  /// Notes in creation order.
  pub fn notes(&self) -> &[Note] { &self.notes }

  pub fn len(&self) -> usize { self.notes.len() }

  pub fn is_empty(&self) -> bool { self.notes.is_empty() }

  // ── Operations ──────────────────────────────────────────────────────────

  /// Append a new note under the next code and return it.
  pub fn create(&mut self, text: &str) -> Result<Note> {
    let note = Note::new(self.counter, text);
    self.counter += 1;
    self.notes.push(note.clone());
    self.persist()?;
    Ok(note)
  }

  /// Look up a note by code. A miss is a normal absent result.
  pub fn search(&self, code: u64) -> Option<Note> {
    self.notes.iter().find(|n| n.code == code).cloned()
  }

  /// All notes whose text contains `query`, case-insensitively, in creation
  /// order.
  pub fn retrieve_by_text(&self, query: &str) -> Vec<Note> {
    let query = query.to_lowercase();
    self
      .notes
      .iter()
      .filter(|n| n.text.to_lowercase().contains(&query))
      .cloned()
      .collect()
  }

  /// Replace a note's text in place, refreshing its timestamp.
  pub fn update(&mut self, code: u64, text: &str) -> Result<Note> {
    let note = self
      .notes
      .iter_mut()
      .find(|n| n.code == code)
      .ok_or(Error::NoteNotFound(code))?;
    note.update_text(text);
    let updated = note.clone();
    self.persist()?;
    Ok(updated)
  }

  /// Remove a note. Its code is never reassigned.
  pub fn delete(&mut self, code: u64) -> Result<()> {
    let index = self
      .notes
      .iter()
      .position(|n| n.code == code)
      .ok_or(Error::NoteNotFound(code))?;
    self.notes.remove(index);
    self.persist()?;
    Ok(())
  }

  /// All notes, most recent first — the reverse of creation order. This is a
  /// deliberate contract distinct from the search/retrieve ordering.
  pub fn list_all(&self) -> Vec<Note> {
    self.notes.iter().rev().cloned().collect()
  }

  // ── Durability ──────────────────────────────────────────────────────────

  fn persist(&self) -> Result<()> {
    if self.autosave { self.save() } else { Ok(()) }
  }

  /// Write this patient's snapshot file, creating the records directory on
  /// first use.
  pub fn save(&self) -> Result<()> {
    fs::create_dir_all(self.paths.records_dir())?;
    let snapshot = RecordSnapshot {
      notes: self.notes.iter().map(note_to_snapshot).collect(),
    };
    let bytes = bincode::encode_to_vec(&snapshot, bincode::config::standard())?;
    fs::write(self.paths.record_snapshot(self.phn), bytes)?;
    tracing::debug!(phn = self.phn, notes = self.notes.len(), "wrote note snapshot");
    Ok(())
  }

  fn read_snapshot(&self) -> Result<Option<Vec<Note>>> {
    let path = self.paths.record_snapshot(self.phn);
    let bytes = match fs::read(&path) {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(e.into()),
    };
    let (snapshot, _): (RecordSnapshot, usize) =
      bincode::decode_from_slice(&bytes, bincode::config::standard())?;
    let notes = snapshot
      .notes
      .iter()
      .map(note_from_snapshot)
      .collect::<Result<Vec<_>>>()?;
    Ok(Some(notes))
  }

  /// Move the snapshot to a new PHN path. Called when the owning patient is
  /// re-keyed; a snapshot that has never been written is fine to miss.
  pub(crate) fn rekey(&mut self, new_phn: Phn) -> Result<()> {
    let old_path = self.paths.record_snapshot(self.phn);
    let new_path = self.paths.record_snapshot(new_phn);
    match fs::rename(&old_path, &new_path) {
      Ok(()) => {}
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
      Err(e) => return Err(e.into()),
    }
    self.phn = new_phn;
    Ok(())
  }

  /// Remove the snapshot file. Called when the owning patient is deleted; a
  /// missing snapshot is fine.
  pub(crate) fn discard_snapshot(&self) -> Result<()> {
    match fs::remove_file(self.paths.record_snapshot(self.phn)) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e.into()),
    }
  }
}
