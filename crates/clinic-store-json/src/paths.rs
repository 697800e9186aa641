//! On-disk layout for the clinic stores.

use std::path::PathBuf;

use clinic_core::Phn;

/// Resolves every file the stores touch from a single data directory.
///
/// ```text
/// <data_dir>/
///   patients.json      # clinic-wide patient document
///   records/
///     <phn>.dat        # one note snapshot per patient
/// ```
#[derive(Debug, Clone)]
pub struct StorePaths {
  data_dir: PathBuf,
}

impl StorePaths {
  pub fn new(data_dir: impl Into<PathBuf>) -> Self {
    Self { data_dir: data_dir.into() }
  }

  pub fn data_dir(&self) -> &PathBuf { &self.data_dir }

  /// The clinic-wide patient document.
  pub fn patient_document(&self) -> PathBuf {
    self.data_dir.join("patients.json")
  }

  /// The directory holding per-patient note snapshots.
  pub fn records_dir(&self) -> PathBuf { self.data_dir.join("records") }

  /// The note snapshot for one patient, keyed by PHN.
  pub fn record_snapshot(&self, phn: Phn) -> PathBuf {
    self.records_dir().join(format!("{phn}.dat"))
  }
}
