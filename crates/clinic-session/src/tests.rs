//! Session-level tests: the authorization gate and the conflict rules that
//! depend on the session's current patient.

use tempfile::TempDir;

use clinic_core::Error;
use clinic_store_json::{PatientUpdate, StorePaths};

use crate::{Clinic, Credentials};

fn credentials() -> Credentials {
  let mut creds = Credentials::new();
  creds.add_user("reception", "clinic2024");
  creds
}

fn clinic(autosave: bool) -> (TempDir, Clinic) {
  let dir = TempDir::new().expect("temp dir");
  let clinic = Clinic::open(StorePaths::new(dir.path()), autosave, credentials())
    .expect("open clinic");
  (dir, clinic)
}

fn logged_in(autosave: bool) -> (TempDir, Clinic) {
  let (dir, mut clinic) = clinic(autosave);
  clinic.login("reception", "clinic2024").unwrap();
  (dir, clinic)
}

// ─── Login / logout ──────────────────────────────────────────────────────────

#[test]
fn login_rejects_unknown_user_and_wrong_password() {
  let (_dir, mut clinic) = clinic(true);

  let err = clinic.login("nobody", "clinic2024").unwrap_err();
  assert!(matches!(err, Error::InvalidCredentials));

  let err = clinic.login("reception", "wrong").unwrap_err();
  assert!(matches!(err, Error::InvalidCredentials));

  assert!(!clinic.gate().is_authenticated());
}

#[test]
fn double_login_is_rejected() {
  let (_dir, mut clinic) = logged_in(true);
  let err = clinic.login("reception", "clinic2024").unwrap_err();
  assert!(matches!(err, Error::DuplicateSession));
}

#[test]
fn logout_without_session_is_rejected() {
  let (_dir, mut clinic) = clinic(true);
  let err = clinic.logout().unwrap_err();
  assert!(matches!(err, Error::NotLoggedIn));
}

#[test]
fn store_operations_require_an_active_session() {
  let (_dir, mut clinic) = clinic(true);

  assert!(matches!(
    clinic.create_patient(1, "John Doe", "", "", "", "").unwrap_err(),
    Error::Unauthorized
  ));
  assert!(matches!(clinic.search_patient(1).unwrap_err(), Error::Unauthorized));
  assert!(matches!(clinic.list_patients().unwrap_err(), Error::Unauthorized));
  assert!(matches!(clinic.list_notes().unwrap_err(), Error::Unauthorized));
  assert!(matches!(clinic.set_current_patient(1).unwrap_err(), Error::Unauthorized));
}

#[test]
fn logout_clears_the_current_patient() {
  let (_dir, mut clinic) = logged_in(true);

  clinic.create_patient(1, "John Doe", "", "", "", "").unwrap();
  clinic.set_current_patient(1).unwrap();
  clinic.logout().unwrap();
  clinic.login("reception", "clinic2024").unwrap();

  let err = clinic.get_current_patient().unwrap_err();
  assert!(matches!(err, Error::NoCurrentPatient));
}

// ─── Current patient ─────────────────────────────────────────────────────────

#[test]
fn set_current_patient_requires_an_existing_patient() {
  let (_dir, mut clinic) = logged_in(true);
  let err = clinic.set_current_patient(404).unwrap_err();
  assert!(matches!(err, Error::PatientNotFound(404)));
}

#[test]
fn get_and_unset_require_a_current_patient() {
  let (_dir, mut clinic) = logged_in(true);

  assert!(matches!(
    clinic.get_current_patient().unwrap_err(),
    Error::NoCurrentPatient
  ));
  assert!(matches!(
    clinic.unset_current_patient().unwrap_err(),
    Error::NoCurrentPatient
  ));
}

#[test]
fn delete_of_current_patient_is_blocked_until_unset() {
  let (_dir, mut clinic) = logged_in(true);

  clinic.create_patient(1, "John Doe", "", "", "", "").unwrap();
  clinic.set_current_patient(1).unwrap();

  let err = clinic.delete_patient(1).unwrap_err();
  assert!(matches!(err, Error::ActivePatient(1)));
  assert!(clinic.search_patient(1).unwrap().is_some());

  clinic.unset_current_patient().unwrap();
  clinic.delete_patient(1).unwrap();
  assert!(clinic.search_patient(1).unwrap().is_none());
}

#[test]
fn rekey_onto_the_current_patients_phn_is_rejected() {
  let (_dir, mut clinic) = logged_in(true);

  clinic.create_patient(1, "John Doe", "", "", "", "").unwrap();
  clinic.create_patient(2, "Jane Roe", "", "", "", "").unwrap();
  clinic.set_current_patient(2).unwrap();

  let err = clinic
    .update_patient(1, PatientUpdate { phn: Some(2), ..Default::default() })
    .unwrap_err();
  assert!(matches!(err, Error::DuplicatePhn(2)));
  assert_eq!(clinic.search_patient(1).unwrap().unwrap().name, "John Doe");
}

#[test]
fn current_patient_cannot_rekey_to_its_own_phn() {
  // The conflict rule fires on the current patient's own key too; the
  // patient must be unset before any re-key involving that value.
  let (_dir, mut clinic) = logged_in(true);

  clinic.create_patient(2, "Jane Roe", "", "", "", "").unwrap();
  clinic.set_current_patient(2).unwrap();

  let err = clinic
    .update_patient(2, PatientUpdate { phn: Some(2), ..Default::default() })
    .unwrap_err();
  assert!(matches!(err, Error::DuplicatePhn(2)));
}

#[test]
fn session_key_follows_a_rekeyed_current_patient() {
  let (_dir, mut clinic) = logged_in(true);

  clinic.create_patient(1, "John Doe", "", "", "", "").unwrap();
  clinic.set_current_patient(1).unwrap();

  clinic
    .update_patient(1, PatientUpdate { phn: Some(9), ..Default::default() })
    .unwrap();

  assert_eq!(clinic.get_current_patient().unwrap().phn(), 9);
  clinic.create_note("still attached").unwrap();
  assert_eq!(clinic.list_notes().unwrap()[0].text, "still attached");
}

// ─── Patient update conflicts ────────────────────────────────────────────────

#[test]
fn rekey_onto_another_patient_fails_and_leaves_the_original_unchanged() {
  let (_dir, mut clinic) = logged_in(true);

  clinic
    .create_patient(1, "John Doe", "1990-01-15", "555", "jd@example.com", "123 Main St")
    .unwrap();
  clinic.create_patient(2, "Jane Roe", "", "", "", "").unwrap();

  let err = clinic
    .update_patient(1, PatientUpdate { phn: Some(2), ..Default::default() })
    .unwrap_err();
  assert!(matches!(err, Error::DuplicatePhn(2)));

  let original = clinic.search_patient(1).unwrap().unwrap();
  assert_eq!(original.name, "John Doe");
  assert_eq!(original.birth_date, "1990-01-15");
}

// ─── Notes through the session ───────────────────────────────────────────────

#[test]
fn note_operations_require_a_current_patient() {
  let (_dir, mut clinic) = logged_in(true);
  clinic.create_patient(1, "John Doe", "", "", "", "").unwrap();

  assert!(matches!(clinic.create_note("x").unwrap_err(), Error::NoCurrentPatient));
  assert!(matches!(clinic.search_note(1).unwrap_err(), Error::NoCurrentPatient));
  assert!(matches!(clinic.list_notes().unwrap_err(), Error::NoCurrentPatient));
}

#[test]
fn john_doe_note_scenario() {
  let (_dir, mut clinic) = logged_in(true);

  clinic
    .create_patient(9790012000, "John Doe", "1990-01-15", "250-555-0199", "jd@example.com", "123 Main St")
    .unwrap();
  clinic.set_current_patient(9790012000).unwrap();

  clinic.create_note("headache").unwrap();
  clinic.create_note("follow-up").unwrap();

  let listed = clinic.list_notes().unwrap();
  let texts: Vec<_> = listed.iter().map(|n| n.text.as_str()).collect();
  assert_eq!(texts, ["follow-up", "headache"]);

  let hits = clinic.retrieve_notes("head").unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].text, "headache");
}

#[test]
fn note_updates_and_deletes_reach_the_store() {
  let (_dir, mut clinic) = logged_in(true);

  clinic.create_patient(1, "John Doe", "", "", "", "").unwrap();
  clinic.set_current_patient(1).unwrap();

  let note = clinic.create_note("initial complaint").unwrap();
  clinic.update_note(note.code, "revised complaint").unwrap();
  assert_eq!(
    clinic.search_note(note.code).unwrap().unwrap().text,
    "revised complaint"
  );

  clinic.delete_note(note.code).unwrap();
  assert!(clinic.search_note(note.code).unwrap().is_none());
  assert!(matches!(
    clinic.update_note(note.code, "gone").unwrap_err(),
    Error::NoteNotFound(_)
  ));
}

// ─── Deferred durability ─────────────────────────────────────────────────────

#[test]
fn batch_mode_defers_all_writes_until_save() {
  let (dir, mut clinic) = logged_in(false);

  clinic.create_patient(1, "John Doe", "", "", "", "").unwrap();
  clinic.set_current_patient(1).unwrap();
  clinic.create_note("imported history").unwrap();

  assert!(!dir.path().join("patients.json").exists());
  assert!(!dir.path().join("records/1.dat").exists());

  clinic.save().unwrap();

  let mut reopened =
    Clinic::open(StorePaths::new(dir.path()), false, credentials()).unwrap();
  reopened.login("reception", "clinic2024").unwrap();
  assert_eq!(reopened.list_patients().unwrap().len(), 1);
  reopened.set_current_patient(1).unwrap();
  assert_eq!(reopened.list_notes().unwrap()[0].text, "imported history");
}
