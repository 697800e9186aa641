//! [`SessionGate`] — authentication state and the authorization guard.

use clinic_core::{Error, Phn, Result};

use crate::credentials::Credentials;

/// Per-process session state: whether a user is authenticated, and which
/// patient (if any) is the session's current patient.
///
/// An explicit object rather than process-global state, so independent
/// sessions can exist side by side. The current patient is held as its PHN
/// key — a non-owning reference into the patient store.
#[derive(Debug, Default)]
pub struct SessionGate {
  authenticated: bool,
  current:       Option<Phn>,
}

impl SessionGate {
  pub fn new() -> Self {
    Self::default()
  }

  /// Authenticate against the supplied credential mapping.
  pub fn login(
    &mut self,
    credentials: &Credentials,
    username: &str,
    password: &str,
  ) -> Result<()> {
    if self.authenticated {
      return Err(Error::DuplicateSession);
    }
    if !credentials.verify(username, password) {
      return Err(Error::InvalidCredentials);
    }
    self.authenticated = true;
    tracing::info!(username, "session opened");
    Ok(())
  }

  /// End the session, clearing the current patient.
  pub fn logout(&mut self) -> Result<()> {
    if !self.authenticated {
      return Err(Error::NotLoggedIn);
    }
    self.authenticated = false;
    self.current = None;
    tracing::info!("session closed");
    Ok(())
  }

  pub fn is_authenticated(&self) -> bool {
    self.authenticated
  }

  /// Guard used by every store-facing operation.
  pub fn require_authenticated(&self) -> Result<()> {
    if self.authenticated {
      Ok(())
    } else {
      Err(Error::Unauthorized)
    }
  }

  /// The current patient's PHN, if one is set.
  pub fn current_patient(&self) -> Option<Phn> {
    self.current
  }

  /// The current patient's PHN, or `NoCurrentPatient`.
  pub fn require_current_patient(&self) -> Result<Phn> {
    self.require_authenticated()?;
    self.current.ok_or(Error::NoCurrentPatient)
  }

  /// Record the current patient. Presence in the patient store is the
  /// caller's check; the gate only holds the key.
  pub(crate) fn set_current(&mut self, phn: Phn) {
    self.current = Some(phn);
  }

  /// Clear the current patient.
  pub fn clear_current(&mut self) -> Result<()> {
    self.require_authenticated()?;
    if self.current.take().is_none() {
      return Err(Error::NoCurrentPatient);
    }
    Ok(())
  }
}
