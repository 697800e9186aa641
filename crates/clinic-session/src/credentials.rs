//! Credential mapping and password digests.

use std::{
  collections::HashMap,
  fs::File,
  io::{BufRead, BufReader},
  path::Path,
};

use sha2::{Digest, Sha256};

use clinic_core::{Error, Result};

/// Hex SHA-256 digest of a plaintext password.
pub fn password_digest(password: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(password.as_bytes());
  hex::encode(hasher.finalize())
}

/// Username → password-digest mapping.
///
/// The on-disk form is one `username,hash` pair per line, where `hash` is the
/// hex SHA-256 digest of the password. Blank lines are skipped.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
  users: HashMap<String, String>,
}

impl Credentials {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a user, hashing the plaintext password. Mostly useful for
  /// tests and bootstrap tooling; production credentials come from a file.
  pub fn add_user(&mut self, username: impl Into<String>, password: &str) {
    self.users.insert(username.into(), password_digest(password));
  }

  /// Parse `username,hash` lines.
  pub fn from_reader(reader: impl BufRead) -> Result<Self> {
    let mut users = HashMap::new();
    for (index, line) in reader.lines().enumerate() {
      let line = line?;
      let line = line.trim();
      if line.is_empty() {
        continue;
      }
      let (username, hash) = line
        .split_once(',')
        .ok_or(Error::MalformedCredentials(index + 1))?;
      users.insert(username.trim().to_owned(), hash.trim().to_owned());
    }
    Ok(Self { users })
  }

  /// Load a credentials file.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    Self::from_reader(BufReader::new(File::open(path)?))
  }

  pub fn is_empty(&self) -> bool {
    self.users.is_empty()
  }

  /// Check a username/password pair against the stored digests.
  pub fn verify(&self, username: &str, password: &str) -> bool {
    self
      .users
      .get(username)
      .is_some_and(|hash| *hash == password_digest(password))
  }
}
