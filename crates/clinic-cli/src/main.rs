//! clinic-cli operations binary.
//!
//! Reads `clinic.toml` (or the path specified with `--config`), opens the
//! patient store under the configured data directory, and runs one
//! administrative command against it.
//!
//! # Password hash generation
//!
//! To generate the digest for a `username,hash` line in the users file:
//!
//! ```
//! cargo run -p clinic-cli -- hash-password
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use clinic_core::Phn;
use clinic_session::{Clinic, Credentials, password_digest};
use clinic_store_json::StorePaths;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Clinic record administration")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "clinic.toml")]
  config: PathBuf,

  /// Username to log in as.
  #[arg(short, long, default_value = "admin")]
  username: String,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Print the hex SHA-256 digest for a password entered on stdin and exit.
  HashPassword,

  /// List every patient in the store.
  List,

  /// Import patients (and their notes) from a JSON array, writing the store
  /// once at the end.
  Import {
    /// Path to the JSON file to import.
    file: PathBuf,
  },
}

#[derive(Debug, Clone, Deserialize)]
struct CliConfig {
  /// Directory holding the patient document and note snapshots.
  data_dir:   PathBuf,
  /// Path to the `username,hash` credentials file.
  users_file: PathBuf,
}

/// One patient in an import file.
#[derive(Debug, Deserialize)]
struct ImportPatient {
  phn:          Phn,
  name:         String,
  #[serde(default)]
  birth_date:   String,
  #[serde(default)]
  phone_number: String,
  #[serde(default)]
  email:        String,
  #[serde(default)]
  address:      String,
  #[serde(default)]
  notes:        Vec<String>,
}

fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Helper mode: hash a password and exit.
  if matches!(cli.command, Command::HashPassword) {
    let password = prompt("Password: ")?;
    println!("{}", password_digest(&password));
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .set_default("data_dir", "clinic")?
    .set_default("users_file", "clinic/users.txt")?
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("CLINIC"))
    .build()
    .context("failed to read config file")?;

  let cfg: CliConfig = settings
    .try_deserialize()
    .context("failed to deserialise CliConfig")?;

  let credentials = Credentials::load(&cfg.users_file)
    .with_context(|| format!("failed to read users file {:?}", cfg.users_file))?;
  anyhow::ensure!(!credentials.is_empty(), "users file has no entries");

  // Batch mode: one explicit save at the end instead of a write per change.
  let autosave = !matches!(cli.command, Command::Import { .. });
  let mut clinic = Clinic::open(StorePaths::new(&cfg.data_dir), autosave, credentials)
    .with_context(|| format!("failed to open store under {:?}", cfg.data_dir))?;

  let password = prompt(&format!("Password for {}: ", cli.username))?;
  clinic.login(&cli.username, &password)?;

  match cli.command {
    Command::HashPassword => unreachable!("handled before configuration"),
    Command::List => list(&clinic)?,
    Command::Import { file } => import(&mut clinic, &file)?,
  }

  clinic.logout()?;
  Ok(())
}

fn list(clinic: &Clinic) -> anyhow::Result<()> {
  let patients = clinic.list_patients()?;
  for patient in &patients {
    println!(
      "{:>12}  {}  ({})",
      patient.phn(),
      patient.name,
      patient.birth_date
    );
  }
  tracing::info!(patients = patients.len(), "listed patients");
  Ok(())
}

fn import(clinic: &mut Clinic, file: &Path) -> anyhow::Result<()> {
  let raw = std::fs::read_to_string(file)
    .with_context(|| format!("failed to read import file {file:?}"))?;
  let entries: Vec<ImportPatient> =
    serde_json::from_str(&raw).context("failed to parse import file")?;

  for entry in &entries {
    clinic.create_patient(
      entry.phn,
      &entry.name,
      &entry.birth_date,
      &entry.phone_number,
      &entry.email,
      &entry.address,
    )?;
    if !entry.notes.is_empty() {
      clinic.set_current_patient(entry.phn)?;
      for text in &entry.notes {
        clinic.create_note(text)?;
      }
      clinic.unset_current_patient()?;
    }
  }

  clinic.save().context("failed to write store")?;
  tracing::info!(patients = entries.len(), "import complete");
  Ok(())
}

/// Read a line from stdin after printing `message` (input is echoed).
fn prompt(message: &str) -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("{message}");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}
