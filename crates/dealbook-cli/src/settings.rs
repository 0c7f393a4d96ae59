//! Database settings, read from a `.env` file and the process environment.

use std::path::Path;

use config::{Config, ConfigError, Environment};
use dealbook_core::connection::redact_password;
use serde::Deserialize;

use crate::dotenv;

/// Connection parameters. Keys are matched case-insensitively, so `DB_HOST`
/// in the environment fills `db_host`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  pub db_host: String,
  pub db_port: String,
  pub db_user: String,
  pub db_pass: String,
  pub db_name: String,
}

impl Settings {
  /// Load from defaults, then `env_file` if it exists, then the process
  /// environment. Later sources win.
  pub fn load(env_file: &Path) -> Result<Self, ConfigError> {
    Self::from_sources(Some(env_file), None)
  }

  /// `environment` replaces the process environment when given.
  fn from_sources(
    env_file: Option<&Path>,
    environment: Option<config::Map<String, String>>,
  ) -> Result<Self, ConfigError> {
    let mut builder = Config::builder()
      .set_default("db_host", "postgres")?
      .set_default("db_port", "5432")?;

    if let Some(path) = env_file {
      let pairs =
        dotenv::read(path).map_err(|e| ConfigError::Foreign(Box::new(e)))?;
      builder = builder.add_source(Environment::default().source(Some(pairs)));
    }

    builder
      .add_source(Environment::default().source(environment))
      .build()?
      .try_deserialize()
  }

  pub fn db_url(&self) -> String {
    format!(
      "postgresql+asyncpg://{}:{}@{}:{}/{}",
      self.db_user, self.db_pass, self.db_host, self.db_port, self.db_name
    )
  }

  /// [`Settings::db_url`] with the password masked, for display.
  pub fn redacted_db_url(&self) -> String { redact_password(&self.db_url()) }
}
