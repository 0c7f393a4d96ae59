//! Error types for `dealbook-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(#[from] validator::ValidationErrors),

  #[error("malformed input: {0}")]
  Malformed(#[source] serde_json::Error),

  #[error("identifier {} is already in use", display_id(.0))]
  DuplicateId(Option<i64>),

  #[error("unknown field: {0:?}")]
  UnknownField(String),

  #[error("invalid value for field {field:?}: {source}")]
  FieldType {
    field:  String,
    source: serde_json::Error,
  },

  #[error("serialization error: {0}")]
  Serialization(#[source] serde_json::Error),

  #[error(transparent)]
  Connection(#[from] ConnectionError),
}

impl Error {
  /// True for every failure raised while constructing or accepting an
  /// entity, duplicate identifiers included.
  pub fn is_validation(&self) -> bool {
    matches!(
      self,
      Self::Validation(_) | Self::Malformed(_) | Self::DuplicateId(_)
    )
  }
}

/// Failure to obtain a connection from a
/// [`ConnectionProvider`](crate::connection::ConnectionProvider).
#[derive(Debug, Error)]
pub enum ConnectionError {
  #[error("connection to {url} unavailable: {reason}")]
  Unavailable { url: String, reason: String },
}

fn display_id(id: &Option<i64>) -> String {
  match id {
    Some(id) => id.to_string(),
    None => "<none>".to_string(),
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
