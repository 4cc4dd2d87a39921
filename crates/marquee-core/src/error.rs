//! Error types for `marquee-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("event payload is missing the user id")]
  MissingUserId,

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
