//! Error type for `mindread-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] mindread_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unexpected column value: {0}")]
  Decode(String),

  /// Attempted to attach trivia to a movie that does not exist.
  #[error("movie not found: {0}")]
  MovieNotFound(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
