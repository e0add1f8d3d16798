//! Error types for `mindread-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::game::Phase;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no movie has been chosen yet")]
  NoMovieChosen,

  #[error("game is already over ({0})")]
  GameOver(Phase),

  #[error("no guess provided")]
  EmptyGuess,

  #[error("game is for movie {expected}, got movie {actual}")]
  MovieMismatch { expected: Uuid, actual: Uuid },

  #[error("trivia fact not found: {0}")]
  TriviaNotFound(Uuid),

  #[error("invalid movie: {0}")]
  InvalidMovie(String),

  #[error("invalid trivia: {0}")]
  InvalidTrivia(String),

  #[error("unknown tier: {0:?}")]
  UnknownTier(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
