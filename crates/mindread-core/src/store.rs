//! The `MovieStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `mindread-store-sqlite`). Higher layers (`mindread-api`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  movie::{Movie, NewMovie},
  trivia::{NewTrivia, Tier, TriviaFact},
};

/// Longest search string honoured by [`MovieStore::search_movies`].
pub const MAX_QUERY_LEN: usize = 100;
/// Default result cap for [`MovieStore::search_movies`].
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`MovieStore::search_movies`].
#[derive(Debug, Clone, Default)]
pub struct MovieQuery {
  /// Matched case-insensitively against title, release year, director name
  /// and genre names.
  pub text:  String,
  pub limit: Option<usize>,
}

impl MovieQuery {
  pub fn new(text: impl Into<String>) -> Self {
    Self { text: text.into(), limit: None }
  }

  /// The search text, trimmed and capped at [`MAX_QUERY_LEN`] characters.
  pub fn normalized_text(&self) -> String {
    self.text.trim().chars().take(MAX_QUERY_LEN).collect()
  }

  pub fn effective_limit(&self) -> usize {
    self.limit.unwrap_or(DEFAULT_SEARCH_LIMIT).min(DEFAULT_SEARCH_LIMIT)
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Movie Mindread catalogue backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait MovieStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Movies ────────────────────────────────────────────────────────────

  /// Validate and persist a new movie with its people and companies.
  fn add_movie(
    &self,
    input: NewMovie,
  ) -> impl Future<Output = Result<Movie, Self::Error>> + Send + '_;

  /// Retrieve a fully-populated movie. Returns `None` if not found.
  fn get_movie(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Movie>, Self::Error>> + Send + '_;

  /// All movies, ordered by title.
  fn list_movies(
    &self,
  ) -> impl Future<Output = Result<Vec<Movie>, Self::Error>> + Send + '_;

  /// Movies matching `query`. An empty query matches nothing.
  fn search_movies<'a>(
    &'a self,
    query: &'a MovieQuery,
  ) -> impl Future<Output = Result<Vec<Movie>, Self::Error>> + Send + 'a;

  /// Delete a movie and its curated trivia. Returns `false` if it did not
  /// exist.
  fn delete_movie(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Curated trivia ────────────────────────────────────────────────────

  /// Record a curated fact for an existing movie.
  fn add_trivia(
    &self,
    input: NewTrivia,
  ) -> impl Future<Output = Result<TriviaFact, Self::Error>> + Send + '_;

  /// Curated facts for a movie, optionally restricted to one tier, in
  /// insertion order.
  fn trivia_for(
    &self,
    movie_id: Uuid,
    tier: Option<Tier>,
  ) -> impl Future<Output = Result<Vec<TriviaFact>, Self::Error>> + Send + '_;

  /// Delete one curated fact. Returns `false` if it did not exist.
  fn delete_trivia(
    &self,
    trivia_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
