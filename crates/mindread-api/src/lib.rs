//! JSON REST API for Movie Mindread.
//!
//! Exposes an axum [`Router`] backed by any
//! [`mindread_core::store::MovieStore`]. Games live in memory for the life of
//! the process, or until the registry sweeps them; transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", mindread_api::api_router(ApiState::new(store.clone())))
//! ```

pub mod error;
pub mod games;
pub mod movies;
pub mod registry;
pub mod trivia;

#[cfg(test)]
mod tests;

use std::sync::{Arc, Mutex};

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use mindread_core::store::MovieStore;
use rand::{SeedableRng, rngs::StdRng};

pub use error::ApiError;
pub use registry::{GameRegistry, Retention};

// ─── State ───────────────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store: Arc<S>,
  pub games: Arc<GameRegistry>,
  /// Only locked for the synchronous trivia selection.
  pub rng:   Arc<Mutex<StdRng>>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store: self.store.clone(),
      games: self.games.clone(),
      rng:   self.rng.clone(),
    }
  }
}

impl<S> ApiState<S> {
  /// State with an empty game registry and an entropy-seeded RNG.
  pub fn new(store: Arc<S>) -> Self {
    Self::with_rng(store, StdRng::from_entropy())
  }

  /// State with a caller-supplied RNG, for reproducible games.
  pub fn with_rng(store: Arc<S>, rng: StdRng) -> Self {
    Self {
      store,
      games: Arc::new(GameRegistry::new()),
      rng: Arc::new(Mutex::new(rng)),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: MovieStore + 'static,
{
  Router::new()
    // Movies
    .route("/movies", get(movies::list::<S>).post(movies::create::<S>))
    .route(
      "/movies/{id}",
      get(movies::get_one::<S>).delete(movies::delete_one::<S>),
    )
    // Curated trivia
    .route(
      "/movies/{id}/trivia",
      get(trivia::list::<S>).post(trivia::create::<S>),
    )
    .route("/trivia/{id}", delete(trivia::delete_one::<S>))
    // Games
    .route("/games", post(games::create::<S>))
    .route(
      "/games/{id}",
      get(games::get_one::<S>).delete(games::delete_one::<S>),
    )
    .route("/games/{id}/movie", put(games::choose::<S>))
    .route("/games/{id}/guesses", post(games::guess::<S>))
    .with_state(state)
}
