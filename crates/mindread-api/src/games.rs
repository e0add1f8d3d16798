//! Handlers for `/games` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/games` | Optional body `{"movie_id":"..."}` to choose at once; 201 |
//! | `GET`    | `/games/:id` | Current [`GameView`] |
//! | `PUT`    | `/games/:id/movie` | Body: `{"movie_id":"..."}` |
//! | `POST`   | `/games/:id/guesses` | Body: `{"guess":"..."}`; returns a [`GuessOutcome`] |
//! | `DELETE` | `/games/:id` | 204 |
//!
//! A guess holds the game's lock from loading the movie through storing the
//! next state.

use std::sync::PoisonError;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use mindread_core::{
  game::{GameState, Guess, GuessOutcome, Phase, RevealedFact},
  store::MovieStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiState, error::ApiError, registry::GameHandle};

/// A game as reported to clients.
///
/// Both players poll the same endpoint, so the chosen movie stays hidden
/// until the game is over.
#[derive(Debug, Serialize)]
pub struct GameView {
  pub game_id:            Uuid,
  pub phase:              Phase,
  pub movie_chosen:       bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub movie_id:           Option<Uuid>,
  pub attempts_remaining: u32,
  pub guesses:            Vec<Guess>,
  pub revealed:           Vec<RevealedFact>,
  pub score:              Option<u32>,
  pub started_at:         DateTime<Utc>,
  pub game_over:          bool,
}

impl From<GameState> for GameView {
  fn from(state: GameState) -> Self {
    let game_over = state.is_over();
    Self {
      game_id: state.game_id,
      phase: state.phase,
      movie_chosen: state.movie_id.is_some(),
      movie_id: state.movie_id.filter(|_| game_over),
      attempts_remaining: state.attempts_remaining,
      guesses: state.guesses,
      revealed: state.revealed,
      score: state.score,
      started_at: state.started_at,
      game_over,
    }
  }
}

async fn handle<S>(state: &ApiState<S>, id: Uuid) -> Result<GameHandle, ApiError> {
  state
    .games
    .get(id)
    .await
    .ok_or_else(|| ApiError::NotFound(format!("game {id} not found")))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CreateBody {
  pub movie_id: Option<Uuid>,
}

/// `POST /games`
///
/// The body is optional; without one the game starts in the choosing phase.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  body: Option<Json<CreateBody>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MovieStore,
{
  let body = body.map(|Json(b)| b).unwrap_or_default();

  let mut game = GameState::new();
  if let Some(movie_id) = body.movie_id {
    crate::movies::load_movie(&state, movie_id).await?;
    game = game.choose(movie_id)?;
  }

  tracing::info!(game_id = %game.game_id, movie_id = ?game.movie_id, "game created");
  state.games.insert(game.clone()).await;
  Ok((StatusCode::CREATED, Json(GameView::from(game))))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /games/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<GameView>, ApiError>
where
  S: MovieStore,
{
  let game = handle(&state, id).await?;
  let snapshot = game.lock().await.clone();
  Ok(Json(snapshot.into()))
}

// ─── Choose ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChooseBody {
  pub movie_id: Uuid,
}

/// `PUT /games/:id/movie`
pub async fn choose<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ChooseBody>,
) -> Result<Json<GameView>, ApiError>
where
  S: MovieStore,
{
  let game = handle(&state, id).await?;
  crate::movies::load_movie(&state, body.movie_id).await?;

  let mut current = game.lock().await;
  let next = current.choose(body.movie_id)?;
  *current = next.clone();
  tracing::info!(game_id = %id, movie_id = %body.movie_id, "movie chosen");
  Ok(Json(next.into()))
}

// ─── Guess ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GuessBody {
  pub guess: String,
}

/// `POST /games/:id/guesses`
pub async fn guess<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<GuessBody>,
) -> Result<Json<GuessOutcome>, ApiError>
where
  S: MovieStore,
{
  let game = handle(&state, id).await?;
  let mut current = game.lock().await;

  if current.is_over() {
    return Err(mindread_core::Error::GameOver(current.phase).into());
  }
  let movie_id = current.movie_id.ok_or(mindread_core::Error::NoMovieChosen)?;
  let movie = crate::movies::load_movie(&state, movie_id).await?;

  let curated = match state.store.trivia_for(movie_id, None).await {
    Ok(facts) => facts,
    Err(e) => {
      tracing::warn!(game_id = %id, %movie_id, error = %e, "curated trivia unavailable");
      Vec::new()
    }
  };

  let (next, outcome) = {
    let mut rng = state.rng.lock().unwrap_or_else(PoisonError::into_inner);
    current.guess(&movie, &curated, &body.guess, &mut *rng)?
  };
  *current = next;
  Ok(Json(outcome))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /games/:id`
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: MovieStore,
{
  if state.games.remove(id).await {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("game {id} not found")))
  }
}
