//! Handlers for curated trivia.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/movies/:id/trivia` | Optional `?tier=hard\|medium\|easy` |
//! | `POST`   | `/movies/:id/trivia` | Body: `{"tier":"hard","text":"..."}` |
//! | `DELETE` | `/trivia/:id` | 204 |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use mindread_core::{
  store::MovieStore,
  trivia::{NewTrivia, Tier, TriviaFact},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError, movies::load_movie};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Parsed leniently so an unknown tier is a 400, not a rejection.
  pub tier: Option<String>,
}

/// `GET /movies/:id/trivia[?tier=<tier>]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Path(movie_id): Path<Uuid>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<TriviaFact>>, ApiError>
where
  S: MovieStore,
{
  let tier = params.tier.as_deref().map(str::parse::<Tier>).transpose()?;
  load_movie(&state, movie_id).await?;
  let facts = state
    .store
    .trivia_for(movie_id, tier)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(facts))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub tier: Tier,
  pub text: String,
}

/// `POST /movies/:id/trivia`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Path(movie_id): Path<Uuid>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MovieStore,
{
  let input = NewTrivia::new(movie_id, body.tier, body.text);
  input.validate()?;
  load_movie(&state, movie_id).await?;

  let fact = state.store.add_trivia(input).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(fact)))
}

/// `DELETE /trivia/:id`
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  Path(trivia_id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: MovieStore,
{
  if state.store.delete_trivia(trivia_id).await.map_err(ApiError::store)? {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(mindread_core::Error::TriviaNotFound(trivia_id).into())
  }
}
