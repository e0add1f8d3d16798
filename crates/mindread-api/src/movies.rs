//! Handlers for `/movies` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/movies` | Optional `?query=` search and `&limit=` |
//! | `POST`   | `/movies` | Body: [`NewMovie`]; returns 201 + stored movie |
//! | `GET`    | `/movies/:id` | 404 if not found |
//! | `DELETE` | `/movies/:id` | 204; curated trivia goes with it |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use mindread_core::{
  movie::{Movie, NewMovie},
  store::{MovieQuery, MovieStore},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── List / search ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Free-text search over title, year, director and genre.
  pub query: Option<String>,
  pub limit: Option<usize>,
}

/// `GET /movies[?query=<text>][&limit=<n>]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Movie>>, ApiError>
where
  S: MovieStore,
{
  let movies = match params.query {
    Some(text) => {
      let query = MovieQuery { text, limit: params.limit };
      state.store.search_movies(&query).await
    }
    None => state.store.list_movies().await,
  }
  .map_err(ApiError::store)?;
  Ok(Json(movies))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /movies`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewMovie>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MovieStore,
{
  body.validate()?;
  let movie = state.store.add_movie(body).await.map_err(ApiError::store)?;
  tracing::info!(movie_id = %movie.movie_id, title = %movie.title, "movie created");
  Ok((StatusCode::CREATED, Json(movie)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /movies/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Movie>, ApiError>
where
  S: MovieStore,
{
  Ok(Json(load_movie(&state, id).await?))
}

/// Fetch a movie or fail with 404.
pub(crate) async fn load_movie<S>(state: &ApiState<S>, id: Uuid) -> Result<Movie, ApiError>
where
  S: MovieStore,
{
  state
    .store
    .get_movie(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("movie {id} not found")))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /movies/:id`
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: MovieStore,
{
  if state.store.delete_movie(id).await.map_err(ApiError::store)? {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("movie {id} not found")))
  }
}
