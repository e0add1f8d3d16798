//! Async HTTP client wrapping the Movie Mindread JSON API.

use anyhow::{Context, Result, anyhow};
use mindread_core::{
  game::{Guess, GuessOutcome, Phase, RevealedFact},
  movie::Movie,
  trivia::{Tier, TriviaFact},
};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use uuid::Uuid;

/// Connection settings for the Movie Mindread API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// A game as the server reports it to either player.
#[derive(Debug, Clone, Deserialize)]
pub struct GameView {
  pub game_id:            Uuid,
  pub phase:              Phase,
  pub movie_chosen:       bool,
  pub attempts_remaining: u32,
  pub guesses:            Vec<Guess>,
  pub revealed:           Vec<RevealedFact>,
  pub score:              Option<u32>,
  pub game_over:          bool,
}

/// Async HTTP client for the Movie Mindread JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  // ── Movies ────────────────────────────────────────────────────────────────

  /// `GET /api/movies?query=<text>`
  pub async fn search_movies(&self, query: &str) -> Result<Vec<Movie>> {
    let resp = self
      .client
      .get(self.url("/movies"))
      .query(&[("query", query)])
      .send()
      .await
      .context("GET /movies failed")?;
    checked(resp, "GET /movies")
      .await?
      .json()
      .await
      .context("deserialising movies")
  }

  /// `GET /api/movies/<id>`
  pub async fn get_movie(&self, id: Uuid) -> Result<Movie> {
    let resp = self
      .client
      .get(self.url(&format!("/movies/{id}")))
      .send()
      .await
      .context("GET /movies/{id} failed")?;
    checked(resp, "GET /movies/{id}")
      .await?
      .json()
      .await
      .context("deserialising movie")
  }

  // ── Trivia ────────────────────────────────────────────────────────────────

  /// `GET /api/movies/<id>/trivia`
  pub async fn get_trivia(&self, movie_id: Uuid) -> Result<Vec<TriviaFact>> {
    let resp = self
      .client
      .get(self.url(&format!("/movies/{movie_id}/trivia")))
      .send()
      .await
      .context("GET /movies/{id}/trivia failed")?;
    checked(resp, "GET /movies/{id}/trivia")
      .await?
      .json()
      .await
      .context("deserialising trivia")
  }

  /// `POST /api/movies/<id>/trivia`
  pub async fn add_trivia(&self, movie_id: Uuid, tier: Tier, text: &str) -> Result<TriviaFact> {
    let resp = self
      .client
      .post(self.url(&format!("/movies/{movie_id}/trivia")))
      .json(&json!({ "tier": tier, "text": text }))
      .send()
      .await
      .context("POST /movies/{id}/trivia failed")?;
    checked(resp, "POST /movies/{id}/trivia")
      .await?
      .json()
      .await
      .context("deserialising trivia fact")
  }

  // ── Games ─────────────────────────────────────────────────────────────────

  /// `POST /api/games` with the movie already chosen.
  pub async fn create_game(&self, movie_id: Uuid) -> Result<GameView> {
    let resp = self
      .client
      .post(self.url("/games"))
      .json(&json!({ "movie_id": movie_id }))
      .send()
      .await
      .context("POST /games failed")?;
    checked(resp, "POST /games")
      .await?
      .json()
      .await
      .context("deserialising game")
  }

  /// `GET /api/games/<id>`; `None` once the game is gone.
  pub async fn get_game(&self, game_id: Uuid) -> Result<Option<GameView>> {
    let resp = self
      .client
      .get(self.url(&format!("/games/{game_id}")))
      .send()
      .await
      .context("GET /games/{id} failed")?;
    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    checked(resp, "GET /games/{id}")
      .await?
      .json()
      .await
      .map(Some)
      .context("deserialising game")
  }

  /// `POST /api/games/<id>/guesses`
  pub async fn guess(&self, game_id: Uuid, guess: &str) -> Result<GuessOutcome> {
    let resp = self
      .client
      .post(self.url(&format!("/games/{game_id}/guesses")))
      .json(&json!({ "guess": guess }))
      .send()
      .await
      .context("POST /games/{id}/guesses failed")?;
    checked(resp, "POST /games/{id}/guesses")
      .await?
      .json()
      .await
      .context("deserialising guess outcome")
  }

  /// `DELETE /api/games/<id>`
  pub async fn abandon_game(&self, game_id: Uuid) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&format!("/games/{game_id}")))
      .send()
      .await
      .context("DELETE /games/{id} failed")?;
    checked(resp, "DELETE /games/{id}").await?;
    Ok(())
  }
}

/// Pass successful responses through; turn error responses into an
/// `anyhow` error carrying the server's `{"error": ...}` message.
async fn checked(resp: Response, what: &str) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let message = resp
    .json::<Value>()
    .await
    .ok()
    .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_owned))
    .unwrap_or_else(|| status.to_string());
  Err(anyhow!("{what} → {status}: {message}"))
}
