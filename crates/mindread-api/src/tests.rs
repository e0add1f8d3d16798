//! End-to-end handler tests against an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode},
};
use mindread_core::{
  movie::{Director, NewMovie},
  store::MovieStore,
  trivia::{NewTrivia, Tier},
};
use mindread_store_sqlite::SqliteStore;
use rand::{SeedableRng, rngs::StdRng};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use crate::{ApiState, api_router};

async fn make_state() -> ApiState<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  ApiState::with_rng(Arc::new(store), StdRng::seed_from_u64(7))
}

async fn add_dark_knight(state: &ApiState<SqliteStore>) -> Uuid {
  let movie = state
    .store
    .add_movie(NewMovie {
      year: Some(2008),
      genres: vec!["Action".into(), "Crime".into()],
      director: Some(Director {
        name:        "Christopher Nolan".into(),
        debut_movie: None,
      }),
      ..NewMovie::new("The Dark Knight")
    })
    .await
    .unwrap();
  movie.movie_id
}

async fn send(
  state: ApiState<SqliteStore>,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header("content-type", "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = api_router(state)
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

// ── Movies ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_movie() {
  let state = make_state().await;
  let (status, created) = send(
    state.clone(),
    "POST",
    "/movies",
    Some(json!({ "title": "Alien", "year": 1979, "genres": ["Horror"] })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let id = created["movie_id"].as_str().unwrap().to_owned();

  let (status, fetched) = send(state, "GET", &format!("/movies/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched["title"], "Alien");
  assert_eq!(fetched["genres"], json!(["Horror"]));
}

#[tokio::test]
async fn create_movie_with_blank_title_is_400() {
  let state = make_state().await;
  let (status, body) =
    send(state, "POST", "/movies", Some(json!({ "title": "  " }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("title"));
}

#[tokio::test]
async fn get_missing_movie_is_404() {
  let state = make_state().await;
  let (status, body) =
    send(state, "GET", &format!("/movies/{}", Uuid::new_v4()), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn search_movies_by_director() {
  let state = make_state().await;
  add_dark_knight(&state).await;
  state.store.add_movie(NewMovie::new("Alien")).await.unwrap();

  let (status, body) = send(state.clone(), "GET", "/movies?query=nolan", None).await;
  assert_eq!(status, StatusCode::OK);
  let titles: Vec<_> = body.as_array().unwrap().iter().map(|m| m["title"].clone()).collect();
  assert_eq!(titles, [json!("The Dark Knight")]);

  let (_, all) = send(state, "GET", "/movies", None).await;
  assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn delete_movie_then_404() {
  let state = make_state().await;
  let id = add_dark_knight(&state).await;

  let (status, _) = send(state.clone(), "DELETE", &format!("/movies/{id}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) = send(state, "DELETE", &format!("/movies/{id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Trivia ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_list_trivia_by_tier() {
  let state = make_state().await;
  let id = add_dark_knight(&state).await;

  let (status, fact) = send(
    state.clone(),
    "POST",
    &format!("/movies/{id}/trivia"),
    Some(json!({ "tier": "hard", "text": "The hospital explosion was real" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(fact["tier"], "hard");

  let (_, hard) = send(state.clone(), "GET", &format!("/movies/{id}/trivia?tier=hard"), None).await;
  assert_eq!(hard.as_array().unwrap().len(), 1);
  let (_, easy) = send(state.clone(), "GET", &format!("/movies/{id}/trivia?tier=easy"), None).await;
  assert!(easy.as_array().unwrap().is_empty());

  let (status, _) = send(state.clone(), "GET", &format!("/movies/{id}/trivia?tier=extreme"), None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let trivia_id = fact["trivia_id"].as_str().unwrap();
  let (status, _) = send(state, "DELETE", &format!("/trivia/{trivia_id}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn add_trivia_for_missing_movie_is_404() {
  let state = make_state().await;
  let (status, _) = send(
    state,
    "POST",
    &format!("/movies/{}/trivia", Uuid::new_v4()),
    Some(json!({ "tier": "easy", "text": "Nobody saw it" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_missing_trivia_is_404() {
  let state = make_state().await;
  let (status, body) =
    send(state, "DELETE", &format!("/trivia/{}", Uuid::new_v4()), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].as_str().unwrap().contains("trivia"));
}

// ── Games ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn game_starts_choosing_then_guessing() {
  let state = make_state().await;
  let movie_id = add_dark_knight(&state).await;

  let (status, game) = send(state.clone(), "POST", "/games", None).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(game["phase"], "choosing");
  assert_eq!(game["game_over"], false);
  let game_id = game["game_id"].as_str().unwrap().to_owned();

  let (status, body) = send(
    state.clone(),
    "POST",
    &format!("/games/{game_id}/guesses"),
    Some(json!({ "guess": "Batman" })),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT, "{body}");

  let (status, game) = send(
    state,
    "PUT",
    &format!("/games/{game_id}/movie"),
    Some(json!({ "movie_id": movie_id })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(game["phase"], "guessing");
  assert_eq!(game["attempts_remaining"], 9);
  assert_eq!(game["movie_chosen"], true);
  assert!(game.get("movie_id").is_none(), "{game}");
}

#[tokio::test]
async fn wrong_then_right_guess_wins() {
  let state = make_state().await;
  let movie_id = add_dark_knight(&state).await;
  state
    .store
    .add_trivia(NewTrivia::new(movie_id, Tier::Hard, "The Joker's scars change stories"))
    .await
    .unwrap();

  let (_, game) =
    send(state.clone(), "POST", "/games", Some(json!({ "movie_id": movie_id }))).await;
  assert!(game.get("movie_id").is_none(), "{game}");
  let game_id = game["game_id"].as_str().unwrap().to_owned();
  let guesses = format!("/games/{game_id}/guesses");

  let (_, polled) = send(state.clone(), "GET", &format!("/games/{game_id}"), None).await;
  assert_eq!(polled["movie_chosen"], true);
  assert!(polled.get("movie_id").is_none(), "{polled}");

  let (status, outcome) =
    send(state.clone(), "POST", &guesses, Some(json!({ "guess": "Batman Begins" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(outcome["status"], "incorrect");
  assert_eq!(outcome["trivia"]["quality"], "high");
  assert_eq!(outcome["trivia"]["fact"], "The Joker's scars change stories");
  assert_eq!(outcome["attempts_remaining"], 8);

  let (_, outcome) =
    send(state.clone(), "POST", &guesses, Some(json!({ "guess": "the dark knight" }))).await;
  assert_eq!(outcome["status"], "correct");
  assert_eq!(outcome["num_guesses"], 2);
  // Two guesses used, last reveal curated: (45 + 30 + 5) * 1.2.
  assert_eq!(outcome["score"], 96);

  let (_, game) = send(state.clone(), "GET", &format!("/games/{game_id}"), None).await;
  assert_eq!(game["phase"], "won");
  assert_eq!(game["movie_id"], json!(movie_id));
  assert_eq!(game["game_over"], true);
  assert_eq!(game["revealed"].as_array().unwrap().len(), 1);

  let (status, _) =
    send(state, "POST", &guesses, Some(json!({ "guess": "The Dark Knight" }))).await;
  assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn nine_wrong_guesses_lose() {
  let state = make_state().await;
  let movie_id = add_dark_knight(&state).await;

  let (_, game) =
    send(state.clone(), "POST", "/games", Some(json!({ "movie_id": movie_id }))).await;
  let game_id = game["game_id"].as_str().unwrap().to_owned();
  let guesses = format!("/games/{game_id}/guesses");

  let mut facts = Vec::new();
  for n in 1..=8 {
    let (_, outcome) = send(
      state.clone(),
      "POST",
      &guesses,
      Some(json!({ "guess": format!("Wrong {n}") })),
    )
    .await;
    assert_eq!(outcome["status"], "incorrect");
    facts.push(outcome["trivia"]["fact"].as_str().unwrap().to_owned());
  }
  let mut unique = facts.clone();
  unique.sort();
  unique.dedup();
  assert_eq!(unique.len(), facts.len(), "repeated fact in {facts:?}");

  let (_, outcome) =
    send(state.clone(), "POST", &guesses, Some(json!({ "guess": "Wrong 9" }))).await;
  assert_eq!(outcome["status"], "game_over");
  assert_eq!(outcome["correct_title"], "The Dark Knight");

  let (_, game) = send(state, "GET", &format!("/games/{game_id}"), None).await;
  assert_eq!(game["phase"], "lost");
  assert_eq!(game["score"], 0);
  assert_eq!(game["movie_id"], json!(movie_id));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_guesses_are_applied_one_at_a_time() {
  let state = make_state().await;
  let movie_id = add_dark_knight(&state).await;
  let (_, game) =
    send(state.clone(), "POST", "/games", Some(json!({ "movie_id": movie_id }))).await;
  let game_id = game["game_id"].as_str().unwrap().to_owned();
  let guesses = format!("/games/{game_id}/guesses");

  let tasks: Vec<_> = (1..=20)
    .map(|n| {
      let state = state.clone();
      let uri = guesses.clone();
      tokio::spawn(async move {
        send(state, "POST", &uri, Some(json!({ "guess": format!("Wrong {n}") }))).await
      })
    })
    .collect();

  let mut accepted = Vec::new();
  for task in tasks {
    let (status, outcome) = task.await.unwrap();
    match status {
      StatusCode::OK => accepted.push(outcome),
      StatusCode::CONFLICT => {}
      other => panic!("unexpected {other}: {outcome}"),
    }
  }
  assert_eq!(accepted.len(), 9);
  let lost = accepted.iter().filter(|o| o["status"] == "game_over").count();
  assert_eq!(lost, 1);

  let (_, game) = send(state, "GET", &format!("/games/{game_id}"), None).await;
  assert_eq!(game["phase"], "lost");
  assert_eq!(game["attempts_remaining"], 0);
  assert_eq!(game["guesses"].as_array().unwrap().len(), 9);
  assert_eq!(game["revealed"].as_array().unwrap().len(), 8);
  let numbers: Vec<_> = game["guesses"]
    .as_array()
    .unwrap()
    .iter()
    .map(|g| g["number"].as_u64().unwrap())
    .collect();
  assert_eq!(numbers, (1..=9).collect::<Vec<_>>());
}

#[tokio::test]
async fn empty_guess_is_400() {
  let state = make_state().await;
  let movie_id = add_dark_knight(&state).await;
  let (_, game) =
    send(state.clone(), "POST", "/games", Some(json!({ "movie_id": movie_id }))).await;
  let game_id = game["game_id"].as_str().unwrap().to_owned();

  let (status, _) = send(
    state,
    "POST",
    &format!("/games/{game_id}/guesses"),
    Some(json!({ "guess": "   " })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_game_rejects_malformed_body() {
  let state = make_state().await;
  let req = Request::builder()
    .method("POST")
    .uri("/games")
    .header("content-type", "application/json")
    .body(Body::from("{\"movie_id\": 12"))
    .unwrap();
  let resp = api_router(state.clone()).oneshot(req).await.unwrap();
  assert!(resp.status().is_client_error());
  assert!(state.games.is_empty().await);
}

#[tokio::test]
async fn create_game_for_missing_movie_is_404() {
  let state = make_state().await;
  let (status, _) = send(
    state.clone(),
    "POST",
    "/games",
    Some(json!({ "movie_id": Uuid::new_v4() })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(state.games.is_empty().await);
}

#[tokio::test]
async fn delete_game() {
  let state = make_state().await;
  let (_, game) = send(state.clone(), "POST", "/games", None).await;
  let game_id = game["game_id"].as_str().unwrap().to_owned();

  let (status, _) = send(state.clone(), "DELETE", &format!("/games/{game_id}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) = send(state, "GET", &format!("/games/{game_id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}
