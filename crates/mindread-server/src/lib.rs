//! HTTP server wiring for Movie Mindread.
//!
//! Mounts the JSON API under `/api` with request tracing. The binary in
//! `main.rs` handles configuration, store opening and seeding.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use axum::Router;
use mindread_api::{ApiState, Retention, api_router};
use mindread_core::store::MovieStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `MINDREAD_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:               String,
  #[serde(default = "default_port")]
  pub port:               u16,
  #[serde(default = "default_store_path")]
  pub store_path:         PathBuf,
  /// Load the sample catalogue into an empty store at startup.
  #[serde(default)]
  pub seed:               bool,
  /// Fixed seed for trivia selection; random when unset.
  #[serde(default)]
  pub rng_seed:           Option<u64>,
  /// Seconds a won or lost game stays readable after its last access.
  #[serde(default = "default_finished_game_secs")]
  pub finished_game_secs: u64,
  /// Seconds an unfinished game survives without being accessed.
  #[serde(default = "default_idle_game_secs")]
  pub idle_game_secs: u64,
  /// Seconds between registry sweeps.
  #[serde(default = "default_sweep_secs")]
  pub sweep_secs: u64,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("mindread.db") }

fn default_finished_game_secs() -> u64 { Retention::default().finished.as_secs() }

fn default_idle_game_secs() -> u64 { Retention::default().idle.as_secs() }

fn default_sweep_secs() -> u64 { 60 }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:               default_host(),
      port:               default_port(),
      store_path:         default_store_path(),
      seed:               false,
      rng_seed:           None,
      finished_game_secs: default_finished_game_secs(),
      idle_game_secs:     default_idle_game_secs(),
      sweep_secs:         default_sweep_secs(),
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn retention(&self) -> Retention {
    Retention {
      finished: Duration::from_secs(self.finished_game_secs),
      idle:     Duration::from_secs(self.idle_game_secs),
    }
  }

  /// Never zero; `tokio::time::interval` rejects a zero period.
  pub fn sweep_period(&self) -> Duration { Duration::from_secs(self.sweep_secs.max(1)) }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// The full application: API under `/api`, every request traced.
pub fn router<S>(state: ApiState<S>) -> Router
where
  S: MovieStore + 'static,
{
  Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
