//! In-memory registry of live game sessions.
//!
//! Each game sits behind its own mutex so concurrent guesses on one session
//! are applied one at a time, while different sessions proceed in parallel.
//!
//! [`GameRegistry::sweep`] drops finished games and games nobody has touched
//! within their [`Retention`]; [`GameRegistry::spawn_sweeper`] runs it on a
//! timer.

use std::{
  collections::HashMap,
  sync::Arc,
  time::{Duration, Instant},
};

use mindread_core::game::GameState;
use tokio::{
  sync::{Mutex, RwLock},
  task::JoinHandle,
};
use uuid::Uuid;

pub type GameHandle = Arc<Mutex<GameState>>;

/// How long games stay registered after their last access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retention {
  /// Won or lost games.
  pub finished: Duration,
  /// Games still choosing or guessing.
  pub idle:     Duration,
}

impl Default for Retention {
  fn default() -> Self {
    Self {
      finished: Duration::from_secs(5 * 60),
      idle:     Duration::from_secs(60 * 60),
    }
  }
}

struct Entry {
  handle:  GameHandle,
  touched: Instant,
}

#[derive(Default)]
pub struct GameRegistry {
  games: RwLock<HashMap<Uuid, Entry>>,
}

impl GameRegistry {
  pub fn new() -> Self { Self::default() }

  /// Register `state` under its own `game_id`.
  pub async fn insert(&self, state: GameState) -> GameHandle {
    self.insert_at(state, Instant::now()).await
  }

  async fn insert_at(&self, state: GameState, touched: Instant) -> GameHandle {
    let id = state.game_id;
    let handle = Arc::new(Mutex::new(state));
    let entry = Entry { handle: handle.clone(), touched };
    self.games.write().await.insert(id, entry);
    handle
  }

  /// Look up a game and mark it as accessed.
  pub async fn get(&self, id: Uuid) -> Option<GameHandle> {
    let mut games = self.games.write().await;
    let entry = games.get_mut(&id)?;
    entry.touched = Instant::now();
    Some(entry.handle.clone())
  }

  /// Drop a game. Returns `false` if it was not registered.
  pub async fn remove(&self, id: Uuid) -> bool {
    self.games.write().await.remove(&id).is_some()
  }

  pub async fn len(&self) -> usize { self.games.read().await.len() }

  pub async fn is_empty(&self) -> bool { self.len().await == 0 }

  /// Drop every game whose last access is older than its retention as of
  /// `now`. Games locked by an in-flight request are kept. Returns the number
  /// removed.
  pub async fn sweep(&self, now: Instant, retention: Retention) -> usize {
    let mut games = self.games.write().await;
    let before = games.len();
    games.retain(|_, entry| {
      let Ok(game) = entry.handle.try_lock() else {
        return true;
      };
      let keep_for = if game.is_over() { retention.finished } else { retention.idle };
      now.saturating_duration_since(entry.touched) < keep_for
    });
    before - games.len()
  }

  /// Sweep every `period` until the returned task is aborted.
  pub fn spawn_sweeper(self: Arc<Self>, period: Duration, retention: Retention) -> JoinHandle<()> {
    tokio::spawn(async move {
      let mut ticker = tokio::time::interval(period);
      ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
      loop {
        ticker.tick().await;
        let evicted = self.sweep(Instant::now(), retention).await;
        if evicted > 0 {
          let remaining = self.len().await;
          tracing::info!(evicted, remaining, "expired games evicted");
        }
      }
    })
  }
}
