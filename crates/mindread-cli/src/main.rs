//! `mindread`: command-line client for a Movie Mindread server.
//!
//! # Usage
//!
//! ```
//! mindread --url http://localhost:8080 search nolan
//! mindread show <movie-id>
//! mindread add-trivia <movie-id> hard "Filmed in Calgary"
//! mindread choose <movie-id>     # prints a game id, then watches the guesses
//! mindread guess <game-id>       # the other player joins with that id
//! ```

mod client;
mod render;

use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig, GameView};
use mindread_core::{game::GuessOutcome, trivia::Tier};
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const DEFAULT_URL: &str = "http://localhost:8080";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "mindread", about = "Play Movie Mindread from the terminal")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the mindread server (default: http://localhost:8080).
  #[arg(long, env = "MINDREAD_URL")]
  url: Option<String>,

  /// Seconds between game polls while waiting on the other player.
  #[arg(long, default_value_t = 2, value_name = "SECS")]
  poll: u64,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Search movies by title, year, director or genre.
  Search { query: String },
  /// Show a movie and its curated trivia.
  Show { movie_id: Uuid },
  /// Add a curated trivia fact to a movie.
  AddTrivia {
    movie_id: Uuid,
    /// hard, medium or easy.
    tier:     Tier,
    text:     String,
  },
  /// Start a game as the chooser and watch the guesses come in.
  Choose { movie_id: Uuid },
  /// Join a game as the guesser. Type `quit` to give up.
  Guess { game_id: Uuid },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| DEFAULT_URL.to_string()),
  };
  tracing::debug!(base_url = %api_config.base_url, "using server");

  let client = ApiClient::new(api_config)?;
  let poll = Duration::from_secs(args.poll.max(1));

  match args.command {
    Command::Search { query } => {
      let movies = client.search_movies(&query).await?;
      if movies.is_empty() {
        println!("No movies match {query:?}.");
      }
      for movie in &movies {
        println!("{}", render::movie_line(movie));
      }
    }
    Command::Show { movie_id } => {
      let movie = client.get_movie(movie_id).await?;
      let trivia = client.get_trivia(movie_id).await?;
      println!("{}", render::movie_card(&movie, &trivia));
    }
    Command::AddTrivia { movie_id, tier, text } => {
      let fact = client.add_trivia(movie_id, tier, &text).await?;
      println!("Added {} trivia {}", fact.tier, fact.trivia_id);
    }
    Command::Choose { movie_id } => choose(&client, movie_id, poll).await?,
    Command::Guess { game_id } => guess(&client, game_id, poll).await?,
  }

  Ok(())
}

// ─── Chooser ──────────────────────────────────────────────────────────────────

async fn choose(client: &ApiClient, movie_id: Uuid, poll: Duration) -> Result<()> {
  let movie = client.get_movie(movie_id).await?;
  let game = client.create_game(movie_id).await?;
  let game_id = game.game_id;
  tracing::debug!(%game_id, %movie_id, "game created");
  println!("You chose {}. Give the guesser this game id:", movie.title);
  println!("  {game_id}");
  println!("Watching for guesses...");

  let mut shown = 0;
  let mut ticker = tokio::time::interval(poll);
  loop {
    ticker.tick().await;
    let Some(game) = client.get_game(game_id).await? else {
      println!("The guesser left the game.");
      return Ok(());
    };

    for g in game.guesses.iter().skip(shown) {
      println!("{}", render::guess_line(g, &game.revealed));
    }
    shown = game.guesses.len();

    if game.game_over {
      println!("{}", render::game_summary(&game));
      if let Err(e) = client.abandon_game(game_id).await {
        tracing::warn!(%game_id, error = %e, "could not remove finished game");
      }
      return Ok(());
    }
  }
}

// ─── Guesser ──────────────────────────────────────────────────────────────────

/// Poll until the chooser has picked a movie.
async fn wait_for_movie(client: &ApiClient, game_id: Uuid, poll: Duration) -> Result<GameView> {
  let mut ticker = tokio::time::interval(poll);
  let mut announced = false;
  loop {
    ticker.tick().await;
    let game = client
      .get_game(game_id)
      .await?
      .ok_or_else(|| anyhow!("game {game_id} not found"))?;
    if game.game_over {
      bail!("game {game_id} is already over");
    }
    if game.movie_chosen {
      return Ok(game);
    }
    if !announced {
      println!("Waiting for the chooser to pick a movie...");
      announced = true;
    }
  }
}

async fn guess(client: &ApiClient, game_id: Uuid, poll: Duration) -> Result<()> {
  let game = wait_for_movie(client, game_id, poll).await?;
  for hint in &game.revealed {
    println!("Earlier hint ({} tier): {}", hint.trivia.tier, hint.trivia.fact);
  }
  println!(
    "Guess the movie! You have {} guesses. Type `quit` to give up.",
    game.attempts_remaining
  );

  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  let mut stdout = tokio::io::stdout();

  loop {
    stdout.write_all(b"> ").await?;
    stdout.flush().await?;

    let line = lines.next_line().await.context("reading guess")?;
    let text = line.as_deref().map(str::trim).unwrap_or("quit");
    if text.is_empty() {
      continue;
    }
    if text.eq_ignore_ascii_case("quit") {
      client.abandon_game(game_id).await?;
      println!("Game abandoned.");
      return Ok(());
    }

    let outcome = client.guess(game_id, text).await?;
    println!("{}", render::outcome_message(&outcome));
    if !matches!(outcome, GuessOutcome::Incorrect { .. }) {
      return Ok(());
    }
  }
}
