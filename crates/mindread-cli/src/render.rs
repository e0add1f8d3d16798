//! Plain-text rendering of API values for the terminal.

use mindread_core::{
  game::{Guess, GuessOutcome, Phase, RevealedFact},
  movie::Movie,
  trivia::{Tier, TriviaFact},
};

use crate::client::GameView;

/// One-line summary used in search results.
pub fn movie_line(movie: &Movie) -> String {
  let mut line = movie.title.clone();
  if let Some(year) = movie.year {
    line.push_str(&format!(" ({year})"));
  }
  if let Some(director) = &movie.director {
    line.push_str(&format!(", dir. {}", director.name));
  }
  format!("{}  {line}", movie.movie_id)
}

/// Full movie card, with curated trivia grouped by tier.
pub fn movie_card(movie: &Movie, trivia: &[TriviaFact]) -> String {
  let mut out = vec![movie.title.clone()];
  let mut field = |label: &str, value: String| out.push(format!("  {label:<10} {value}"));

  field("id", movie.movie_id.to_string());
  if let Some(year) = movie.year {
    field("year", year.to_string());
  }
  if !movie.genres.is_empty() {
    field("genres", movie.genres.join(", "));
  }
  if let Some(d) = &movie.director {
    field("director", d.name.clone());
  }
  if let Some(s) = &movie.studio {
    field("studio", s.name.clone());
  }
  if let Some(r) = movie.imdb_rating {
    field("rating", format!("{r:.1}"));
  }
  if !movie.actors.is_empty() {
    let names: Vec<_> = movie.actors.iter().map(|a| a.name.as_str()).collect();
    field("cast", names.join(", "));
  }

  for tier in Tier::ALL {
    let facts: Vec<_> = trivia.iter().filter(|t| t.tier == tier).collect();
    if facts.is_empty() {
      continue;
    }
    out.push(format!("  {tier} trivia:"));
    out.extend(facts.iter().map(|t| format!("    - {}", t.text)));
  }
  out.join("\n")
}

/// What the guesser sees after submitting a guess.
pub fn outcome_message(outcome: &GuessOutcome) -> String {
  match outcome {
    GuessOutcome::Correct { score, num_guesses } => {
      format!("Correct in {num_guesses}! You scored {score} points.")
    }
    GuessOutcome::Incorrect { trivia, attempts_remaining, .. } => format!(
      "Wrong. Hint ({} tier): {}\n{attempts_remaining} guesses left.",
      trivia.tier, trivia.fact
    ),
    GuessOutcome::GameOver { correct_title, .. } => {
      format!("Out of guesses. The movie was {correct_title}.")
    }
  }
}

/// One guess as the chooser sees it, with the hint it unlocked.
pub fn guess_line(guess: &Guess, revealed: &[RevealedFact]) -> String {
  let verdict = if guess.correct { "correct" } else { "wrong" };
  let mut line = format!("#{} {:?}: {verdict}", guess.number, guess.text);
  if let Some(hint) = revealed.iter().find(|r| r.after_guess == guess.number) {
    line.push_str(&format!(", revealed {} hint: {}", hint.trivia.tier, hint.trivia.fact));
  }
  line
}

/// Closing line once a game has ended.
pub fn game_summary(game: &GameView) -> String {
  let used = game.guesses.len();
  match (game.phase, game.score) {
    (Phase::Won, Some(score)) => format!("Guessed in {used}, scoring {score} points."),
    (Phase::Lost, _) => format!("Not guessed after {used} tries."),
    (phase, _) => format!("Game {phase}."),
  }
}
