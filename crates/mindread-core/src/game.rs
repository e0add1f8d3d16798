//! Game session state machine.
//!
//! ```text
//! Choosing ──choose──▶ Guessing ──correct──▶ Won
//!                        │  ▲
//!                wrong   └──┘        ──9th wrong──▶ Lost
//! ```
//!
//! [`GameState`] is a plain value. Transitions take the current state by
//! reference and return the next one, so a failed transition leaves the
//! caller's state untouched.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  movie::Movie,
  score::calculate_score,
  selector::select_fact,
  trivia::{MAX_GUESSES, Quality, TriviaFact, TriviaResult},
};

/// Longest guess text kept, in characters.
pub const MAX_GUESS_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
  /// Waiting for the chooser to pick a movie.
  Choosing,
  Guessing,
  Won,
  Lost,
}

impl Phase {
  pub fn is_terminal(self) -> bool { matches!(self, Self::Won | Self::Lost) }
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Choosing => "choosing",
      Self::Guessing => "guessing",
      Self::Won => "won",
      Self::Lost => "lost",
    })
  }
}

/// One submitted guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guess {
  /// 1-based position in the game.
  pub number:  u32,
  pub text:    String,
  pub correct: bool,
}

/// A fact shown to the guesser, tagged with the guess that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedFact {
  pub after_guess: u32,
  #[serde(flatten)]
  pub trivia:      TriviaResult,
}

/// Everything the session controller knows about one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
  pub game_id:            Uuid,
  pub phase:              Phase,
  pub movie_id:           Option<Uuid>,
  pub attempts_remaining: u32,
  pub guesses:            Vec<Guess>,
  /// Append-only, in reveal order.
  pub revealed:           Vec<RevealedFact>,
  /// Set once the game reaches a terminal phase.
  pub score:              Option<u32>,
  pub started_at:         DateTime<Utc>,
}

/// The result of one guess, as reported to the guesser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GuessOutcome {
  Correct {
    score:       u32,
    num_guesses: u32,
  },
  Incorrect {
    trivia:             TriviaResult,
    num_guesses:        u32,
    attempts_remaining: u32,
  },
  GameOver {
    correct_title: String,
    num_guesses:   u32,
  },
}

impl Default for GameState {
  fn default() -> Self { Self::new() }
}

impl GameState {
  /// A fresh game waiting for a movie.
  pub fn new() -> Self {
    Self {
      game_id:            Uuid::new_v4(),
      phase:              Phase::Choosing,
      movie_id:           None,
      attempts_remaining: MAX_GUESSES,
      guesses:            Vec::new(),
      revealed:           Vec::new(),
      score:              None,
      started_at:         Utc::now(),
    }
  }

  pub fn is_over(&self) -> bool { self.phase.is_terminal() }

  /// Number of guesses submitted so far.
  pub fn num_guesses(&self) -> u32 { self.guesses.len() as u32 }

  /// Quality of the most recently revealed fact, if any.
  pub fn last_quality(&self) -> Option<Quality> {
    self.revealed.last().map(|r| r.trivia.quality)
  }

  /// Set the movie to guess. Choosing again mid-game starts over with the
  /// new movie; a finished game cannot be restarted.
  pub fn choose(&self, movie_id: Uuid) -> Result<GameState> {
    if self.is_over() {
      return Err(Error::GameOver(self.phase));
    }
    Ok(GameState {
      game_id: self.game_id,
      phase: Phase::Guessing,
      movie_id: Some(movie_id),
      started_at: self.started_at,
      ..GameState::new()
    })
  }

  /// Apply one guess.
  ///
  /// `movie` must be the chosen movie and `curated` its curated trivia (an
  /// empty slice is fine: selection degrades to attribute and generic
  /// facts).
  pub fn guess<R>(
    &self,
    movie: &Movie,
    curated: &[TriviaFact],
    text: &str,
    rng: &mut R,
  ) -> Result<(GameState, GuessOutcome)>
  where
    R: Rng + ?Sized,
  {
    let movie_id = match self.phase {
      Phase::Choosing => return Err(Error::NoMovieChosen),
      Phase::Won | Phase::Lost => return Err(Error::GameOver(self.phase)),
      Phase::Guessing => self.movie_id.ok_or(Error::NoMovieChosen)?,
    };
    if movie.movie_id != movie_id {
      return Err(Error::MovieMismatch {
        expected: movie_id,
        actual:   movie.movie_id,
      });
    }
    if self.attempts_remaining == 0 {
      return Err(Error::GameOver(self.phase));
    }

    let text: String = text.trim().chars().take(MAX_GUESS_LEN).collect();
    if text.is_empty() {
      return Err(Error::EmptyGuess);
    }

    let guess_index = self.num_guesses();
    let number = guess_index + 1;
    let correct = movie.title_matches(&text);

    let mut next = self.clone();
    next.attempts_remaining -= 1;
    next.guesses.push(Guess { number, text, correct });

    if correct {
      let score = calculate_score(number, self.last_quality());
      next.phase = Phase::Won;
      next.score = Some(score);
      tracing::info!(game_id = %self.game_id, number, score, "game won");
      return Ok((next, GuessOutcome::Correct { score, num_guesses: number }));
    }

    let trivia = if next.attempts_remaining == 0 {
      None
    } else {
      let used: Vec<&str> =
        self.revealed.iter().map(|r| r.trivia.fact.as_str()).collect();
      select_fact(movie, curated, guess_index, &used, rng)
    };

    let Some(trivia) = trivia else {
      next.phase = Phase::Lost;
      next.score = Some(calculate_score(MAX_GUESSES, None));
      tracing::info!(game_id = %self.game_id, number, "game lost");
      return Ok((next, GuessOutcome::GameOver {
        correct_title: movie.title.clone(),
        num_guesses:   number,
      }));
    };

    tracing::debug!(
      game_id = %self.game_id,
      number,
      tier = %trivia.tier,
      quality = %trivia.quality,
      source = %trivia.source,
      "wrong guess, revealing trivia"
    );
    next.revealed.push(RevealedFact {
      after_guess: number,
      trivia:      trivia.clone(),
    });
    let attempts_remaining = next.attempts_remaining;
    Ok((next, GuessOutcome::Incorrect {
      trivia,
      num_guesses: number,
      attempts_remaining,
    }))
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use rand::{SeedableRng, rngs::StdRng};

  use super::*;
  use crate::{
    movie::Director,
    trivia::{Tier, TriviaFact},
  };

  fn movie() -> Movie {
    Movie {
      movie_id:             Uuid::new_v4(),
      title:                "The Dark Knight".into(),
      year:                 Some(2008),
      genres:               vec!["Action".into(), "Crime".into()],
      director:             Some(Director {
        name:        "Christopher Nolan".into(),
        debut_movie: None,
      }),
      studio:               None,
      imdb_rating:          None,
      actors:               Vec::new(),
      production_companies: Vec::new(),
      created_at:           Utc::now(),
    }
  }

  fn hard_fact(movie: &Movie, text: &str) -> TriviaFact {
    TriviaFact {
      trivia_id:  Uuid::new_v4(),
      movie_id:   movie.movie_id,
      tier:       Tier::Hard,
      text:       text.into(),
      created_at: Utc::now(),
    }
  }

  fn started(movie: &Movie) -> GameState {
    GameState::new().choose(movie.movie_id).unwrap()
  }

  #[test]
  fn new_game_is_choosing() {
    let game = GameState::new();
    assert_eq!(game.phase, Phase::Choosing);
    assert_eq!(game.attempts_remaining, MAX_GUESSES);
    assert!(game.movie_id.is_none());
  }

  #[test]
  fn guess_before_choosing_fails() {
    let m = movie();
    let err = GameState::new()
      .guess(&m, &[], "Heat", &mut StdRng::seed_from_u64(1))
      .unwrap_err();
    assert!(matches!(err, Error::NoMovieChosen));
  }

  #[test]
  fn empty_guess_rejected_without_consuming_attempt() {
    let m = movie();
    let game = started(&m);
    let err = game.guess(&m, &[], "   ", &mut StdRng::seed_from_u64(1)).unwrap_err();
    assert!(matches!(err, Error::EmptyGuess));
    assert_eq!(game.attempts_remaining, MAX_GUESSES);
  }

  #[test]
  fn mismatched_movie_rejected() {
    let m = movie();
    let other = movie();
    let err = started(&m)
      .guess(&other, &[], "Heat", &mut StdRng::seed_from_u64(1))
      .unwrap_err();
    assert!(matches!(err, Error::MovieMismatch { .. }));
  }

  #[test]
  fn correct_first_guess_scores_as_medium() {
    let m = movie();
    let (game, outcome) = started(&m)
      .guess(&m, &[], "  the dark KNIGHT ", &mut StdRng::seed_from_u64(1))
      .unwrap();
    assert_eq!(game.phase, Phase::Won);
    assert_eq!(outcome, GuessOutcome::Correct { score: 85, num_guesses: 1 });
    assert_eq!(game.score, Some(85));
  }

  #[test]
  fn wrong_guess_reveals_hard_fact_then_win_uses_its_quality() {
    let m = movie();
    let facts = vec![hard_fact(&m, "The hospital explosion was done in one take")];
    let mut rng = StdRng::seed_from_u64(3);

    let (game, outcome) = started(&m).guess(&m, &facts, "Batman Begins", &mut rng).unwrap();
    let GuessOutcome::Incorrect { trivia, num_guesses, attempts_remaining } = outcome else {
      panic!("expected incorrect outcome");
    };
    assert_eq!(trivia.tier, Tier::Hard);
    assert_eq!(trivia.quality, Quality::High);
    assert_eq!(num_guesses, 1);
    assert_eq!(attempts_remaining, 8);
    assert_eq!(game.revealed.len(), 1);
    assert_eq!(game.revealed[0].after_guess, 1);

    let (game, outcome) = game.guess(&m, &facts, "The Dark Knight", &mut rng).unwrap();
    // remaining 7: 80 × 1.2
    assert_eq!(outcome, GuessOutcome::Correct { score: 96, num_guesses: 2 });
    assert_eq!(game.phase, Phase::Won);
  }

  #[test]
  fn nine_wrong_guesses_lose_without_repeating_facts() {
    let m = movie();
    let mut rng = StdRng::seed_from_u64(11);
    let mut game = started(&m);
    let mut tiers = Vec::new();

    for n in 1..=8 {
      let (next, outcome) = game.guess(&m, &[], "Heat", &mut rng).unwrap();
      let GuessOutcome::Incorrect { trivia, attempts_remaining, .. } = outcome else {
        panic!("guess {n} should be incorrect");
      };
      assert_eq!(attempts_remaining, MAX_GUESSES - n);
      tiers.push(trivia.tier);
      game = next;
    }

    let (game, outcome) = game.guess(&m, &[], "Heat", &mut rng).unwrap();
    assert_eq!(outcome, GuessOutcome::GameOver {
      correct_title: "The Dark Knight".into(),
      num_guesses:   9,
    });
    assert_eq!(game.phase, Phase::Lost);
    assert_eq!(game.score, Some(0));
    assert_eq!(game.attempts_remaining, 0);
    assert_eq!(game.revealed.len(), 8);

    use Tier::*;
    assert_eq!(tiers, vec![Hard, Hard, Medium, Medium, Medium, Easy, Easy, Easy]);

    let texts: HashSet<&str> =
      game.revealed.iter().map(|r| r.trivia.fact.as_str()).collect();
    assert_eq!(texts.len(), game.revealed.len());
  }

  #[test]
  fn finished_game_rejects_guesses_and_choices() {
    let m = movie();
    let (game, _) = started(&m)
      .guess(&m, &[], "The Dark Knight", &mut StdRng::seed_from_u64(1))
      .unwrap();
    let err = game
      .guess(&m, &[], "The Dark Knight", &mut StdRng::seed_from_u64(1))
      .unwrap_err();
    assert!(matches!(err, Error::GameOver(Phase::Won)));
    assert!(matches!(game.choose(m.movie_id), Err(Error::GameOver(_))));
  }

  #[test]
  fn choosing_again_resets_progress() {
    let m = movie();
    let (game, _) = started(&m)
      .guess(&m, &[], "Heat", &mut StdRng::seed_from_u64(1))
      .unwrap();
    let other = movie();
    let reset = game.choose(other.movie_id).unwrap();
    assert_eq!(reset.game_id, game.game_id);
    assert_eq!(reset.movie_id, Some(other.movie_id));
    assert!(reset.guesses.is_empty());
    assert!(reset.revealed.is_empty());
    assert_eq!(reset.attempts_remaining, MAX_GUESSES);
  }

  #[test]
  fn long_guesses_are_truncated() {
    let m = movie();
    let long = "x".repeat(1000);
    let (game, _) = started(&m)
      .guess(&m, &[], &long, &mut StdRng::seed_from_u64(1))
      .unwrap();
    assert_eq!(game.guesses[0].text.chars().count(), MAX_GUESS_LEN);
  }

  #[test]
  fn outcome_serialises_with_status_tag() {
    let json = serde_json::to_value(GuessOutcome::Correct {
      score:       102,
      num_guesses: 1,
    })
    .unwrap();
    assert_eq!(json["status"], "correct");
    assert_eq!(json["score"], 102);
  }
}
