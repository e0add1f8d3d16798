//! Trivia selection.
//!
//! Each incorrect guess reveals one fact. The fact comes from the first
//! source in this chain that still has an unrevealed candidate for the
//! current tier:
//!
//! 1. curated facts stored for the movie ([`Quality::High`]),
//! 2. facts derived from structured movie attributes ([`Quality::Medium`]),
//! 3. generic sentences for the tier ([`Quality::Low`]).
//!
//! Selection never fails. Randomness is injected so tests can seed it.

use rand::Rng;

use crate::{
  movie::Movie,
  trivia::{Quality, Tier, TriviaFact, TriviaResult},
};

/// Source label for curated facts.
pub const SOURCE_DATABASE: &str = "database";
/// Source label for generic fallback sentences.
pub const SOURCE_FALLBACK: &str = "fallback";

/// Actors named in the roster hint.
const ROSTER_LIMIT: usize = 5;

// A game reveals at most four facts of one tier, so four sentences per tier
// keep fallbacks unique within a game.
const HARD_FALLBACKS: &[&str] = &[
  "This is a challenging movie to guess",
  "Only true film buffs will get this one",
  "Few people remember the details of this movie",
  "Think beyond the obvious picks",
];

const MEDIUM_FALLBACKS: &[&str] = &[
  "This is a moderately challenging movie to guess",
  "Plenty of moviegoers would recognise this title",
  "This movie found a wide audience",
  "You have probably heard of this movie",
];

const EASY_FALLBACKS: &[&str] = &[
  "This should be an easy movie to guess",
  "Most people have seen or heard of this movie",
  "This title is close to a household name",
  "You are very close, keep going",
];

/// A fact that could be revealed, before one is picked.
#[derive(Debug)]
struct Candidate {
  text:   String,
  source: &'static str,
}

/// Pick the fact to reveal after `guess_index` guesses have been made.
///
/// `curated` may contain facts for any movie and tier; only those for
/// `movie` at the current tier are considered. Texts in `used` are never
/// returned while an unused candidate remains. Returns `None` once
/// `guess_index` is past the last attempt.
pub fn select_fact<R, S>(
  movie: &Movie,
  curated: &[TriviaFact],
  guess_index: u32,
  used: &[S],
  rng: &mut R,
) -> Option<TriviaResult>
where
  R: Rng + ?Sized,
  S: AsRef<str>,
{
  let tier = Tier::for_guess_index(guess_index)?;
  Some(select_for_tier(movie, curated, tier, used, rng))
}

/// Pick a fact for an explicit tier. See [`select_fact`].
pub fn select_for_tier<R, S>(
  movie: &Movie,
  curated: &[TriviaFact],
  tier: Tier,
  used: &[S],
  rng: &mut R,
) -> TriviaResult
where
  R: Rng + ?Sized,
  S: AsRef<str>,
{
  let is_used = |text: &str| used.iter().any(|u| u.as_ref() == text);

  let mut pool: Vec<&TriviaFact> = curated
    .iter()
    .filter(|f| f.movie_id == movie.movie_id && f.tier == tier)
    .filter(|f| !f.text.trim().is_empty() && !is_used(&f.text))
    .collect();
  if !pool.is_empty() {
    let fact = pool.swap_remove(rng.gen_range(0..pool.len()));
    return TriviaResult {
      fact: fact.text.clone(),
      quality: Quality::High,
      source: SOURCE_DATABASE.to_owned(),
      tier,
    };
  }

  let mut derived = derived_candidates(movie, tier);
  derived.retain(|c| !is_used(&c.text));
  if !derived.is_empty() {
    let chosen = derived.swap_remove(rng.gen_range(0..derived.len()));
    tracing::debug!(%tier, source = chosen.source, "no curated trivia left, using movie attribute");
    return TriviaResult {
      fact: chosen.text,
      quality: Quality::Medium,
      source: chosen.source.to_owned(),
      tier,
    };
  }

  tracing::debug!(%tier, movie_id = %movie.movie_id, "no attribute trivia left, using generic fallback");
  fallback(tier, is_used)
}

/// The generic sentence for `tier`, skipping those already used.
fn fallback(tier: Tier, is_used: impl Fn(&str) -> bool) -> TriviaResult {
  let sentences = match tier {
    Tier::Hard => HARD_FALLBACKS,
    Tier::Medium => MEDIUM_FALLBACKS,
    Tier::Easy => EASY_FALLBACKS,
  };
  let text = sentences
    .iter()
    .copied()
    .find(|s| !is_used(s))
    .unwrap_or(sentences[0]);
  TriviaResult {
    fact: text.to_owned(),
    quality: Quality::Low,
    source: SOURCE_FALLBACK.to_owned(),
    tier,
  }
}

/// Facts synthesised from whichever movie fields are present.
fn derived_candidates(movie: &Movie, tier: Tier) -> Vec<Candidate> {
  let mut out = Vec::new();
  match tier {
    Tier::Hard => {
      let names: Vec<&str> = movie
        .actors
        .iter()
        .map(|a| a.name.trim())
        .filter(|n| !n.is_empty())
        .take(ROSTER_LIMIT)
        .collect();
      if let Some(roster) = join_names(&names) {
        out.push(Candidate {
          text:   format!("This movie stars {roster}"),
          source: "actors",
        });
      }
      if let Some(studio) = movie.studio.as_ref().map(|s| s.name.trim())
        && !studio.is_empty()
      {
        out.push(Candidate {
          text:   format!("This movie was made at {studio}"),
          source: "studio",
        });
      }
      for company in &movie.production_companies {
        let name = company.name.trim();
        if !name.is_empty() {
          out.push(Candidate {
            text:   format!("{name} was one of the production companies behind this movie"),
            source: "production_company",
          });
        }
      }
      if let Some(rating) = movie.imdb_rating {
        out.push(Candidate {
          text:   format!("This movie holds an IMDb rating of {rating:.1}"),
          source: "imdb_rating",
        });
      }
    }
    Tier::Medium => {
      if let Some(director) = movie.director.as_ref().map(|d| d.name.trim())
        && !director.is_empty()
      {
        out.push(Candidate {
          text:   format!("This movie was directed by {director}"),
          source: "director",
        });
      }
      if let Some(year) = movie.year {
        out.push(Candidate {
          text:   format!("This movie was released in {year}"),
          source: "year",
        });
      }
    }
    Tier::Easy => {
      for genre in movie.genres.iter().map(|g| g.trim()) {
        if !genre.is_empty() {
          out.push(Candidate {
            text:   format!("This movie's genre is {genre}"),
            source: "genre",
          });
        }
      }
    }
  }
  out
}

/// "A", "A and B", "A, B and C".
fn join_names(names: &[&str]) -> Option<String> {
  match names {
    [] => None,
    [only] => Some((*only).to_owned()),
    [init @ .., last] => Some(format!("{} and {last}", init.join(", "))),
  }
}
