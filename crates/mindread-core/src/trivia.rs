//! Trivia types: curated facts, tiers, qualities and selection results.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Number of guesses a game allows.
pub const MAX_GUESSES: u32 = 9;

// ─── Tier ────────────────────────────────────────────────────────────────────

/// When during the nine-guess window a fact may be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
  Hard,
  Medium,
  Easy,
}

impl Tier {
  pub const ALL: [Tier; 3] = [Tier::Hard, Tier::Medium, Tier::Easy];

  /// The tier used for the fact revealed after `guess_index` guesses.
  ///
  /// Returns `None` once all attempts are spent.
  pub fn for_guess_index(guess_index: u32) -> Option<Self> {
    match guess_index {
      0..=1 => Some(Self::Hard),
      2..=4 => Some(Self::Medium),
      5..=8 => Some(Self::Easy),
      _ => None,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Hard => "hard",
      Self::Medium => "medium",
      Self::Easy => "easy",
    }
  }
}

impl fmt::Display for Tier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Tier {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "hard" => Ok(Self::Hard),
      "medium" => Ok(Self::Medium),
      "easy" => Ok(Self::Easy),
      _ => Err(Error::UnknownTier(s.to_owned())),
    }
  }
}

// ─── Quality ─────────────────────────────────────────────────────────────────

/// How authoritative a revealed fact is, independent of its tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
  /// Curated fact from the store.
  High,
  /// Derived from a structured movie attribute.
  Medium,
  /// Generic fallback text.
  Low,
}

impl Quality {
  /// Score multiplier in whole percent.
  pub fn multiplier_percent(self) -> u32 {
    match self {
      Self::High => 120,
      Self::Medium => 100,
      Self::Low => 80,
    }
  }

  /// Lenient parse of a quality key. Accepts names and numeric levels;
  /// anything else is `None`.
  pub fn from_key(key: &str) -> Option<Self> {
    match key.trim().to_ascii_lowercase().as_str() {
      "high" | "3" => Some(Self::High),
      "medium" | "2" => Some(Self::Medium),
      "low" | "1" => Some(Self::Low),
      _ => None,
    }
  }
}

impl fmt::Display for Quality {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::High => "high",
      Self::Medium => "medium",
      Self::Low => "low",
    })
  }
}

// ─── Curated facts ───────────────────────────────────────────────────────────

/// A trivia string stored against a movie and tier ahead of time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriviaFact {
  pub trivia_id:  Uuid,
  pub movie_id:   Uuid,
  pub tier:       Tier,
  pub text:       String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::MovieStore::add_trivia`].
#[derive(Debug, Clone)]
pub struct NewTrivia {
  pub movie_id: Uuid,
  pub tier:     Tier,
  pub text:     String,
}

impl NewTrivia {
  pub fn new(movie_id: Uuid, tier: Tier, text: impl Into<String>) -> Self {
    Self { movie_id, tier, text: text.into() }
  }

  pub fn validate(&self) -> Result<()> {
    if self.text.trim().is_empty() {
      return Err(Error::InvalidTrivia("text must not be empty".into()));
    }
    Ok(())
  }
}

// ─── Selection result ────────────────────────────────────────────────────────

/// A fact chosen for reveal, with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriviaResult {
  pub fact:    String,
  pub quality: Quality,
  /// Provenance tag, e.g. `"database"`, `"director"`, `"fallback"`.
  pub source:  String,
  pub tier:    Tier,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tier_boundaries() {
    assert_eq!(Tier::for_guess_index(0), Some(Tier::Hard));
    assert_eq!(Tier::for_guess_index(1), Some(Tier::Hard));
    assert_eq!(Tier::for_guess_index(2), Some(Tier::Medium));
    assert_eq!(Tier::for_guess_index(4), Some(Tier::Medium));
    assert_eq!(Tier::for_guess_index(5), Some(Tier::Easy));
    assert_eq!(Tier::for_guess_index(8), Some(Tier::Easy));
    assert_eq!(Tier::for_guess_index(9), None);
    assert_eq!(Tier::for_guess_index(u32::MAX), None);
  }

  #[test]
  fn tier_parses_case_insensitively() {
    assert_eq!("HARD".parse::<Tier>().unwrap(), Tier::Hard);
    assert_eq!(" easy ".parse::<Tier>().unwrap(), Tier::Easy);
    assert!(matches!("brutal".parse::<Tier>(), Err(Error::UnknownTier(_))));
  }

  #[test]
  fn quality_keys() {
    assert_eq!(Quality::from_key("High"), Some(Quality::High));
    assert_eq!(Quality::from_key("2"), Some(Quality::Medium));
    assert_eq!(Quality::from_key("low"), Some(Quality::Low));
    assert_eq!(Quality::from_key("superb"), None);
    assert_eq!(Quality::from_key(""), None);
  }
}
