//! Movie records, the read-only input to the trivia selector.
//!
//! A movie and its related people and companies are owned by the store. The
//! core only ever sees an immutable snapshot for the duration of one guess.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Earliest release year accepted by [`NewMovie::validate`].
pub const MIN_YEAR: i32 = 1870;
/// Latest release year accepted by [`NewMovie::validate`].
pub const MAX_YEAR: i32 = 2100;

// ─── Related records ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Director {
  pub name:        String,
  pub debut_movie: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Studio {
  pub name:    String,
  pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionCompany {
  pub name:          String,
  pub founding_year: Option<i32>,
  pub headquarters:  Option<String>,
}

// ─── Movie ───────────────────────────────────────────────────────────────────

/// A movie as the game sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
  pub movie_id:             Uuid,
  pub title:                String,
  pub year:                 Option<i32>,
  /// Genre names in display order, e.g. `["Sci-Fi", "Action"]`.
  pub genres:               Vec<String>,
  pub director:             Option<Director>,
  pub studio:               Option<Studio>,
  /// IMDb rating on the 0.0–10.0 scale.
  pub imdb_rating:          Option<f64>,
  /// Cast in billing order.
  pub actors:               Vec<Actor>,
  pub production_companies: Vec<ProductionCompany>,
  pub created_at:           DateTime<Utc>,
}

impl Movie {
  /// Case-insensitive title comparison, ignoring surrounding whitespace.
  pub fn title_matches(&self, guess: &str) -> bool {
    self.title.trim().to_lowercase() == guess.trim().to_lowercase()
  }
}

// ─── NewMovie ────────────────────────────────────────────────────────────────

/// Input to [`crate::store::MovieStore::add_movie`].
/// `movie_id` and `created_at` are always set by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewMovie {
  pub title:                String,
  pub year:                 Option<i32>,
  #[serde(default)]
  pub genres:               Vec<String>,
  pub director:             Option<Director>,
  pub studio:               Option<Studio>,
  pub imdb_rating:          Option<f64>,
  #[serde(default)]
  pub actors:               Vec<Actor>,
  #[serde(default)]
  pub production_companies: Vec<ProductionCompany>,
}

impl NewMovie {
  /// Convenience constructor with every optional field empty.
  pub fn new(title: impl Into<String>) -> Self {
    Self { title: title.into(), ..Self::default() }
  }

  /// Reject records the game cannot be played with.
  pub fn validate(&self) -> Result<()> {
    if self.title.trim().is_empty() {
      return Err(Error::InvalidMovie("title must not be empty".into()));
    }
    if let Some(year) = self.year
      && !(MIN_YEAR..=MAX_YEAR).contains(&year)
    {
      return Err(Error::InvalidMovie(format!(
        "release year {year} outside {MIN_YEAR}..={MAX_YEAR}"
      )));
    }
    if let Some(rating) = self.imdb_rating
      && !(0.0..=10.0).contains(&rating)
    {
      return Err(Error::InvalidMovie(format!(
        "imdb rating {rating} outside 0.0..=10.0"
      )));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn validate_rejects_blank_title() {
    assert!(matches!(
      NewMovie::new("   ").validate(),
      Err(Error::InvalidMovie(_))
    ));
  }

  #[test]
  fn validate_rejects_out_of_range_rating_and_year() {
    let mut movie = NewMovie::new("Alien");
    movie.imdb_rating = Some(10.5);
    assert!(movie.validate().is_err());

    movie.imdb_rating = Some(8.5);
    movie.year = Some(1800);
    assert!(movie.validate().is_err());

    movie.year = Some(1979);
    assert!(movie.validate().is_ok());
  }

  #[test]
  fn new_movie_deserialises_with_missing_lists() {
    let movie: NewMovie =
      serde_json::from_str(r#"{"title":"Heat","year":1995}"#).unwrap();
    assert_eq!(movie.title, "Heat");
    assert!(movie.actors.is_empty());
    assert!(movie.genres.is_empty());
  }
}
