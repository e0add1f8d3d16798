//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings. Tiers are stored as their lowercase names.

use chrono::{DateTime, Utc};
use mindread_core::{
  movie::{Actor, Director, Movie, ProductionCompany, Studio},
  trivia::{Tier, TriviaFact},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Tier ─────────────────────────────────────────────────────────────────────

pub fn encode_tier(t: Tier) -> &'static str { t.as_str() }

pub fn decode_tier(s: &str) -> Result<Tier> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown tier: {s:?}")))
}

// ─── LIKE patterns ────────────────────────────────────────────────────────────

/// `%text%` with LIKE wildcards in `text` escaped by `\`.
pub fn like_pattern(text: &str) -> String {
  let mut out = String::with_capacity(text.len() + 2);
  out.push('%');
  for c in text.chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('%');
  out
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read from a `movies` row joined with its director and studio,
/// plus the child tables.
pub struct RawMovie {
  pub movie_id:             String,
  pub title:                String,
  pub year:                 Option<i32>,
  pub imdb_rating:          Option<f64>,
  pub created_at:           String,
  pub director_name:        Option<String>,
  pub director_debut:       Option<String>,
  pub studio_name:          Option<String>,
  pub studio_address:       Option<String>,
  pub actors:               Vec<String>,
  pub genres:               Vec<String>,
  pub production_companies: Vec<RawCompany>,
}

pub struct RawCompany {
  pub name:          String,
  pub founding_year: Option<i32>,
  pub headquarters:  Option<String>,
}

impl RawMovie {
  pub fn into_movie(self) -> Result<Movie> {
    Ok(Movie {
      movie_id:             decode_uuid(&self.movie_id)?,
      title:                self.title,
      year:                 self.year,
      genres:               self.genres,
      director:             self.director_name.map(|name| Director {
        name,
        debut_movie: self.director_debut,
      }),
      studio:               self.studio_name.map(|name| Studio {
        name,
        address: self.studio_address,
      }),
      imdb_rating:          self.imdb_rating,
      actors:               self.actors.into_iter().map(|name| Actor { name }).collect(),
      production_companies: self
        .production_companies
        .into_iter()
        .map(|c| ProductionCompany {
          name:          c.name,
          founding_year: c.founding_year,
          headquarters:  c.headquarters,
        })
        .collect(),
      created_at:           decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `trivia` row.
pub struct RawTrivia {
  pub trivia_id:  String,
  pub movie_id:   String,
  pub tier:       String,
  pub text:       String,
  pub created_at: String,
}

impl RawTrivia {
  pub fn into_trivia(self) -> Result<TriviaFact> {
    Ok(TriviaFact {
      trivia_id:  decode_uuid(&self.trivia_id)?,
      movie_id:   decode_uuid(&self.movie_id)?,
      tier:       decode_tier(&self.tier)?,
      text:       self.text,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
