//! [`SqliteStore`], the SQLite implementation of [`MovieStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension as _};
use uuid::Uuid;

use mindread_core::{
  movie::{Actor, Director, Movie, NewMovie, ProductionCompany, Studio},
  store::{MovieQuery, MovieStore},
  trivia::{NewTrivia, Tier, TriviaFact},
};

use crate::{
  encode::{
    RawCompany, RawMovie, RawTrivia, encode_dt, encode_tier, encode_uuid, like_pattern,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A movie catalogue backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Number of movies in the catalogue.
  pub async fn movie_count(&self) -> Result<usize> {
    let count: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM movies", [], |r| r.get(0))?))
      .await?;
    Ok(count as usize)
  }

  /// Load every movie whose id is returned by `sql` (bound to `params`).
  async fn load_movies_where(
    &self,
    sql: &'static str,
    params: Vec<Box<dyn rusqlite::ToSql + Send>>,
  ) -> Result<Vec<Movie>> {
    let raws: Vec<RawMovie> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let ids = stmt
          .query_map(
            rusqlite::params_from_iter(params.iter().map(|p| p.as_ref())),
            |row| row.get::<_, String>(0),
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut raws = Vec::with_capacity(ids.len());
        for id in ids {
          if let Some(raw) = load_movie(conn, &id)? {
            raws.push(raw);
          }
        }
        Ok(raws)
      })
      .await?;

    raws.into_iter().map(RawMovie::into_movie).collect()
  }
}

// ─── Row helpers (run on the connection thread) ──────────────────────────────

fn load_movie(conn: &Connection, id: &str) -> rusqlite::Result<Option<RawMovie>> {
  let head = conn
    .query_row(
      "SELECT m.movie_id, m.title, m.year, m.imdb_rating, m.created_at,
              d.name, d.debut_movie, s.name, s.address
       FROM movies m
       LEFT JOIN directors d ON d.director_id = m.director_id
       LEFT JOIN studios   s ON s.studio_id   = m.studio_id
       WHERE m.movie_id = ?1",
      rusqlite::params![id],
      |row| {
        Ok(RawMovie {
          movie_id:             row.get(0)?,
          title:                row.get(1)?,
          year:                 row.get(2)?,
          imdb_rating:          row.get(3)?,
          created_at:           row.get(4)?,
          director_name:        row.get(5)?,
          director_debut:       row.get(6)?,
          studio_name:          row.get(7)?,
          studio_address:       row.get(8)?,
          actors:               Vec::new(),
          genres:               Vec::new(),
          production_companies: Vec::new(),
        })
      },
    )
    .optional()?;

  let Some(mut raw) = head else {
    return Ok(None);
  };

  let mut stmt = conn.prepare(
    "SELECT a.name FROM movie_actors ma
     JOIN actors a ON a.actor_id = ma.actor_id
     WHERE ma.movie_id = ?1
     ORDER BY ma.billing",
  )?;
  raw.actors = stmt
    .query_map(rusqlite::params![id], |r| r.get(0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut stmt = conn
    .prepare("SELECT name FROM movie_genres WHERE movie_id = ?1 ORDER BY position")?;
  raw.genres = stmt
    .query_map(rusqlite::params![id], |r| r.get(0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut stmt = conn.prepare(
    "SELECT name, founding_year, headquarters FROM production_companies
     WHERE movie_id = ?1 ORDER BY position",
  )?;
  raw.production_companies = stmt
    .query_map(rusqlite::params![id], |r| {
      Ok(RawCompany {
        name:          r.get(0)?,
        founding_year: r.get(1)?,
        headquarters:  r.get(2)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(Some(raw))
}

fn ensure_director(conn: &Connection, director: &Director) -> rusqlite::Result<String> {
  conn.execute(
    "INSERT INTO directors (director_id, name, debut_movie) VALUES (?1, ?2, ?3)
     ON CONFLICT(name) DO UPDATE
       SET debut_movie = COALESCE(directors.debut_movie, excluded.debut_movie)",
    rusqlite::params![encode_uuid(Uuid::new_v4()), director.name, director.debut_movie],
  )?;
  conn.query_row(
    "SELECT director_id FROM directors WHERE name = ?1",
    rusqlite::params![director.name],
    |r| r.get(0),
  )
}

fn ensure_studio(conn: &Connection, studio: &Studio) -> rusqlite::Result<String> {
  conn.execute(
    "INSERT INTO studios (studio_id, name, address) VALUES (?1, ?2, ?3)
     ON CONFLICT(name) DO UPDATE
       SET address = COALESCE(studios.address, excluded.address)",
    rusqlite::params![encode_uuid(Uuid::new_v4()), studio.name, studio.address],
  )?;
  conn.query_row(
    "SELECT studio_id FROM studios WHERE name = ?1",
    rusqlite::params![studio.name],
    |r| r.get(0),
  )
}

fn ensure_actor(conn: &Connection, name: &str) -> rusqlite::Result<String> {
  conn.execute(
    "INSERT OR IGNORE INTO actors (actor_id, name) VALUES (?1, ?2)",
    rusqlite::params![encode_uuid(Uuid::new_v4()), name],
  )?;
  conn.query_row(
    "SELECT actor_id FROM actors WHERE name = ?1",
    rusqlite::params![name],
    |r| r.get(0),
  )
}

/// Trim names and drop blanks and duplicates so the stored movie is exactly
/// what the selector will see.
fn normalize(input: NewMovie) -> NewMovie {
  fn dedup(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
      let name = name.trim();
      if !name.is_empty() && !out.iter().any(|n| n == name) {
        out.push(name.to_owned());
      }
    }
    out
  }

  let named = |name: String| {
    let name = name.trim().to_owned();
    (!name.is_empty()).then_some(name)
  };

  NewMovie {
    title:                input.title.trim().to_owned(),
    year:                 input.year,
    genres:               dedup(input.genres),
    director:             input.director.and_then(|d| {
      named(d.name).map(|name| Director { name, debut_movie: d.debut_movie })
    }),
    studio:               input.studio.and_then(|s| {
      named(s.name).map(|name| Studio { name, address: s.address })
    }),
    imdb_rating:          input.imdb_rating,
    actors:               dedup(input.actors.into_iter().map(|a| a.name))
      .into_iter()
      .map(|name| Actor { name })
      .collect(),
    production_companies: input
      .production_companies
      .into_iter()
      .filter_map(|c| {
        named(c.name).map(|name| ProductionCompany {
          name,
          founding_year: c.founding_year,
          headquarters: c.headquarters,
        })
      })
      .collect(),
  }
}

// ─── MovieStore impl ─────────────────────────────────────────────────────────

impl MovieStore for SqliteStore {
  type Error = Error;

  // ── Movies ────────────────────────────────────────────────────────────────

  async fn add_movie(&self, input: NewMovie) -> Result<Movie> {
    input.validate()?;
    let input = normalize(input);

    let movie = Movie {
      movie_id:             Uuid::new_v4(),
      title:                input.title,
      year:                 input.year,
      genres:               input.genres,
      director:             input.director,
      studio:               input.studio,
      imdb_rating:          input.imdb_rating,
      actors:               input.actors,
      production_companies: input.production_companies,
      created_at:           Utc::now(),
    };

    let row = movie.clone();
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let director_id = row
          .director
          .as_ref()
          .map(|d| ensure_director(&tx, d))
          .transpose()?;
        let studio_id = row
          .studio
          .as_ref()
          .map(|s| ensure_studio(&tx, s))
          .transpose()?;

        let movie_id = encode_uuid(row.movie_id);
        tx.execute(
          "INSERT INTO movies (
             movie_id, title, year, imdb_rating, director_id, studio_id, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            movie_id,
            row.title,
            row.year,
            row.imdb_rating,
            director_id,
            studio_id,
            encode_dt(row.created_at),
          ],
        )?;

        for (billing, actor) in row.actors.iter().enumerate() {
          let actor_id = ensure_actor(&tx, &actor.name)?;
          tx.execute(
            "INSERT INTO movie_actors (movie_id, actor_id, billing) VALUES (?1, ?2, ?3)",
            rusqlite::params![movie_id, actor_id, billing as i64],
          )?;
        }

        for (position, genre) in row.genres.iter().enumerate() {
          tx.execute(
            "INSERT INTO movie_genres (movie_id, position, name) VALUES (?1, ?2, ?3)",
            rusqlite::params![movie_id, position as i64, genre],
          )?;
        }

        for (position, company) in row.production_companies.iter().enumerate() {
          tx.execute(
            "INSERT INTO production_companies (
               movie_id, position, name, founding_year, headquarters
             ) VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
              movie_id,
              position as i64,
              company.name,
              company.founding_year,
              company.headquarters,
            ],
          )?;
        }

        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::debug!(movie_id = %movie.movie_id, title = %movie.title, "movie added");
    Ok(movie)
  }

  async fn get_movie(&self, id: Uuid) -> Result<Option<Movie>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| Ok(load_movie(conn, &id_str)?))
      .await?;
    raw.map(RawMovie::into_movie).transpose()
  }

  async fn list_movies(&self) -> Result<Vec<Movie>> {
    self
      .load_movies_where(
        "SELECT movie_id FROM movies ORDER BY title COLLATE NOCASE, created_at",
        Vec::new(),
      )
      .await
  }

  async fn search_movies(&self, query: &MovieQuery) -> Result<Vec<Movie>> {
    let text = query.normalized_text();
    if text.is_empty() {
      return Ok(Vec::new());
    }
    let params: Vec<Box<dyn rusqlite::ToSql + Send>> = vec![
      Box::new(like_pattern(&text)),
      Box::new(query.effective_limit() as i64),
    ];

    self
      .load_movies_where(
        "SELECT m.movie_id FROM movies m
         LEFT JOIN directors    d ON d.director_id = m.director_id
         LEFT JOIN movie_genres g ON g.movie_id    = m.movie_id
         WHERE m.title                LIKE ?1 ESCAPE '\\'
            OR CAST(m.year AS TEXT)   LIKE ?1 ESCAPE '\\'
            OR d.name                 LIKE ?1 ESCAPE '\\'
            OR g.name                 LIKE ?1 ESCAPE '\\'
         GROUP BY m.movie_id
         ORDER BY m.title COLLATE NOCASE
         LIMIT ?2",
        params,
      )
      .await
  }

  async fn delete_movie(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM movies WHERE movie_id = ?1", rusqlite::params![id_str])?)
      })
      .await?;
    if deleted > 0 {
      tracing::debug!(movie_id = %id, "movie deleted");
    }
    Ok(deleted > 0)
  }

  // ── Curated trivia ────────────────────────────────────────────────────────

  async fn add_trivia(&self, input: NewTrivia) -> Result<TriviaFact> {
    input.validate()?;

    let fact = TriviaFact {
      trivia_id:  Uuid::new_v4(),
      movie_id:   input.movie_id,
      tier:       input.tier,
      text:       input.text.trim().to_owned(),
      created_at: Utc::now(),
    };

    let trivia_id_str = encode_uuid(fact.trivia_id);
    let movie_id_str  = encode_uuid(fact.movie_id);
    let tier_str      = encode_tier(fact.tier);
    let text          = fact.text.clone();
    let at_str        = encode_dt(fact.created_at);

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let exists = conn
          .query_row(
            "SELECT 1 FROM movies WHERE movie_id = ?1",
            rusqlite::params![movie_id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !exists {
          return Ok(false);
        }
        conn.execute(
          "INSERT INTO trivia (trivia_id, movie_id, tier, text, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![trivia_id_str, movie_id_str, tier_str, text, at_str],
        )?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(Error::MovieNotFound(fact.movie_id));
    }
    Ok(fact)
  }

  async fn trivia_for(&self, movie_id: Uuid, tier: Option<Tier>) -> Result<Vec<TriviaFact>> {
    let movie_id_str = encode_uuid(movie_id);
    let tier_str     = tier.map(encode_tier);

    let raws: Vec<RawTrivia> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT trivia_id, movie_id, tier, text, created_at FROM trivia
           WHERE movie_id = ?1 AND (?2 IS NULL OR tier = ?2)
           ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![movie_id_str, tier_str], |row| {
            Ok(RawTrivia {
              trivia_id:  row.get(0)?,
              movie_id:   row.get(1)?,
              tier:       row.get(2)?,
              text:       row.get(3)?,
              created_at: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTrivia::into_trivia).collect()
  }

  async fn delete_trivia(&self, trivia_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(trivia_id);
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM trivia WHERE trivia_id = ?1", rusqlite::params![id_str])?)
      })
      .await?;
    Ok(deleted > 0)
  }
}
