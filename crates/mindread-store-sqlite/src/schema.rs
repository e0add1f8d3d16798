//! SQL schema for the Movie Mindread SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- People and companies are shared between movies and looked up by name.
CREATE TABLE IF NOT EXISTS directors (
    director_id TEXT PRIMARY KEY,
    name        TEXT NOT NULL UNIQUE,
    debut_movie TEXT
);

CREATE TABLE IF NOT EXISTS studios (
    studio_id TEXT PRIMARY KEY,
    name      TEXT NOT NULL UNIQUE,
    address   TEXT
);

CREATE TABLE IF NOT EXISTS actors (
    actor_id TEXT PRIMARY KEY,
    name     TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS movies (
    movie_id    TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    year        INTEGER,
    imdb_rating REAL CHECK (imdb_rating IS NULL OR imdb_rating BETWEEN 0.0 AND 10.0),
    director_id TEXT REFERENCES directors(director_id),
    studio_id   TEXT REFERENCES studios(studio_id),
    created_at  TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS movie_actors (
    movie_id TEXT NOT NULL REFERENCES movies(movie_id) ON DELETE CASCADE,
    actor_id TEXT NOT NULL REFERENCES actors(actor_id),
    billing  INTEGER NOT NULL,   -- 0 = top billed
    PRIMARY KEY (movie_id, actor_id)
);

CREATE TABLE IF NOT EXISTS movie_genres (
    movie_id TEXT NOT NULL REFERENCES movies(movie_id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    name     TEXT NOT NULL,
    PRIMARY KEY (movie_id, position)
);

CREATE TABLE IF NOT EXISTS production_companies (
    movie_id      TEXT NOT NULL REFERENCES movies(movie_id) ON DELETE CASCADE,
    position      INTEGER NOT NULL,
    name          TEXT NOT NULL,
    founding_year INTEGER,
    headquarters  TEXT,
    PRIMARY KEY (movie_id, position)
);

-- Curated trivia; one row per fact.
CREATE TABLE IF NOT EXISTS trivia (
    trivia_id  TEXT PRIMARY KEY,
    movie_id   TEXT NOT NULL REFERENCES movies(movie_id) ON DELETE CASCADE,
    tier       TEXT NOT NULL CHECK (tier IN ('hard', 'medium', 'easy')),
    text       TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS movies_title_idx     ON movies(title);
CREATE INDEX IF NOT EXISTS trivia_movie_tier_idx ON trivia(movie_id, tier);

PRAGMA user_version = 1;
";
