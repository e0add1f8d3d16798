//! Core types and game rules for Movie Mindread.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The trivia selector and score calculator are pure functions; the session
//! controller is an explicit state value plus a transition function. Storage
//! backends implement [`store::MovieStore`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod game;
pub mod movie;
pub mod score;
pub mod selector;
pub mod store;
pub mod trivia;

pub use error::{Error, Result};
