//! Database module: SQLite pool setup, migrations and repositories.
//!
//! - `model`: seed records written by the repository.
//! - `repo`: SQL-only functions that map rows into [`crate::model`] types.
//!
//! Callers import from `trivia_api::db`; the repository API is re-exported here.

pub mod model;
pub mod repo;

pub use repo::*;

pub use model::SeedData;
