//! SQLite persistence adapter.
//!
//! Implements every studio store port on a single pooled SQLite database
//! using Diesel ORM.

pub mod database;
pub mod store;

pub use database::connection::{create_pool, run_migrations, DbPool};
pub use store::SqliteStore;
