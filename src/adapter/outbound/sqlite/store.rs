//! SQLite studio store implementation.
//!
//! One [`SqliteStore`] implements every store port. Each aggregate's
//! row mapping and queries live in their own submodule.

mod attendance;
mod business;
mod catalog;
mod class;
mod package;
mod schedule;
mod user;

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;

use crate::adapter::outbound::sqlite::database::connection::{connection, DbConn, DbPool};
use crate::domain::error::DomainError;
use crate::domain::time;
use crate::error::{Error, Result};

/// SQLite-backed store for every studio aggregate.
#[derive(Clone)]
pub struct SqliteStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteStore {
    /// Create a new SQLite store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<DbConn> {
        connection(&self.pool)
    }
}

fn parse_err(e: DomainError) -> Error {
    Error::Parse(e.to_string())
}

fn parse_enum<T>(s: &str) -> Result<T>
where
    T: FromStr<Err = DomainError>,
{
    s.parse().map_err(parse_err)
}

fn parse_ts(s: &str) -> Result<DateTime<Utc>> {
    time::parse_timestamp(s).map_err(parse_err)
}

fn parse_opt_ts(s: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    s.map(parse_ts).transpose()
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    time::parse_date(s).map_err(parse_err)
}

fn parse_time(s: &str) -> Result<NaiveTime> {
    time::parse_time(s).map_err(parse_err)
}

fn parse_decimal(s: &str) -> Result<Decimal> {
    Decimal::from_str(s).map_err(|e| Error::Parse(format!("invalid decimal '{s}': {e}")))
}

fn ts(at: DateTime<Utc>) -> String {
    time::format_timestamp(at)
}
