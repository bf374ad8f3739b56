//! Database connection management using Diesel ORM.
//!
//! Provides connection pooling, migration support, and the per-connection
//! pragmas the studio schema relies on (foreign keys, busy timeout).

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::error::{Error, Result};

/// Embedded database migrations compiled from the migrations/ directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Type alias for a SQLite connection pool.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// A connection checked out of [`DbPool`].
pub type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Default number of pooled connections.
pub const DEFAULT_POOL_SIZE: u32 = 5;

/// Applies pragmas every time the pool opens a connection.
///
/// SQLite keeps `foreign_keys` per connection and defaults it to off, so
/// cascades and restrict rules only hold if every connection enables it.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), diesel::r2d2::Error> {
        diesel::sql_query("PRAGMA foreign_keys = ON")
            .execute(conn)
            .map_err(diesel::r2d2::Error::QueryError)?;
        diesel::sql_query("PRAGMA busy_timeout = 5000")
            .execute(conn)
            .map_err(diesel::r2d2::Error::QueryError)?;
        Ok(())
    }
}

/// Create a connection pool for the given database URL.
///
/// # Errors
/// Returns an error if the pool cannot be created.
pub fn create_pool(database_url: &str) -> Result<DbPool> {
    create_pool_with_size(database_url, DEFAULT_POOL_SIZE)
}

/// Create a connection pool holding at most `max_size` connections.
pub fn create_pool_with_size(database_url: &str, max_size: u32) -> Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)
        .map_err(|e| Error::Connection(e.to_string()))
}

/// Check a connection out of the pool.
pub fn connection(pool: &DbPool) -> Result<DbConn> {
    pool.get().map_err(|e| Error::Connection(e.to_string()))
}

/// Run all pending database migrations. Returns how many were applied.
///
/// # Errors
/// Returns an error if migrations fail.
pub fn run_migrations(pool: &DbPool) -> Result<usize> {
    let mut conn = connection(pool)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| Error::Database(e.to_string()))?;
    Ok(applied.len())
}


#[cfg(test)]
mod tests {
    use super::testing::TestDb;
    use super::*;

    #[derive(diesel::QueryableByName)]
    struct TableName {
        #[diesel(sql_type = diesel::sql_types::Text)]
        name: String,
    }

    #[derive(diesel::QueryableByName)]
    struct PragmaValue {
        #[diesel(sql_type = diesel::sql_types::Integer)]
        foreign_keys: i32,
    }

    #[test]
    fn create_pool_with_memory_db() {
        let pool = create_pool(":memory:");
        assert!(pool.is_ok());
    }

    #[test]
    fn run_migrations_creates_tables() {
        let db = TestDb::new();
        let mut conn = connection(&db.pool).unwrap();

        let result: Vec<String> = diesel::sql_query(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name",
        )
        .load::<TableName>(&mut conn)
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();

        assert_eq!(
            result,
            vec![
                "attendance",
                "businesses",
                "class_types",
                "classes",
                "package_types",
                "packages",
                "recurring_schedules",
                "users",
            ]
        );
    }

    #[test]
    fn run_migrations_is_idempotent() {
        let db = TestDb::new();
        assert_eq!(run_migrations(&db.pool).unwrap(), 0);
    }

    #[test]
    fn every_connection_enforces_foreign_keys() {
        let db = TestDb::new();
        let mut held = Vec::new();
        for _ in 0..3 {
            let mut conn = connection(&db.pool).unwrap();
            let value: Vec<PragmaValue> = diesel::sql_query("PRAGMA foreign_keys")
                .load(&mut conn)
                .unwrap();
            assert_eq!(value[0].foreign_keys, 1);
            held.push(conn);
        }
    }
}
