//! The connection pool that hands each request its own SQLite connection.

use std::path::Path;

use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::Error;

/// A pool of SQLite connections.
///
/// Checking out a connection with [r2d2::Pool::get] returns a guard that
/// gives the connection back to the pool when it is dropped.
pub type DbPool = r2d2::Pool<SqliteConnectionManager>;

/// A connection checked out of a [DbPool].
pub type DbConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Maximum number of open connections to the database file.
const MAX_POOL_SIZE: u32 = 8;

/// Apply the per-connection settings every connection to the database needs.
///
/// Foreign keys are declared by the schema but not enforced, so rows may
/// refer to users that have no `usuarios` row.
pub fn configure_connection(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch("PRAGMA foreign_keys = OFF;")
}

/// Create a connection pool for the SQLite database at `db_path`.
///
/// The database file is created if it does not exist. The schema is not
/// touched here, see [crate::initialize_db].
///
/// # Errors
/// Returns an error if the first connection to the database cannot be opened.
pub fn create_pool(db_path: impl AsRef<Path>) -> Result<DbPool, Error> {
    let manager = SqliteConnectionManager::file(db_path)
        .with_init(|connection| configure_connection(connection));

    let pool = r2d2::Pool::builder()
        .max_size(MAX_POOL_SIZE)
        .build(manager)?;
    tracing::info!("Database pool created");

    Ok(pool)
}

/// Check out a connection from `pool`.
///
/// # Errors
/// Returns [Error::ConnectionPoolError] if no connection became available
/// before the pool's timeout.
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, Error> {
    pool.get().map_err(Error::from)
}

/// Create a pool backed by a single in-memory database.
///
/// Every in-memory SQLite connection is its own database, so the pool is
/// limited to one connection that is reused by every checkout.
#[cfg(test)]
pub fn create_test_pool() -> DbPool {
    r2d2::Pool::builder()
        .max_size(1)
        .build(
            SqliteConnectionManager::memory()
                .with_init(|connection| configure_connection(connection)),
        )
        .expect("Could not create in-memory database pool")
}
