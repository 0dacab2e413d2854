//! Implements a struct that holds the state of the REST server.

use crate::{
    DbPool, Error,
    db::get_connection,
    schema::migrate,
    timezone::get_local_offset,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The pool that each request checks a database connection out of.
    pub db_pool: DbPool,

    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    ///
    /// Used to pick the date for transactions created without one.
    pub local_timezone: String,
}

impl AppState {
    /// Create a new [AppState] from a SQLite connection pool.
    ///
    /// This function will bring the database schema up to date, so it should
    /// be called once at startup.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "America/Sao_Paulo".
    ///
    /// # Errors
    /// Returns an error if the timezone is not recognised or the database
    /// cannot be migrated.
    pub fn new(db_pool: DbPool, local_timezone: &str) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezone(local_timezone.to_owned()));
        }

        let connection = get_connection(&db_pool)?;
        migrate(&connection)?;
        drop(connection);

        Ok(Self {
            db_pool,
            local_timezone: local_timezone.to_owned(),
        })
    }
}
