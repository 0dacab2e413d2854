//! Code for storing users and checking their credentials.

use std::fmt::Display;

use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::{Error, PasswordDigest};

/// The username of the account created when the database is initialised.
pub const DEFAULT_USERNAME: &str = "test";

/// The password of the account created when the database is initialised.
pub const DEFAULT_PASSWORD: &str = "senha123";

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The name the user logs in with.
    pub username: String,
    /// The digest of the user's password.
    pub password_digest: PasswordDigest,
}

/// Insert the default account unless a user with the same username exists.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn insert_default_user(connection: &Connection) -> Result<(), rusqlite::Error> {
    let digest = PasswordDigest::from_raw_password(DEFAULT_PASSWORD);

    connection.execute(
        "INSERT OR IGNORE INTO usuarios (username, senha) VALUES (?1, ?2)",
        (DEFAULT_USERNAME, digest.as_ref()),
    )?;

    Ok(())
}

/// Check `password` against the stored digest for `username`.
///
/// Returns the ID of the matching user.
///
/// # Errors
///
/// This function will return a:
/// - [Error::InvalidCredentials] if no user has both this username and password,
/// - [Error::SqlError] if an SQL related error occurred.
pub fn verify_credentials(
    username: &str,
    password: &str,
    connection: &Connection,
) -> Result<UserID, Error> {
    let digest = PasswordDigest::from_raw_password(password);

    connection
        .prepare("SELECT id FROM usuarios WHERE username = ?1 AND senha = ?2")?
        .query_row((username, digest.as_ref()), |row| row.get(0))
        .optional()?
        .map(UserID::new)
        .ok_or(Error::InvalidCredentials)
}

/// Get the user with the username `username`, if one exists.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn get_user_by_username(username: &str, connection: &Connection) -> Result<Option<User>, Error> {
    connection
        .prepare("SELECT id, username, senha FROM usuarios WHERE username = :username")?
        .query_row(&[(":username", &username)], |row| {
            let raw_id = row.get(0)?;
            let username = row.get(1)?;
            let raw_digest: Option<String> = row.get(2)?;

            Ok(User {
                id: UserID::new(raw_id),
                username,
                password_digest: PasswordDigest::new_unchecked(&raw_digest.unwrap_or_default()),
            })
        })
        .optional()
        .map_err(|error| error.into())
}

/// Replace the stored password digest for `user_id`.
///
/// # Errors
///
/// This function will return a:
/// - [Error::SqlError] with [rusqlite::Error::StatementChangedRows] if no user has the ID `user_id`,
/// - [Error::SqlError] if any other SQL related error occurred.
pub fn set_password(
    user_id: UserID,
    password_digest: &PasswordDigest,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE usuarios SET senha = ?1 WHERE id = ?2",
        (password_digest.as_ref(), user_id.as_i64()),
    )?;

    if rows_affected != 1 {
        return Err(rusqlite::Error::StatementChangedRows(rows_affected).into());
    }

    Ok(())
}

/// Get the number of users in the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn count_users(connection: &Connection) -> Result<usize, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM usuarios;", [], |row| row.get(0))
        .map_err(|error| error.into())
}
