//! Creates the application tables and applies additive column migrations.
//!
//! All migrations live in [MIGRATIONS] and run in order inside one exclusive
//! transaction. Every step checks the current schema before doing anything,
//! so running [migrate] on an up-to-date database changes nothing. Steps only
//! ever create tables, add columns or insert missing rows.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, db::configure_connection, user::insert_default_user};

/// A single idempotent schema change.
struct Migration {
    /// Shown in the logs when the step runs.
    name: &'static str,
    apply: fn(&Connection) -> Result<(), rusqlite::Error>,
}

/// The ordered list of schema changes applied at startup.
const MIGRATIONS: &[Migration] = &[
    Migration {
        name: "create usuarios",
        apply: create_user_table,
    },
    Migration {
        name: "create categorias",
        apply: create_category_table,
    },
    Migration {
        name: "create transacoes",
        apply: create_transaction_table,
    },
    Migration {
        name: "add transacoes.categoria_id",
        apply: add_transaction_category_column,
    },
    Migration {
        name: "add transacoes.data",
        apply: add_transaction_date_column,
    },
    Migration {
        name: "insert default user",
        apply: insert_default_user,
    },
];

/// Bring the database schema up to date.
///
/// Safe to call any number of times: tables and columns that already exist
/// are left alone and the default user is only inserted once. Foreign key
/// enforcement is switched off on `connection` first, see
/// [crate::db::configure_connection].
///
/// # Errors
/// Returns an error if any step fails, in which case none of the steps are
/// committed.
pub fn migrate(connection: &Connection) -> Result<(), Error> {
    configure_connection(connection)?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    for migration in MIGRATIONS {
        tracing::debug!("Applying migration '{}'", migration.name);
        (migration.apply)(&transaction)?;
    }

    transaction.commit()?;

    Ok(())
}

/// Check whether `table` has a column named `column`.
///
/// Returns `false` if the table itself does not exist.
pub fn column_exists(
    connection: &Connection,
    table: &str,
    column: &str,
) -> Result<bool, rusqlite::Error> {
    connection
        .prepare("SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2")?
        .query_row((table, column), |row| row.get::<_, i64>(0))
        .map(|count| count > 0)
}

/// Fail with [Error::SchemaError] unless `table` has the column `column`.
pub fn require_column(connection: &Connection, table: &str, column: &str) -> Result<(), Error> {
    if column_exists(connection, table, column)? {
        Ok(())
    } else {
        Err(Error::SchemaError(format!(
            "the column {table}.{column} does not exist"
        )))
    }
}

fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS usuarios (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE,
                senha TEXT
                )",
        (),
    )?;

    Ok(())
}

fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS categorias (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nome TEXT NOT NULL,
            usuario_id INTEGER,
            FOREIGN KEY(usuario_id) REFERENCES usuarios(id)
        );

        CREATE INDEX IF NOT EXISTS idx_categorias_usuario ON categorias(usuario_id);",
    )?;

    Ok(())
}

/// Creates the transaction table in its oldest shape. Newer columns are added
/// by the steps that follow so that old and new databases converge.
fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transacoes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                valor REAL,
                descricao TEXT,
                tipo TEXT,
                usuario_id INTEGER,
                FOREIGN KEY(usuario_id) REFERENCES usuarios(id)
                )",
        (),
    )?;

    Ok(())
}

fn add_transaction_category_column(connection: &Connection) -> Result<(), rusqlite::Error> {
    add_column_if_missing(
        connection,
        "transacoes",
        "categoria_id",
        "INTEGER REFERENCES categorias(id)",
    )
}

fn add_transaction_date_column(connection: &Connection) -> Result<(), rusqlite::Error> {
    add_column_if_missing(connection, "transacoes", "data", "TEXT")?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transacoes_usuario_data ON transacoes(usuario_id, data);",
        (),
    )?;

    Ok(())
}

fn add_column_if_missing(
    connection: &Connection,
    table: &str,
    column: &str,
    definition: &str,
) -> Result<(), rusqlite::Error> {
    if column_exists(connection, table, column)? {
        return Ok(());
    }

    tracing::info!("Adding missing column {table}.{column}");
    // Identifiers cannot be bound as parameters. All callers pass literals.
    connection.execute(
        &format!("ALTER TABLE {table} ADD COLUMN {column} {definition}"),
        (),
    )?;

    Ok(())
}
