//! Database operations for categories.

use rusqlite::{Connection, Row, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName, backfill::backfill_category},
    user::UserID,
};

/// A newly created category and how many transactions were backfilled with it.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedCategory {
    pub category: Category,
    pub transactions_backfilled: usize,
}

/// Create a category for `user_id` and backfill it onto the user's matching
/// uncategorized transactions.
///
/// The insert and the backfill are committed together.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error, in which case
/// neither the category nor any backfill is saved.
pub fn create_category(
    name: CategoryName,
    user_id: UserID,
    connection: &Connection,
) -> Result<CreatedCategory, Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    transaction.execute(
        "INSERT INTO categorias (nome, usuario_id) VALUES (?1, ?2)",
        (name.as_ref(), user_id.as_i64()),
    )?;
    let id = transaction.last_insert_rowid();

    let transactions_backfilled = backfill_category(id, &name, user_id, &transaction)?;

    transaction.commit()?;

    Ok(CreatedCategory {
        category: Category { id, name },
        transactions_backfilled,
    })
}

/// Retrieve the categories owned by `user_id`, in creation order.
pub fn get_categories(user_id: UserID, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, nome FROM categorias WHERE usuario_id = :usuario_id ORDER BY id ASC")?
        .query_map(&[(":usuario_id", &user_id.as_i64())], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Check whether `category_id` refers to a category owned by `user_id`.
pub fn category_belongs_to_user(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM categorias WHERE id = ?1 AND usuario_id = ?2)",
            (category_id, user_id.as_i64()),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);

    Ok(Category { id, name })
}
