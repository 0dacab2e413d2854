//! Retroactively assigns a new category to matching uncategorized transactions.
//!
//! A transaction matches when its description contains the category name,
//! ignoring case. Only transactions without a category are considered, so a
//! transaction keeps the first category that matched it.

use rusqlite::Connection;

use crate::{
    Error,
    category::{CategoryId, CategoryName},
    transaction::TransactionId,
    user::UserID,
};

/// Check if a transaction description mentions a category name (case-insensitive).
///
/// # Arguments
/// * `description` - The transaction description to check
/// * `category_name` - The category name to look for
///
/// # Returns
/// `true` if `category_name` occurs anywhere in `description`, ignoring case.
#[inline]
pub fn description_matches_category(description: &str, category_name: &str) -> bool {
    description
        .to_lowercase()
        .contains(&category_name.to_lowercase())
}

/// Attach `category_id` to every uncategorized transaction of `user_id` whose
/// description matches `category_name`.
///
/// **Note**: If you want the category insert and the backfill to succeed or
/// fail together, pass in a transaction for `connection`.
///
/// Returns the number of transactions that were updated.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn backfill_category(
    category_id: CategoryId,
    category_name: &CategoryName,
    user_id: UserID,
    connection: &Connection,
) -> Result<usize, Error> {
    let candidates = get_uncategorized_transactions(user_id, connection)?;

    let matching_ids: Vec<TransactionId> = candidates
        .into_iter()
        .filter(|(_, description)| {
            description_matches_category(description, category_name.as_ref())
        })
        .map(|(transaction_id, _)| transaction_id)
        .collect();

    batch_set_transaction_category(&matching_ids, category_id, connection)?;

    Ok(matching_ids.len())
}

/// Get the IDs and descriptions of `user_id`'s transactions without a category.
fn get_uncategorized_transactions(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<(TransactionId, String)>, Error> {
    connection
        .prepare(
            "SELECT id, COALESCE(descricao, '') FROM transacoes
             WHERE usuario_id = :usuario_id AND categoria_id IS NULL",
        )?
        .query_map(&[(":usuario_id", &user_id.as_i64())], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::from)
}

fn batch_set_transaction_category(
    transaction_ids: &[TransactionId],
    category_id: CategoryId,
    connection: &Connection,
) -> Result<(), Error> {
    if transaction_ids.is_empty() {
        return Ok(());
    }

    let mut stmt = connection.prepare("UPDATE transacoes SET categoria_id = ?2 WHERE id = ?1")?;

    for transaction_id in transaction_ids {
        stmt.execute((transaction_id, category_id))?;
    }

    Ok(())
}

#[cfg(test)]
mod backfill_tests {
    use rusqlite::Connection;

    use crate::{
        category::CategoryName,
        initialize_db,
        transaction::{Kind, NewTransaction, create_transaction, get_transactions},
        user::UserID,
    };

    use super::{backfill_category, description_matches_category};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();
        connection
    }

    fn insert_category(name: &str, user_id: UserID, connection: &Connection) -> i64 {
        connection
            .execute(
                "INSERT INTO categorias (nome, usuario_id) VALUES (?1, ?2)",
                (name, user_id.as_i64()),
            )
            .unwrap();
        connection.last_insert_rowid()
    }

    #[test]
    fn matches_substring_case_insensitive() {
        assert!(description_matches_category("Food delivery", "Food"));
        assert!(description_matches_category("food delivery", "FOOD"));
        assert!(description_matches_category("Late night FOOD", "food"));
        assert!(description_matches_category("Açaí na praia", "açaí"));

        assert!(!description_matches_category("Fuel", "Food"));
        assert!(!description_matches_category("", "Food"));
    }

    #[test]
    fn backfills_only_matching_transactions_of_the_same_user() {
        let connection = get_test_connection();
        let user = UserID::new(5);
        let other_user = UserID::new(6);
        let matching = create_transaction(
            NewTransaction::new(25.0, Kind::Expense, user, "2025-01-02").description("Food delivery"),
            &connection,
        )
        .unwrap();
        let unrelated = create_transaction(
            NewTransaction::new(60.0, Kind::Expense, user, "2025-01-03").description("Fuel"),
            &connection,
        )
        .unwrap();
        let other_users = create_transaction(
            NewTransaction::new(25.0, Kind::Expense, other_user, "2025-01-02")
                .description("Food delivery"),
            &connection,
        )
        .unwrap();
        let category_id = insert_category("Food", user, &connection);

        let updated = backfill_category(
            category_id,
            &CategoryName::new_unchecked("Food"),
            user,
            &connection,
        )
        .unwrap();

        assert_eq!(updated, 1);
        let transactions = get_transactions(user, &connection).unwrap();
        let category_of = |id: i64| {
            transactions
                .iter()
                .find(|transaction| transaction.id == id)
                .unwrap()
                .category
                .clone()
        };
        assert_eq!(category_of(matching), Some("Food".to_owned()));
        assert_eq!(category_of(unrelated), None);
        let other_transactions = get_transactions(other_user, &connection).unwrap();
        assert_eq!(other_transactions[0].id, other_users);
        assert_eq!(other_transactions[0].category, None);
    }

    #[test]
    fn does_not_overwrite_existing_category() {
        let connection = get_test_connection();
        let user = UserID::new(1);
        let first_category = insert_category("Food", user, &connection);
        create_transaction(
            NewTransaction::new(25.0, Kind::Expense, user, "2025-01-02")
                .description("Fast food")
                .category_id(Some(first_category)),
            &connection,
        )
        .unwrap();
        let second_category = insert_category("Fast", user, &connection);

        let updated = backfill_category(
            second_category,
            &CategoryName::new_unchecked("Fast"),
            user,
            &connection,
        )
        .unwrap();

        assert_eq!(updated, 0);
        let transactions = get_transactions(user, &connection).unwrap();
        assert_eq!(transactions[0].category, Some("Food".to_owned()));
    }

    #[test]
    fn no_transactions_updates_nothing() {
        let connection = get_test_connection();
        let user = UserID::new(1);
        let category_id = insert_category("Food", user, &connection);

        let updated = backfill_category(
            category_id,
            &CategoryName::new_unchecked("Food"),
            user,
            &connection,
        )
        .unwrap();

        assert_eq!(updated, 0);
    }
}
