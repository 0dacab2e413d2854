//! Defines the core data models and database queries for transactions.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    category::{CategoryId, category_belongs_to_user},
    user::UserID,
};

// ============================================================================
// MODELS
// ============================================================================

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// Whether a transaction is money earned or money spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    /// Money earned, stored as "receita".
    #[serde(rename = "receita")]
    Income,
    /// Money spent, stored as "despesa".
    #[serde(rename = "despesa")]
    Expense,
}

impl Kind {
    /// The value stored in the `tipo` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Income => "receita",
            Kind::Expense => "despesa",
        }
    }

    /// Parse a kind sent by a client.
    ///
    /// # Errors
    ///
    /// Returns an [Error::MalformedRequest] for anything other than "receita" or "despesa".
    pub fn parse(value: &str) -> Result<Self, Error> {
        match value {
            "receita" => Ok(Kind::Income),
            "despesa" => Ok(Kind::Expense),
            other => Err(Error::MalformedRequest(format!(
                "Tipo inválido: \"{other}\" (use \"receita\" ou \"despesa\")"
            ))),
        }
    }

    /// Classify a stored `tipo` value.
    ///
    /// Only "receita" is income. Anything else, including a missing value,
    /// counts as an expense.
    pub fn from_db(value: Option<&str>) -> Self {
        match value {
            Some("receita") => Kind::Income,
            _ => Kind::Expense,
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Serializes with the field names clients expect:
/// `{id, valor, descricao, tipo, categoria, data}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money spent or earned.
    #[serde(rename = "valor")]
    pub amount: f64,
    /// A text description of what the transaction was for.
    #[serde(rename = "descricao")]
    pub description: String,
    /// Whether the money was earned or spent.
    #[serde(rename = "tipo")]
    pub kind: Kind,
    /// The name of the transaction's category, if it has one.
    #[serde(rename = "categoria")]
    pub category: Option<String>,
    /// When the transaction happened, usually `YYYY-MM-DD`.
    ///
    /// `None` for transactions recorded before dates were tracked.
    #[serde(rename = "data")]
    pub date: Option<String>,
}

/// A transaction that has not been saved yet.
///
/// # Examples
///
/// ```ignore
/// let transaction = NewTransaction::new(45.99, Kind::Expense, UserID::new(1), "2025-01-15")
///     .description("Padaria")
///     .category_id(Some(3));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub amount: f64,
    pub kind: Kind,
    pub user_id: UserID,
    /// Stored as given.
    pub date: String,
    /// Defaults to the empty string.
    pub description: String,
    /// Must refer to a category owned by `user_id`.
    pub category_id: Option<CategoryId>,
}

impl NewTransaction {
    /// Start building a transaction without a description or category.
    pub fn new(amount: f64, kind: Kind, user_id: UserID, date: &str) -> Self {
        Self {
            amount,
            kind,
            user_id,
            date: date.to_owned(),
            description: String::new(),
            category_id: None,
        }
    }

    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the category id for the transaction.
    pub fn category_id(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const SELECT_TRANSACTIONS: &str = "SELECT t.id, COALESCE(t.valor, 0.0), COALESCE(t.descricao, ''), t.tipo, c.nome, t.data
     FROM transacoes t
     LEFT JOIN categorias c ON c.id = t.categoria_id";

/// Save a new transaction and return its ID.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if the category ID does not refer to a category owned by the same user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<TransactionId, Error> {
    if let Some(category_id) = transaction.category_id {
        if !category_belongs_to_user(category_id, transaction.user_id, connection)? {
            return Err(Error::InvalidCategory(category_id));
        }
    }

    connection.execute(
        "INSERT INTO transacoes (valor, descricao, tipo, usuario_id, categoria_id, data)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            transaction.amount,
            &transaction.description,
            transaction.kind.as_str(),
            transaction.user_id.as_i64(),
            transaction.category_id,
            &transaction.date,
        ),
    )?;

    Ok(connection.last_insert_rowid())
}

/// Retrieve all of a user's transactions, newest first.
///
/// Dates are compared as strings and ties are broken by ID, newest first.
pub fn get_transactions(user_id: UserID, connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_TRANSACTIONS}
             WHERE t.usuario_id = ?1
             ORDER BY t.data DESC, t.id DESC"
        ))?
        .query_map([user_id.as_i64()], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Retrieve a user's transactions in one category, newest first.
pub fn get_transactions_by_category(
    user_id: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_TRANSACTIONS}
             WHERE t.usuario_id = ?1 AND t.categoria_id = ?2
             ORDER BY t.data DESC, t.id DESC"
        ))?
        .query_map((user_id.as_i64(), category_id), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Retrieve a user's transactions dated in `year`-`month`, oldest first.
///
/// A transaction is in the month if its date starts with `YYYY-MM`.
pub fn get_transactions_in_month(
    user_id: UserID,
    year: i32,
    month: u8,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let month_prefix = format!("{year:04}-{month:02}");

    connection
        .prepare(&format!(
            "{SELECT_TRANSACTIONS}
             WHERE t.usuario_id = ?1 AND substr(t.data, 1, 7) = ?2
             ORDER BY t.data ASC, t.id ASC"
        ))?
        .query_map((user_id.as_i64(), month_prefix), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let amount = row.get(1)?;
    let description = row.get(2)?;
    let raw_kind: Option<String> = row.get(3)?;
    let category = row.get(4)?;
    let date = row.get(5)?;

    Ok(Transaction {
        id,
        amount,
        description,
        kind: Kind::from_db(raw_kind.as_deref()),
        category,
        date,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod kind_tests {
    use crate::Error;

    use super::Kind;

    #[test]
    fn parses_known_kinds() {
        assert_eq!(Kind::parse("receita"), Ok(Kind::Income));
        assert_eq!(Kind::parse("despesa"), Ok(Kind::Expense));
    }

    #[test]
    fn parse_rejects_unknown_kind() {
        assert!(matches!(Kind::parse("Receita"), Err(Error::MalformedRequest(_))));
        assert!(matches!(Kind::parse(""), Err(Error::MalformedRequest(_))));
    }

    #[test]
    fn only_receita_is_stored_income() {
        assert_eq!(Kind::from_db(Some("receita")), Kind::Income);
        assert_eq!(Kind::from_db(Some("despesa")), Kind::Expense);
        assert_eq!(Kind::from_db(Some("gasto")), Kind::Expense);
        assert_eq!(Kind::from_db(None), Kind::Expense);
    }

    #[test]
    fn serializes_as_stored_value() {
        assert_eq!(serde_json::to_string(&Kind::Income).unwrap(), "\"receita\"");
        assert_eq!(serde_json::to_string(&Kind::Expense).unwrap(), "\"despesa\"");
    }
}
