//! Totals of income and expenses, overall and per month.

use std::collections::BTreeMap;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    schema::require_column,
    transaction::{Kind, Transaction, get_transactions},
    user::UserID,
};

/// The month key used for transactions without a date.
pub const UNDATED_LABEL: &str = "sem data";

/// A user's overall income, expenses and balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_receitas: f64,
    pub total_despesas: f64,
    /// Income minus expenses.
    pub saldo: f64,
}

/// Income and expenses within one month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    pub receitas: f64,
    pub despesas: f64,
}

/// Totals keyed by month (`YYYY-MM`), in ascending order.
pub type MonthlySummary = BTreeMap<String, MonthlyTotals>;

/// Round to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Sum income and expenses over `transactions`.
pub fn summarize(transactions: &[Transaction]) -> Summary {
    let (income, expenses) =
        transactions
            .iter()
            .fold((0.0, 0.0), |(income, expenses), transaction| {
                match transaction.kind {
                    Kind::Income => (income + transaction.amount, expenses),
                    Kind::Expense => (income, expenses + transaction.amount),
                }
            });

    Summary {
        total_receitas: round2(income),
        total_despesas: round2(expenses),
        saldo: round2(income - expenses),
    }
}

/// The month a transaction falls in: the first seven characters of its date.
fn month_key(transaction: &Transaction) -> String {
    match transaction.date.as_deref() {
        Some(date) if !date.is_empty() => date.chars().take(7).collect(),
        _ => UNDATED_LABEL.to_owned(),
    }
}

/// Sum income and expenses over `transactions` for each month.
pub fn summarize_by_month(transactions: &[Transaction]) -> MonthlySummary {
    let mut months = MonthlySummary::new();

    for transaction in transactions {
        let totals = months.entry(month_key(transaction)).or_default();

        match transaction.kind {
            Kind::Income => totals.receitas += transaction.amount,
            Kind::Expense => totals.despesas += transaction.amount,
        }
    }

    for totals in months.values_mut() {
        totals.receitas = round2(totals.receitas);
        totals.despesas = round2(totals.despesas);
    }

    months
}

/// Get the overall totals for a user. A user without transactions gets all zeros.
pub fn get_summary(user_id: UserID, connection: &Connection) -> Result<Summary, Error> {
    let transactions = get_transactions(user_id, connection)?;

    Ok(summarize(&transactions))
}

/// Get the per-month totals for a user.
///
/// # Errors
/// Returns an [Error::SchemaError] if the transaction table has no date
/// column, or an [Error::SqlError] if there is some other SQL error.
pub fn get_monthly_summary(
    user_id: UserID,
    connection: &Connection,
) -> Result<MonthlySummary, Error> {
    require_column(connection, "transacoes", "data")?;

    let transactions = get_transactions(user_id, connection)?;

    Ok(summarize_by_month(&transactions))
}
