//! Endpoints for listing a user's transactions.

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::PathRejection},
};

use crate::{
    AppState, DbPool, Error,
    category::CategoryId,
    db::get_connection,
    transaction::{Transaction, get_transactions, get_transactions_by_category},
    user::UserID,
};

/// The state needed for listing transactions.
#[derive(Debug, Clone)]
pub struct TransactionListState {
    pub db_pool: DbPool,
}

impl FromRef<AppState> for TransactionListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_pool: state.db_pool.clone(),
        }
    }
}

/// List all of a user's transactions, newest first.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionListState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let Path(user_id) = path?;
    let connection = get_connection(&state.db_pool)?;

    get_transactions(UserID::new(user_id), &connection).map(Json)
}

/// List a user's transactions in one category, newest first.
pub async fn list_category_transactions_endpoint(
    State(state): State<TransactionListState>,
    path: Result<Path<(i64, CategoryId)>, PathRejection>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let Path((user_id, category_id)) = path?;
    let connection = get_connection(&state.db_pool)?;

    get_transactions_by_category(UserID::new(user_id), category_id, &connection).map(Json)
}
