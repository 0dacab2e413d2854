//! Endpoints for a user's overall and monthly totals.

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::PathRejection},
};

use crate::{
    AppState, DbPool, Error,
    db::get_connection,
    report::{MonthlySummary, Summary, get_monthly_summary, get_summary},
    user::UserID,
};

/// The state needed for the summary endpoints.
#[derive(Debug, Clone)]
pub struct SummaryState {
    pub db_pool: DbPool,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_pool: state.db_pool.clone(),
        }
    }
}

/// Get a user's total income, expenses and balance.
pub async fn get_summary_endpoint(
    State(state): State<SummaryState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Summary>, Error> {
    let Path(user_id) = path?;
    let connection = get_connection(&state.db_pool)?;

    get_summary(UserID::new(user_id), &connection).map(Json)
}

/// Get a user's income and expenses for each month.
pub async fn get_monthly_summary_endpoint(
    State(state): State<SummaryState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MonthlySummary>, Error> {
    let Path(user_id) = path?;
    let connection = get_connection(&state.db_pool)?;

    get_monthly_summary(UserID::new(user_id), &connection).map(Json)
}
