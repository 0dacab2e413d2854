//! Endpoints for downloading transactions as CSV files.

use axum::{
    extract::{
        FromRef, Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    AppState, DbPool, Error,
    db::get_connection,
    error::required,
    report::render_csv,
    transaction::{get_transactions, get_transactions_in_month},
    user::UserID,
};

/// The state needed for the CSV endpoints.
#[derive(Debug, Clone)]
pub struct CsvReportState {
    pub db_pool: DbPool,
}

impl FromRef<AppState> for CsvReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_pool: state.db_pool.clone(),
        }
    }
}

/// The query string of a monthly report request, e.g. `?ano=2025&mes=3`.
///
/// Kept as strings so that bad values produce a JSON error like other bad input.
#[derive(Debug, Default, Deserialize)]
pub struct MonthlyReportQuery {
    pub ano: Option<String>,
    pub mes: Option<String>,
}

impl MonthlyReportQuery {
    fn parse(self) -> Result<(i32, u8), Error> {
        let raw_year = required(self.ano, "ano")?;
        let raw_month = required(self.mes, "mes")?;

        let year = raw_year
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|year| (0..=9999).contains(year))
            .ok_or_else(|| Error::MalformedRequest(format!("Ano inválido: \"{raw_year}\"")))?;

        let month = raw_month
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|month| (1..=12).contains(month))
            .ok_or_else(|| {
                Error::MalformedRequest(format!(
                    "Mês inválido: \"{raw_month}\" (use um valor de 1 a 12)"
                ))
            })?;

        Ok((year, month))
    }
}

/// Download the transactions of one month as `relatorio_YYYY_MM.csv`, oldest first.
pub async fn monthly_report_endpoint(
    State(state): State<CsvReportState>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<MonthlyReportQuery>, QueryRejection>,
) -> Result<Response, Error> {
    let Path(user_id) = path?;
    let Query(query) = query?;
    let (year, month) = query.parse()?;

    let connection = get_connection(&state.db_pool)?;
    let transactions = get_transactions_in_month(UserID::new(user_id), year, month, &connection)?;
    let csv = render_csv(&transactions)?;

    Ok(csv_attachment(
        &format!("relatorio_{year:04}_{month:02}.csv"),
        csv,
    ))
}

/// Download all of a user's transactions as `transacoes.csv`, newest first.
pub async fn export_transactions_endpoint(
    State(state): State<CsvReportState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Response, Error> {
    let Path(user_id) = path?;
    let connection = get_connection(&state.db_pool)?;
    let transactions = get_transactions(UserID::new(user_id), &connection)?;
    let csv = render_csv(&transactions)?;

    Ok(csv_attachment("transacoes.csv", csv))
}

fn csv_attachment(filename: &str, csv: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    )
        .into_response()
}
