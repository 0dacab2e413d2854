//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::category::CategoryId;

/// The message sent to clients for any error they cannot act on.
pub const INTERNAL_ERROR_MSG: &str = "Erro interno do servidor";

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request body was not valid JSON, or a required field was missing
    /// or had an invalid value.
    ///
    /// The string describes the problem and is safe to show to the client.
    #[error("{0}")]
    MalformedRequest(String),

    /// No user matched the username and password digest.
    #[error("Credenciais inválidas")]
    InvalidCredentials,

    /// The category ID on a new transaction does not refer to a category
    /// owned by the same user.
    #[error("a categoria {0} não existe para este usuário")]
    InvalidCategory(CategoryId),

    /// A column that a query depends on is missing from the database.
    ///
    /// This should not happen once [crate::initialize_db] has run.
    #[error("schema error: {0}")]
    SchemaError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// A connection could not be checked out of the connection pool.
    #[error("could not get a database connection: {0}")]
    ConnectionPoolError(String),

    /// The configured timezone is not a canonical timezone name.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// A CSV report could not be written.
    #[error("could not write CSV: {0}")]
    CsvError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl From<r2d2::Error> for Error {
    fn from(value: r2d2::Error) -> Self {
        tracing::error!("could not check out a database connection: {}", value);
        Error::ConnectionPoolError(value.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::CsvError(value.to_string())
    }
}

impl From<JsonRejection> for Error {
    fn from(value: JsonRejection) -> Self {
        tracing::debug!("rejected JSON body: {}", value.body_text());
        Error::MalformedRequest("Corpo da requisição inválido".to_owned())
    }
}

impl From<PathRejection> for Error {
    fn from(value: PathRejection) -> Self {
        tracing::debug!("rejected path parameters: {}", value.body_text());
        Error::MalformedRequest("Parâmetro inválido na URL".to_owned())
    }
}

impl From<QueryRejection> for Error {
    fn from(value: QueryRejection) -> Self {
        tracing::debug!("rejected query string: {}", value.body_text());
        Error::MalformedRequest("Parâmetros de consulta inválidos".to_owned())
    }
}

/// Return the value of a required request field or a [Error::MalformedRequest]
/// naming the missing field.
pub fn required<T>(value: Option<T>, field_name: &str) -> Result<T, Error> {
    value.ok_or_else(|| Error::MalformedRequest(format!("Campo obrigatório ausente: {field_name}")))
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Error::MalformedRequest(_) | Error::InvalidCategory(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Error::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MSG.to_owned(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod error_response_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::{Error, INTERNAL_ERROR_MSG, required};

    async fn body_json(error: Error) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Could not read response body");

        (
            status,
            serde_json::from_slice(&bytes).expect("Response body is not JSON"),
        )
    }

    #[tokio::test]
    async fn malformed_request_is_bad_request() {
        let (status, body) =
            body_json(Error::MalformedRequest("Campo obrigatório ausente: tipo".to_owned())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Campo obrigatório ausente: tipo");
    }

    #[tokio::test]
    async fn invalid_credentials_is_unauthorized() {
        let (status, body) = body_json(Error::InvalidCredentials).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Credenciais inválidas");
    }

    #[tokio::test]
    async fn sql_error_text_is_not_sent_to_client() {
        let (status, body) = body_json(Error::SqlError(rusqlite::Error::InvalidQuery)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], INTERNAL_ERROR_MSG);
    }

    #[tokio::test]
    async fn schema_error_is_internal() {
        let (status, body) = body_json(Error::SchemaError("transacoes.data".to_owned())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], INTERNAL_ERROR_MSG);
    }

    #[test]
    fn required_names_missing_field() {
        assert_eq!(required(Some(1), "valor"), Ok(1));
        assert_eq!(
            required::<f64>(None, "valor"),
            Err(Error::MalformedRequest(
                "Campo obrigatório ausente: valor".to_owned()
            ))
        );
    }
}
