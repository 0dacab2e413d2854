//! Defines the endpoint for creating a new transaction.

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, DbPool, Error,
    category::CategoryId,
    db::get_connection,
    error::required,
    timezone::today,
    transaction::{Kind, NewTransaction, TransactionId, create_transaction},
    user::UserID,
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    pub db_pool: DbPool,
    /// The canonical timezone used to date transactions sent without a date.
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_pool: state.db_pool.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The JSON body of a request to create a transaction.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TransactionData {
    pub valor: Option<f64>,
    pub descricao: Option<String>,
    pub tipo: Option<String>,
    pub usuario_id: Option<UserID>,
    pub categoria_id: Option<CategoryId>,
    /// Defaults to today in the server's timezone when absent or blank.
    pub data: Option<String>,
}

/// The JSON body of a successful transaction creation.
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct TransactionCreatedResponse {
    pub message: String,
    pub transacao_id: TransactionId,
}

/// A route handler for creating a new transaction.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    payload: Result<Json<TransactionData>, JsonRejection>,
) -> Result<Json<TransactionCreatedResponse>, Error> {
    let Json(data) = payload?;
    let amount = required(data.valor, "valor")?;
    let kind = Kind::parse(&required(data.tipo, "tipo")?)?;
    let user_id = required(data.usuario_id, "usuario_id")?;
    let date = match data.data {
        Some(date) if !date.trim().is_empty() => date,
        _ => today(&state.local_timezone),
    };

    let transaction = NewTransaction::new(amount, kind, user_id, &date)
        .description(data.descricao.as_deref().unwrap_or_default())
        .category_id(data.categoria_id);

    let connection = get_connection(&state.db_pool)?;
    let transaction_id = create_transaction(transaction, &connection)?;

    Ok(Json(TransactionCreatedResponse {
        message: "Transação adicionada com sucesso".to_owned(),
        transacao_id: transaction_id,
    }))
}

#[cfg(test)]
mod create_transaction_endpoint_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use time::OffsetDateTime;

    use crate::{
        AppState, build_router,
        db::create_test_pool,
        endpoints::{self, format_endpoint},
        timezone::DATE_FORMAT,
        transaction::Transaction,
    };

    use super::TransactionCreatedResponse;

    fn get_test_server() -> TestServer {
        let state = AppState::new(create_test_pool(), "Etc/UTC").expect("Could not create state");

        TestServer::new(build_router(state)).expect("Could not create test server.")
    }

    async fn get_transactions(server: &TestServer, user_id: i64) -> Vec<Transaction> {
        server
            .get(&format_endpoint(endpoints::USER_TRANSACTIONS, user_id))
            .await
            .json::<Vec<Transaction>>()
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "valor": 3500.0,
                "descricao": "Salário",
                "tipo": "receita",
                "usuario_id": 1,
                "data": "2025-03-05",
            }))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<TransactionCreatedResponse>(),
            TransactionCreatedResponse {
                message: "Transação adicionada com sucesso".to_owned(),
                transacao_id: 1,
            }
        );
        assert_eq!(
            serde_json::to_value(get_transactions(&server, 1).await).unwrap(),
            json!([{
                "id": 1,
                "valor": 3500.0,
                "descricao": "Salário",
                "tipo": "receita",
                "categoria": null,
                "data": "2025-03-05",
            }])
        );
    }

    #[tokio::test]
    async fn can_create_transaction_for_user_without_account_row() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({ "valor": 25.0, "tipo": "despesa", "usuario_id": 5 }))
            .await;

        response.assert_status_ok();
        assert_eq!(get_transactions(&server, 5).await.len(), 1);
    }

    #[tokio::test]
    async fn missing_date_defaults_to_today() {
        let server = get_test_server();
        let today = OffsetDateTime::now_utc().date().format(DATE_FORMAT).unwrap();

        server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({ "valor": 10.0, "tipo": "despesa", "usuario_id": 1 }))
            .await
            .assert_status_ok();

        let transactions = get_transactions(&server, 1).await;
        assert_eq!(transactions[0].date.as_deref(), Some(today.as_str()));
        assert_eq!(transactions[0].description, "");
    }

    #[tokio::test]
    async fn missing_amount_is_rejected() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({ "tipo": "despesa", "usuario_id": 1 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<serde_json::Value>(),
            json!({ "error": "Campo obrigatório ausente: valor" })
        );
    }

    #[tokio::test]
    async fn missing_kind_is_rejected() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({ "valor": 10.0, "usuario_id": 1 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_user_is_rejected() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({ "valor": 10.0, "tipo": "despesa" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_kind_is_rejected() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({ "valor": 10.0, "tipo": "gasto", "usuario_id": 1 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(get_transactions(&server, 1).await.is_empty());
    }

    #[tokio::test]
    async fn category_of_another_user_is_rejected() {
        let server = get_test_server();
        server
            .post(endpoints::CATEGORIES)
            .json(&json!({ "nome": "Mercado", "usuario_id": 2 }))
            .await
            .assert_status_ok();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "valor": 10.0,
                "tipo": "despesa",
                "usuario_id": 1,
                "categoria_id": 1,
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(get_transactions(&server, 1).await.is_empty());
    }

    #[tokio::test]
    async fn invalid_json_is_rejected() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .content_type("application/json")
            .text("{\"valor\": ")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<serde_json::Value>()["error"].is_string());
    }
}
