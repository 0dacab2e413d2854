//! Application router configuration.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use crate::{
    AppState,
    category::{create_category_endpoint, list_categories_endpoint},
    endpoints,
    log_in::post_log_in,
    report::{
        export_transactions_endpoint, get_monthly_summary_endpoint, get_summary_endpoint,
        monthly_report_endpoint,
    },
    transaction::{
        create_transaction_endpoint, list_category_transactions_endpoint,
        list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Cross-origin requests are allowed from any origin.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::CATEGORIES, post(create_category_endpoint))
        .route(endpoints::USER_CATEGORIES, get(list_categories_endpoint))
        .route(endpoints::TRANSACTIONS, post(create_transaction_endpoint))
        .route(endpoints::USER_TRANSACTIONS, get(list_transactions_endpoint))
        .route(
            endpoints::USER_CATEGORY_TRANSACTIONS,
            get(list_category_transactions_endpoint),
        )
        .route(endpoints::SUMMARY, get(get_summary_endpoint))
        .route(endpoints::MONTHLY_SUMMARY, get(get_monthly_summary_endpoint))
        .route(endpoints::MONTHLY_REPORT, get(monthly_report_endpoint))
        .route(endpoints::EXPORT, get(export_transactions_endpoint))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod routing_tests {
    use axum::http::{HeaderValue, StatusCode, header::ORIGIN};
    use axum_test::TestServer;

    use crate::{AppState, build_router, db::create_test_pool, endpoints};

    fn get_test_server() -> TestServer {
        let state = AppState::new(create_test_pool(), "Etc/UTC").expect("Could not create state");

        TestServer::new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        let response = server.get("/nao_existe").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn wrong_method_is_not_allowed() {
        let server = get_test_server();

        let response = server.get(endpoints::LOG_IN).await;

        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn cross_origin_requests_are_allowed() {
        let server = get_test_server();

        let response = server
            .get("/resumo/1")
            .add_header(ORIGIN, HeaderValue::from_static("http://localhost:5173"))
            .await;

        response.assert_status_ok();
        assert_eq!(response.header("access-control-allow-origin"), "*");
    }
}
