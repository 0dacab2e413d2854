//! The category listing endpoint.

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::PathRejection},
};

use crate::{
    AppState, DbPool, Error,
    category::{Category, get_categories},
    db::get_connection,
    user::UserID,
};

/// The state needed for listing categories.
#[derive(Debug, Clone)]
pub struct CategoryListState {
    pub db_pool: DbPool,
}

impl FromRef<AppState> for CategoryListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_pool: state.db_pool.clone(),
        }
    }
}

/// List a user's categories as `[{id, nome}]`.
///
/// A user with no categories, or an unknown user, gets an empty list.
pub async fn list_categories_endpoint(
    State(state): State<CategoryListState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<Category>>, Error> {
    let Path(user_id) = path?;
    let connection = get_connection(&state.db_pool)?;

    get_categories(UserID::new(user_id), &connection).map(Json)
}

#[cfg(test)]
mod list_categories_endpoint_tests {
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        AppState, build_router,
        db::create_test_pool,
        endpoints::{self, format_endpoint},
    };

    fn get_test_server() -> TestServer {
        let state = AppState::new(create_test_pool(), "Etc/UTC").expect("Could not create state");

        TestServer::new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn lists_only_the_users_categories() {
        let server = get_test_server();
        for (name, user_id) in [("Mercado", 1), ("Salário", 1), ("Lazer", 2)] {
            server
                .post(endpoints::CATEGORIES)
                .json(&json!({ "nome": name, "usuario_id": user_id }))
                .await
                .assert_status_success();
        }

        let response = server
            .get(&format_endpoint(endpoints::USER_CATEGORIES, 1))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<serde_json::Value>(),
            json!([{ "id": 1, "nome": "Mercado" }, { "id": 2, "nome": "Salário" }])
        );
    }

    #[tokio::test]
    async fn unknown_user_has_no_categories() {
        let server = get_test_server();

        let response = server
            .get(&format_endpoint(endpoints::USER_CATEGORIES, 99))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<serde_json::Value>(), json!([]));
    }
}
