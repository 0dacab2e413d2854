//! The category creation endpoint.

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, DbPool, Error,
    category::{CategoryId, CategoryName, create_category, domain::CategoryData},
    db::get_connection,
    error::required,
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryState {
    pub db_pool: DbPool,
}

impl FromRef<AppState> for CreateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_pool: state.db_pool.clone(),
        }
    }
}

/// The JSON body of a successful category creation.
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct CategoryCreatedResponse {
    pub message: String,
    pub categoria_id: CategoryId,
}

/// Create a category and backfill it onto the user's matching uncategorized
/// transactions.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryState>,
    payload: Result<Json<CategoryData>, JsonRejection>,
) -> Result<Json<CategoryCreatedResponse>, Error> {
    let Json(data) = payload?;
    let raw_name = required(data.nome, "nome")?;
    let user_id = required(data.usuario_id, "usuario_id")?;
    let name = CategoryName::new(&raw_name)?;

    let connection = get_connection(&state.db_pool)?;
    let created = create_category(name, user_id, &connection)?;

    tracing::info!(
        "Created category \"{}\" for user {user_id}, backfilled {} transaction(s)",
        created.category.name,
        created.transactions_backfilled
    );

    Ok(Json(CategoryCreatedResponse {
        message: "Categoria adicionada com sucesso".to_owned(),
        categoria_id: created.category.id,
    }))
}
