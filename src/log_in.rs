//! The log-in endpoint.
//!
//! Logging in is stateless: no session or token is issued. The client keeps
//! the returned user ID and sends it with later requests.

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, DbPool, Error,
    db::get_connection,
    error::required,
    user::{UserID, verify_credentials},
};

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    pub db_pool: DbPool,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_pool: state.db_pool.clone(),
        }
    }
}

/// The JSON body of a log-in request.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct LogInData {
    pub username: Option<String>,
    pub senha: Option<String>,
}

/// The JSON body of a successful log-in.
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct LogInResponse {
    pub message: String,
    pub usuario_id: UserID,
}

/// Handler for log-in requests via the POST method.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The username or password is missing.
/// - No user has that username and password.
/// - The database could not be queried.
pub async fn post_log_in(
    State(state): State<LoginState>,
    payload: Result<Json<LogInData>, JsonRejection>,
) -> Result<Json<LogInResponse>, Error> {
    let Json(user_data) = payload?;
    let username = required(user_data.username, "username")?;
    let password = required(user_data.senha, "senha")?;

    let connection = get_connection(&state.db_pool)?;
    let user_id = verify_credentials(&username, &password, &connection).inspect_err(|error| {
        if *error == Error::InvalidCredentials {
            tracing::info!("Failed log-in attempt for \"{username}\"");
        }
    })?;

    Ok(Json(LogInResponse {
        message: "Login bem-sucedido".to_owned(),
        usuario_id: user_id,
    }))
}
