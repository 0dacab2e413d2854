//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::Error;

/// The JSON fields whose values are never written to the logs.
const REDACTED_FIELDS: [&str; 1] = ["senha"];

const REDACTED_VALUE: &str = "********";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
/// Passwords in request bodies that parse as JSON are redacted, whatever the
/// declared content type.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!("Could not read request body: {error}");
            return Error::MalformedRequest("Corpo da requisição inválido".to_owned())
                .into_response();
        }
    };

    log_request(&parts, &request_body_for_log(&body_bytes));

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            Bytes::new()
        }
    };
    log_response(&parts, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

/// The request body as it should appear in the logs.
fn request_body_for_log(body_bytes: &[u8]) -> String {
    redact_json_fields(&String::from_utf8_lossy(body_bytes))
}

/// Replace the values of [REDACTED_FIELDS] in a JSON object.
///
/// Text that is not a JSON object is returned unchanged.
fn redact_json_fields(body: &str) -> String {
    let Ok(serde_json::Value::Object(mut object)) =
        serde_json::from_str::<serde_json::Value>(body)
    else {
        return body.to_string();
    };

    let mut redacted = false;
    for field in REDACTED_FIELDS {
        if let Some(value) = object.get_mut(field) {
            *value = serde_json::Value::String(REDACTED_VALUE.to_owned());
            redacted = true;
        }
    }

    if redacted {
        serde_json::Value::Object(object).to_string()
    } else {
        body.to_string()
    }
}

const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// The first [LOG_BODY_LENGTH_LIMIT] characters of `body`, or `None` if it is short enough.
fn truncate(body: &str) -> Option<&str> {
    body.char_indices()
        .nth(LOG_BODY_LENGTH_LIMIT)
        .map(|(end, _)| &body[..end])
}

fn log_request(headers: &axum::http::request::Parts, body: &str) {
    if let Some(prefix) = truncate(body) {
        tracing::info!("Received request: {headers:#?}\nbody: {prefix}...");
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!("Received request: {headers:#?}\nbody: {body:?}");
    }
}

fn log_response(headers: &axum::http::response::Parts, body: &str) {
    if let Some(prefix) = truncate(body) {
        tracing::info!("Sending response: {headers:#?}\nbody: {prefix}...");
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {headers:#?}\nbody: {body:?}");
    }
}

#[cfg(test)]
mod logging_tests {
    use axum::{Router, body::Bytes, middleware, routing::post};
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        AppState, build_router,
        db::create_test_pool,
        endpoints,
        user::{DEFAULT_PASSWORD, DEFAULT_USERNAME},
    };

    use super::{
        LOG_BODY_LENGTH_LIMIT, logging_middleware, redact_json_fields, request_body_for_log,
        truncate,
    };

    #[test]
    fn redacts_password_field() {
        let redacted = redact_json_fields(r#"{"username":"test","senha":"senha123"}"#);

        let value: serde_json::Value = serde_json::from_str(&redacted).unwrap();
        assert_eq!(value, json!({ "username": "test", "senha": "********" }));
        assert!(!redacted.contains("senha123"));
    }

    #[test]
    fn leaves_bodies_without_password_alone() {
        let body = r#"{"nome": "Mercado", "usuario_id": 1}"#;

        assert_eq!(redact_json_fields(body), body);
    }

    #[test]
    fn leaves_invalid_json_alone() {
        assert_eq!(redact_json_fields("{not json"), "{not json");
    }

    #[test]
    fn truncates_on_character_boundary() {
        let body = "ç".repeat(LOG_BODY_LENGTH_LIMIT + 1);

        let prefix = truncate(&body).expect("Body should be truncated");

        assert_eq!(prefix.chars().count(), LOG_BODY_LENGTH_LIMIT);
    }

    #[test]
    fn short_body_is_not_truncated() {
        assert_eq!(truncate("curto"), None);
    }

    #[tokio::test]
    async fn log_in_with_json_suffix_content_type_passes_through() {
        let state = AppState::new(create_test_pool(), "Etc/UTC").expect("Could not create state");
        let app = build_router(state).layer(middleware::from_fn(logging_middleware));
        let server = TestServer::new(app).expect("Could not create test server.");

        let response = server
            .post(endpoints::LOG_IN)
            .content_type("application/vnd.api+json")
            .bytes(Bytes::from(
                json!({ "username": DEFAULT_USERNAME, "senha": DEFAULT_PASSWORD }).to_string(),
            ))
            .await;

        response.assert_status_ok();
    }

    #[test]
    fn logged_request_body_never_contains_password() {
        let body = json!({ "username": DEFAULT_USERNAME, "senha": DEFAULT_PASSWORD }).to_string();

        let logged = request_body_for_log(body.as_bytes());

        assert!(!logged.contains(DEFAULT_PASSWORD));
        assert!(logged.contains(DEFAULT_USERNAME));
    }

    #[tokio::test]
    async fn middleware_passes_body_through() {
        let app = Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::new(app).expect("Could not create test server.");

        let response = server
            .post("/echo")
            .json(&json!({ "username": "test", "senha": "senha123" }))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<serde_json::Value>(),
            json!({ "username": "test", "senha": "senha123" })
        );
    }
}
