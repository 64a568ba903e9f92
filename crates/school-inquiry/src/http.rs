use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
struct Created<'a, T> {
    message: &'a str,
    data: T,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    message: &'a str,
}

/// `201 {message, data}` for a stored document.
pub(crate) fn created<T: Serialize>(message: &str, data: T) -> Response {
    (StatusCode::CREATED, Json(Created { message, data })).into_response()
}

/// `{message}` body with the given status.
pub(crate) fn message(status: StatusCode, message: &str) -> Response {
    (status, Json(Message { message })).into_response()
}

/// Malformed JSON bodies are client errors regardless of the rejection kind.
pub(crate) fn malformed_body(rejection: JsonRejection) -> Response {
    debug!(error = %rejection.body_text(), "rejected request body");
    message(
        StatusCode::BAD_REQUEST,
        &format!("Invalid request body: {}", rejection.body_text()),
    )
}
