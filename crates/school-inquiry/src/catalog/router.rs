use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use tracing::error;

use super::domain::NoticeRequest;
use super::repository::CatalogRepository;
use super::service::{CatalogError, CatalogService};
use crate::http;
use crate::store::offload;

/// Router builder exposing fee and notice endpoints.
pub fn catalog_router<R>(service: Arc<CatalogService<R>>) -> Router
where
    R: CatalogRepository + 'static,
{
    Router::new()
        .route("/api/fees", get(fees_handler::<R>))
        .route(
            "/api/notices",
            get(notices_handler::<R>).post(create_notice_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn fees_handler<R>(State(service): State<Arc<CatalogService<R>>>) -> Response
where
    R: CatalogRepository + 'static,
{
    match offload(move || service.fees()).await {
        Ok(fees) => (StatusCode::OK, Json(fees)).into_response(),
        Err(err) => {
            error!(error = %err, "fees fetch failed");
            http::message(StatusCode::INTERNAL_SERVER_ERROR, "Error fetching fees")
        }
    }
}

pub(crate) async fn notices_handler<R>(State(service): State<Arc<CatalogService<R>>>) -> Response
where
    R: CatalogRepository + 'static,
{
    match offload(move || service.notices(Utc::now())).await {
        Ok(notices) => (StatusCode::OK, Json(notices)).into_response(),
        Err(err) => {
            error!(error = %err, "notices fetch failed");
            http::message(StatusCode::INTERNAL_SERVER_ERROR, "Error fetching notices")
        }
    }
}

// Unauthenticated: anyone who can reach the API can publish a notice.
pub(crate) async fn create_notice_handler<R>(
    State(service): State<Arc<CatalogService<R>>>,
    payload: Result<Json<NoticeRequest>, JsonRejection>,
) -> Response
where
    R: CatalogRepository + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return http::malformed_body(rejection),
    };

    match offload(move || service.publish_notice(request, Utc::now())).await {
        Ok(stored) => http::created("Notice created successfully", stored),
        Err(CatalogError::IncompleteNotice) => http::message(
            StatusCode::BAD_REQUEST,
            &CatalogError::IncompleteNotice.to_string(),
        ),
        Err(CatalogError::Store(err)) => {
            error!(error = %err, "notice creation failed");
            http::message(StatusCode::INTERNAL_SERVER_ERROR, "Error creating notice")
        }
    }
}
