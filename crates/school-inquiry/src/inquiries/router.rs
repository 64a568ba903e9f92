use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Response,
    routing::post,
    Json, Router,
};
use tracing::error;

use super::domain::{AdmissionRequest, ContactRequest};
use super::repository::InquiryRepository;
use super::service::{InquiryService, InquiryServiceError};
use crate::http;
use crate::notify::Notifier;

const SERVER_ERROR: &str = "Server error. Please try again later.";

/// Router builder exposing the contact and admission intake endpoints.
pub fn inquiry_router<R, N>(service: Arc<InquiryService<R, N>>) -> Router
where
    R: InquiryRepository + 'static,
    N: Notifier + 'static,
{
    Router::new()
        .route("/api/contact", post(contact_handler::<R, N>))
        .route("/api/admissions", post(admission_handler::<R, N>))
        .with_state(service)
}

pub(crate) async fn contact_handler<R, N>(
    State(service): State<Arc<InquiryService<R, N>>>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Response
where
    R: InquiryRepository + 'static,
    N: Notifier + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return http::malformed_body(rejection),
    };

    match service.submit_contact(request).await {
        Ok(stored) => http::created("Contact inquiry submitted successfully", stored),
        Err(err) => failure_response("contact", err),
    }
}

pub(crate) async fn admission_handler<R, N>(
    State(service): State<Arc<InquiryService<R, N>>>,
    payload: Result<Json<AdmissionRequest>, JsonRejection>,
) -> Response
where
    R: InquiryRepository + 'static,
    N: Notifier + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return http::malformed_body(rejection),
    };

    match service.submit_admission(request).await {
        Ok(stored) => http::created("Admission inquiry submitted successfully", stored),
        Err(err) => failure_response("admission", err),
    }
}

fn failure_response(kind: &'static str, err: InquiryServiceError) -> Response {
    match err {
        InquiryServiceError::Invalid(reason) => {
            http::message(StatusCode::BAD_REQUEST, &reason.to_string())
        }
        InquiryServiceError::Store(store_error) => {
            error!(kind, error = %store_error, "inquiry submission failed");
            http::message(StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR)
        }
    }
}
