use std::sync::atomic::Ordering;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::Utc;
use school_inquiry::notify::templates;
use serde_json::json;
use tracing::{error, info};

use crate::infra::AppState;

pub(crate) const SCHOOL_NAME: &str = "Siddhartha Model School";

/// Operational endpoints layered on top of the inquiry and catalog routers.
pub(crate) fn with_service_routes(app: Router) -> Router {
    app.route("/", get(index))
        .route("/api/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/test-email", post(test_email_endpoint))
}

pub(crate) async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Siddhartha Group of Schools API",
        "status": "Server is running",
        "endpoints": {
            "health": "/api/health",
            "contact": "POST /api/contact",
            "admissions": "POST /api/admissions",
            "fees": "GET /api/fees",
            "notices": "GET /api/notices",
            "testEmail": "POST /api/test-email",
        },
        "timestamp": Utc::now(),
    }))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "Server is running", "timestamp": Utc::now() }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn test_email_endpoint(
    Extension(state): Extension<AppState>,
) -> impl IntoResponse {
    match state
        .notifier
        .send(templates::test_email(SCHOOL_NAME, Utc::now()))
        .await
    {
        Ok(delivery) => {
            info!(message_id = %delivery.message_id, "test email sent");
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "Test email sent successfully!",
                    "messageId": delivery.message_id,
                })),
            )
        }
        Err(err) => {
            error!(error = %err, "test email failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "message": "Failed to send test email",
                    "error": err.to_string(),
                })),
            )
        }
    }
}
