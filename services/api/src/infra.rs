use std::any::Any;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method, Response, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use school_inquiry::config::AppEnvironment;
use school_inquiry::notify::Notifier;
use school_inquiry::telemetry;
use serde_json::json;
use tower_http::catch_panic::{CatchPanicLayer, ResponseForPanic};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{error, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) notifier: Arc<dyn Notifier>,
}

/// Browser access limited to the configured site origins.
pub(crate) fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring malformed CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60))
}

/// Turns a panicking handler into the generic 500 body.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PanicResponse {
    production: bool,
}

impl ResponseForPanic for PanicResponse {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response<Body> {
        let detail = telemetry::panic_message(&*err);
        error!(panic = %detail, "request handler panicked");

        // Panic text stays in the logs under production.
        let error = if self.production {
            "Internal server error".to_string()
        } else {
            detail
        };
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Something went wrong!", "error": error })),
        )
            .into_response()
    }
}

pub(crate) fn panic_layer(environment: AppEnvironment) -> CatchPanicLayer<PanicResponse> {
    CatchPanicLayer::custom(PanicResponse {
        production: environment.is_production(),
    })
}

/// Resolves once Ctrl+C or SIGTERM is received.
pub(crate) async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("received Ctrl+C, shutting down"),
            Err(err) => {
                warn!(error = %err, "unable to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(err) => {
                warn!(error = %err, "unable to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        Router::new()
            .route("/api/fees", get(|| async { "[]" }))
            .layer(cors_layer(&[
                "http://localhost:5173".to_string(),
                "not a header\n".to_string(),
            ]))
    }

    #[tokio::test]
    async fn allows_configured_origin() {
        let response = app()
            .oneshot(
                Request::get("/api/fees")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("http://localhost:5173"))
        );
    }

    async fn explode() -> &'static str {
        panic!("fee table offline")
    }

    async fn panicking_request(environment: AppEnvironment) -> (StatusCode, serde_json::Value) {
        let response = Router::new()
            .route("/api/fees", get(explode))
            .layer(panic_layer(environment))
            .oneshot(Request::get("/api/fees").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&body).expect("json body"))
    }

    #[tokio::test]
    async fn handler_panic_hides_detail_in_production() {
        let (status, body) = panicking_request(AppEnvironment::Production).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Something went wrong!");
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn handler_panic_reports_detail_in_development() {
        let (status, body) = panicking_request(AppEnvironment::Development).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Something went wrong!");
        assert_eq!(body["error"], "fee table offline");
    }

    #[tokio::test]
    async fn omits_header_for_unknown_origin() {
        let response = app()
            .oneshot(
                Request::get("/api/fees")
                    .header(header::ORIGIN, "https://elsewhere.example")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
