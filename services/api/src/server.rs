use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use school_inquiry::catalog::{catalog_router, CatalogService, FallbackData};
use school_inquiry::config::AppConfig;
use school_inquiry::error::AppError;
use school_inquiry::inquiries::{inquiry_router, InquiryService};
use school_inquiry::notify::SmtpNotifier;
use school_inquiry::store::DocumentStore;
use school_inquiry::telemetry;
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::{cors_layer, panic_layer, shutdown_signal, AppState};
use crate::routes::with_service_routes;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;
    telemetry::install_panic_hook(config.environment);

    let store = Arc::new(DocumentStore::connect(&config.store.url)?);
    let fallback = Arc::new(FallbackData::load_or_empty(&config.store.fallback_path));
    let notifier = Arc::new(SmtpNotifier::from_config(&config.mail)?);

    let inquiries = Arc::new(InquiryService::new(store.clone(), notifier.clone()));
    let catalog = Arc::new(CatalogService::new(store.clone(), fallback));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        notifier,
    };

    let app = with_service_routes(inquiry_router(inquiries).merge(catalog_router(catalog)))
        .layer(Extension(app_state))
        .layer(panic_layer(config.environment))
        .layer(cors_layer(&config.server.cors_origins))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, store = %config.store.url, "school inquiry api ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    readiness_flag.store(false, Ordering::Release);
    store.close()?;
    info!("document store closed");
    Ok(())
}
