use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_match_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use patient_match::config::AppConfig;
use patient_match::error::AppError;
use patient_match::matching::{PatientMatchService, TracingAuditSink};
use patient_match::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    if config.auth.access_tokens.is_empty() {
        warn!("APP_ACCESS_TOKENS is empty; Patient/$match accepts unauthenticated requests");
    }

    let match_service = Arc::new(PatientMatchService::from_config(
        &config,
        Arc::new(TracingAuditSink),
    ));
    let base_url = match_service.base_url().to_string();

    let app = with_match_routes(match_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, %base_url, "patient match service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
