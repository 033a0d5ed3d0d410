use crate::cli::ServeArgs;
use crate::infra::{seed_demo_store, AppState};
use crate::routes::with_ops_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use ebes::config::AppConfig;
use ebes::error::AppError;
use ebes::telemetry;
use ebes::tracker::{InMemoryTrackerRepository, TrackerError, TrackerService};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

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

    let repository = if args.demo_data {
        let today = Local::now().date_naive();
        info!(%today, "loading demo agency");
        seed_demo_store(today).map_err(TrackerError::from)?
    } else {
        InMemoryTrackerRepository::default()
    };
    let tracker_service = Arc::new(TrackerService::new(
        Arc::new(repository),
        config.tracker,
        config.scoring,
    ));

    let app = with_ops_routes(tracker_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, demo_data = args.demo_data, "ebes tracker ready");

    axum::serve(listener, app).await?;
    Ok(())
}
