use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_dashboard_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use deal_scout::config::{load_criteria_or_standard, AppConfig};
use deal_scout::error::AppError;
use deal_scout::telemetry;
use deal_scout::workflows::acquisition::{CsvCandidateStore, ScoutService};
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

    let criteria = load_criteria_or_standard(config.paths.criteria_path.as_deref())?;
    let criteria_version = criteria.version.clone();
    let candidates_file = config.paths.candidates_file();
    let store = Arc::new(CsvCandidateStore::new(candidates_file.clone()));
    let scout_service = Arc::new(ScoutService::new(store, criteria));

    let app = with_dashboard_routes(scout_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        criteria = %criteria_version,
        candidates = %candidates_file.display(),
        "deal scout dashboard ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
