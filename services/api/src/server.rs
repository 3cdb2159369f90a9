use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState, CatalogState};
use crate::routes::with_showroom_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use showroom::config::AppConfig;
use showroom::error::AppError;
use showroom::leads::{LeadService, SimulatedLeadSubmitter};
use showroom::telemetry;
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

    let catalog = load_catalog(&config.catalog)?.with_latency(config.catalog.latency);
    info!(
        records = catalog.records().len(),
        source = ?config.catalog.path,
        "catalog loaded"
    );

    let submitter = Arc::new(SimulatedLeadSubmitter::new(config.leads.latency));
    let lead_service = Arc::new(LeadService::with_deadline(submitter, config.leads.timeout));

    let app = with_showroom_routes(lead_service, CatalogState::new(Arc::new(catalog)))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "showroom service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
