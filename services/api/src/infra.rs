use chrono::{NaiveDate, NaiveTime};
use metrics_exporter_prometheus::PrometheusHandle;
use showroom::catalog::{CarDetailSource, CatalogError, StaticCatalog};
use showroom::config::CatalogConfig;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// Longest the page waits for the catalog before giving up.
pub(crate) const CATALOG_DEADLINE: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Catalog handle shared by the car page routes.
#[derive(Clone)]
pub(crate) struct CatalogState {
    pub(crate) source: Arc<dyn CarDetailSource>,
    pub(crate) deadline: Duration,
}

impl CatalogState {
    pub(crate) fn new(source: Arc<dyn CarDetailSource>) -> Self {
        Self {
            source,
            deadline: CATALOG_DEADLINE,
        }
    }
}

/// Records from the configured file, or the bundled record when none is set.
pub(crate) fn load_catalog(config: &CatalogConfig) -> Result<StaticCatalog, CatalogError> {
    match &config.path {
        Some(path) => StaticCatalog::from_path(path),
        None => StaticCatalog::bundled(),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|err| format!("failed to parse '{raw}' as HH:MM ({err})"))
}
