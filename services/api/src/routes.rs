use crate::infra::{AppState, CatalogState};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use showroom::catalog::{resolve_within, CatalogError};
use showroom::configurator::{build_page, build_quote, Quote, Selection, UnavailablePage};
use showroom::error::AppError;
use showroom::format::format_currency;
use showroom::leads::{lead_router, LeadService, LeadSubmitter};
use showroom::pricing::FeeScheduleImporter;
use std::io::Cursor;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuoteRequest {
    #[serde(default)]
    pub(crate) trim_code: Option<String>,
    #[serde(default)]
    pub(crate) exterior_code: Option<String>,
    #[serde(default)]
    pub(crate) interior_code: Option<String>,
    #[serde(default)]
    pub(crate) fees_csv: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuoteResponse {
    pub(crate) fee_source: FeeSource,
    pub(crate) price_label: String,
    pub(crate) on_road_label: String,
    pub(crate) quote: Quote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum FeeSource {
    Imported,
    Catalog,
}

pub(crate) fn with_showroom_routes<S>(
    leads: Arc<LeadService<S>>,
    catalog: CatalogState,
) -> axum::Router
where
    S: LeadSubmitter + 'static,
{
    let cars = axum::Router::new()
        .route(
            "/api/v1/cars/:model_slug",
            axum::routing::get(car_page_endpoint),
        )
        .route(
            "/api/v1/cars/:model_slug/quote",
            axum::routing::post(quote_endpoint),
        )
        .with_state(catalog);

    lead_router(leads)
        .merge(cars)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
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

pub(crate) async fn car_page_endpoint(
    State(catalog): State<CatalogState>,
    Path(model_slug): Path<String>,
    Query(selection): Query<Selection>,
) -> Response {
    match resolve_within(catalog.source.as_ref(), &model_slug, catalog.deadline).await {
        Ok(detail) => match build_page(&detail, &selection) {
            Ok(page) => Json(page).into_response(),
            Err(err) => {
                warn!(%model_slug, error = %err, "car page fees out of range");
                AppError::from(err).into_response()
            }
        },
        Err(CatalogError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, Json(UnavailablePage::default())).into_response()
        }
        Err(err) => {
            warn!(%model_slug, error = %err, "car page unavailable");
            AppError::from(err).into_response()
        }
    }
}

pub(crate) async fn quote_endpoint(
    State(catalog): State<CatalogState>,
    Path(model_slug): Path<String>,
    Json(payload): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    let QuoteRequest {
        trim_code,
        exterior_code,
        interior_code,
        fees_csv,
    } = payload;

    let detail = resolve_within(catalog.source.as_ref(), &model_slug, catalog.deadline).await?;

    let (schedule, fee_source) = match fees_csv {
        Some(csv) => {
            let schedule = FeeScheduleImporter::from_reader(Cursor::new(csv.into_bytes()))?;
            (Some(schedule), FeeSource::Imported)
        }
        None => (None, FeeSource::Catalog),
    };

    let selection = Selection {
        trim_code,
        exterior_code,
        interior_code,
    };
    let quote = build_quote(&detail, &selection, schedule.as_ref())?;

    let currency = quote
        .price
        .as_ref()
        .map(|price| price.currency)
        .unwrap_or_default();

    Ok(Json(QuoteResponse {
        fee_source,
        price_label: format_currency(quote.display_price(), currency),
        on_road_label: format_currency(quote.on_road.as_ref().map(|estimate| estimate.total), currency),
        quote,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use showroom::catalog::StaticCatalog;
    use showroom::leads::SimulatedLeadSubmitter;
    use std::time::Duration;
    use tower::ServiceExt;

    fn catalog_state() -> CatalogState {
        let catalog = StaticCatalog::bundled().expect("bundled data parses");
        CatalogState::new(Arc::new(catalog))
    }

    async fn read_json_body(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn quote_endpoint_uses_catalog_fees_by_default() {
        let request = QuoteRequest {
            trim_code: Some("vf8-plus".to_string()),
            exterior_code: Some("crimson-red".to_string()),
            ..QuoteRequest::default()
        };

        let Json(body) = quote_endpoint(
            State(catalog_state()),
            Path("vf8".to_string()),
            Json(request),
        )
        .await
        .expect("quote builds");

        assert_eq!(body.fee_source, FeeSource::Catalog);
        assert_eq!(body.price_label, "1.290.000.000\u{a0}₫");
        assert_eq!(body.quote.selection.interior_code.as_deref(), Some("black-vegan"));
        assert!(body.quote.on_road.is_some());
    }

    #[tokio::test]
    async fn quote_endpoint_applies_posted_fee_schedule() {
        let request = QuoteRequest {
            fees_csv: Some(
                "Label,Formula,Value,Tooltip\nRegistration tax,percentOfBase,10%,\n".to_string(),
            ),
            ..QuoteRequest::default()
        };

        let Json(body) = quote_endpoint(
            State(catalog_state()),
            Path("vf-8".to_string()),
            Json(request),
        )
        .await
        .expect("quote builds");

        assert_eq!(body.fee_source, FeeSource::Imported);
        let on_road = body.quote.on_road.expect("estimate computed");
        assert_eq!(on_road.fees.len(), 1);
        assert_eq!(body.on_road_label, "1.199.000.000\u{a0}₫");
    }

    #[tokio::test]
    async fn quote_endpoint_rejects_bad_fee_schedule() {
        let request = QuoteRequest {
            fees_csv: Some("Label,Formula,Value,Tooltip\nPlate,flat,100,\n".to_string()),
            ..QuoteRequest::default()
        };

        let err = quote_endpoint(State(catalog_state()), Path("vf8".to_string()), Json(request))
            .await
            .expect_err("unknown formula rejected");

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn quote_endpoint_refuses_fees_beyond_decimal_range() {
        let app = with_showroom_routes(
            Arc::new(LeadService::new(Arc::new(SimulatedLeadSubmitter::new(
                Duration::ZERO,
            )))),
            catalog_state(),
        );
        let payload = json!({
            "trimCode": "vf8-plus",
            "feesCsv": "Label,Formula,Value,Tooltip\nTax,percentOfBase,79228162514264337593543950335,\n",
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/cars/vf8/quote")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json_body(response).await;
        assert!(body["error"]
            .as_str()
            .expect("error string")
            .contains("Tax"));
    }

    #[tokio::test]
    async fn unknown_model_renders_unavailable_state() {
        let app = with_showroom_routes(
            Arc::new(LeadService::new(Arc::new(SimulatedLeadSubmitter::new(
                Duration::ZERO,
            )))),
            catalog_state(),
        );

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/cars/vf-99")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = read_json_body(response).await;
        assert_eq!(body["message"], "Car detail unavailable");
        assert_eq!(body["recovery_href"], "/");
    }

    #[tokio::test]
    async fn car_page_follows_query_selection() {
        let app = with_showroom_routes(
            Arc::new(LeadService::new(Arc::new(SimulatedLeadSubmitter::new(
                Duration::ZERO,
            )))),
            catalog_state(),
        );

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/cars/vf8?trimCode=vf8-plus&exteriorCode=unknown")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["quote"]["selection"]["trimCode"], "vf8-plus");
        assert_eq!(body["quote"]["selection"]["exteriorCode"], "jet-black");
        assert_eq!(body["mobile_cta"]["trim_name"], "VF 8 Plus");
    }
}
