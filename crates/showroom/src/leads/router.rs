use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::form::{FAILURE_NOTICE, SUCCESS_NOTICE};
use super::service::{LeadRequest, LeadService, LeadServiceError};
use super::submission::{LeadSubmitter, SubmissionError};

/// Router exposing lead intake.
pub fn lead_router<S>(service: Arc<LeadService<S>>) -> Router
where
    S: LeadSubmitter + 'static,
{
    Router::new()
        .route("/api/v1/leads", post(submit_handler::<S>))
        .with_state(service)
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<LeadService<S>>>,
    axum::Json(request): axum::Json<LeadRequest>,
) -> Response
where
    S: LeadSubmitter + 'static,
{
    match service.submit(request).await {
        Ok(ack) => {
            let payload = json!({
                "lead_id": ack.lead_id.0,
                "received_at": ack.received_at,
                "message": SUCCESS_NOTICE,
            });
            (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
        }
        Err(LeadServiceError::Validation(errors)) => {
            let fields: BTreeMap<&str, &str> = errors
                .iter()
                .map(|(field, error)| (field.key(), error.message()))
                .collect();
            let payload = json!({
                "error": "validation failed",
                "fields": fields,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(LeadServiceError::Submission(error)) => {
            let status = match error {
                SubmissionError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                SubmissionError::Rejected(_) | SubmissionError::Transport(_) => {
                    StatusCode::BAD_GATEWAY
                }
            };
            let payload = json!({
                "error": FAILURE_NOTICE,
                "detail": error.to_string(),
            });
            (status, axum::Json(payload)).into_response()
        }
    }
}
