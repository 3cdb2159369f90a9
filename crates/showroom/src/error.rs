use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::leads::LeadFormError;
use crate::pricing::{FeeScheduleImportError, OnRoadError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Catalog(CatalogError),
    FeeSchedule(FeeScheduleImportError),
    Pricing(OnRoadError),
    Lead(LeadFormError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Catalog(err) => write!(f, "catalog error: {}", err),
            AppError::FeeSchedule(err) => write!(f, "fee schedule error: {}", err),
            AppError::Pricing(err) => write!(f, "pricing error: {}", err),
            AppError::Lead(err) => write!(f, "lead error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Catalog(err) => Some(err),
            AppError::FeeSchedule(err) => Some(err),
            AppError::Pricing(err) => Some(err),
            AppError::Lead(err) => Some(err),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Catalog(CatalogError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Catalog(CatalogError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            AppError::FeeSchedule(_) | AppError::Pricing(_) => StatusCode::BAD_REQUEST,
            AppError::Lead(LeadFormError::Invalid(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Lead(LeadFormError::AlreadySubmitting) => StatusCode::CONFLICT,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<CatalogError> for AppError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

impl From<LeadFormError> for AppError {
    fn from(value: LeadFormError) -> Self {
        Self::Lead(value)
    }
}

impl From<OnRoadError> for AppError {
    fn from(value: OnRoadError) -> Self {
        Self::Pricing(value)
    }
}

impl From<FeeScheduleImportError> for AppError {
    fn from(value: FeeScheduleImportError) -> Self {
        Self::FeeSchedule(value)
    }
}
