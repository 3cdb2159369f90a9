//! Model reference data and the collaborator that serves it.
//!
//! Records are immutable once loaded; every selection made on the page is
//! resolved against the closed lists carried by a [`CarDetail`].

pub mod domain;
pub mod source;

use std::time::Duration;

use rust_decimal::Decimal;
use tracing::warn;

pub use domain::{
    Accessory, BasePriceSource, Brochure, CarDetail, CodeAxis, ColorOption, ColorPalette,
    ComparisonColumn, ComparisonRow, ComparisonSpec, Currency, FeatureItem, FeeFormula, FeeRule,
    MediaAsset, MediaKind, OnRoadCostSchema, PriceTag, Promotion, Seo, SpecItem, SpecSection, Trim,
};
pub use source::{CarDetailSource, StaticCatalog};

/// Failures raised while loading or resolving reference data.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("no car detail found for '{0}'")]
    NotFound(String),
    #[error("car detail for '{model_slug}' not resolved within {elapsed:?}")]
    Timeout {
        model_slug: String,
        elapsed: Duration,
    },
    #[error("duplicate {axis} code '{code}' in model '{model}'")]
    DuplicateCode {
        model: String,
        axis: CodeAxis,
        code: String,
    },
    #[error("negative amount {value} for '{item}' in model '{model}'")]
    NegativeAmount {
        model: String,
        item: String,
        value: Decimal,
    },
    #[error("'{item}' in model '{model}' is priced in {found}, expected {expected}")]
    CurrencyMismatch {
        model: String,
        item: String,
        expected: Currency,
        found: Currency,
    },
    #[error("failed to read catalog data: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog data: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }
}

/// Resolve a record, giving up once `deadline` elapses.
pub async fn resolve_within<S>(
    source: &S,
    model_slug: &str,
    deadline: Duration,
) -> Result<CarDetail, CatalogError>
where
    S: CarDetailSource + ?Sized,
{
    match tokio::time::timeout(deadline, source.resolve(model_slug)).await {
        Ok(result) => result,
        Err(_) => {
            warn!(model_slug, ?deadline, "car detail lookup timed out");
            Err(CatalogError::Timeout {
                model_slug: model_slug.to_string(),
                elapsed: deadline,
            })
        }
    }
}
