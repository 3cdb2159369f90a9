use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use super::domain::{CarDetail, Promotion};
use super::CatalogError;

const BUNDLED_CATALOG: &str = include_str!("../../data/car-detail.mock.json");

/// Read-only provider of model detail records.
#[async_trait::async_trait]
pub trait CarDetailSource: Send + Sync {
    async fn resolve(&self, model_slug: &str) -> Result<CarDetail, CatalogError>;

    async fn promotions(&self, model_slug: &str) -> Result<Vec<Promotion>, CatalogError> {
        let detail = self.resolve(model_slug).await?;
        Ok(detail.promotions)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Many(Vec<CarDetail>),
    One(Box<CarDetail>),
}

impl CatalogFile {
    fn into_records(self) -> Vec<CarDetail> {
        match self {
            CatalogFile::Many(records) => records,
            CatalogFile::One(record) => vec![*record],
        }
    }
}

/// In-process catalog backed by JSON reference data, with a simulated fetch latency.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    records: Vec<CarDetail>,
    latency: Duration,
}

impl StaticCatalog {
    pub fn new(records: Vec<CarDetail>) -> Result<Self, CatalogError> {
        for record in &records {
            record.validate()?;
        }
        Ok(Self {
            records,
            latency: Duration::ZERO,
        })
    }

    /// The mock record shipped with the crate.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_reader(BUNDLED_CATALOG.as_bytes())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_reader(reader)?;
        Self::new(file.into_records())
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn records(&self) -> &[CarDetail] {
        &self.records
    }
}

#[async_trait::async_trait]
impl CarDetailSource for StaticCatalog {
    async fn resolve(&self, model_slug: &str) -> Result<CarDetail, CatalogError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let detail = self
            .records
            .iter()
            .find(|record| record.matches_slug(model_slug))
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(model_slug.to_string()))?;

        debug!(model = %detail.id, "resolved car detail");
        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Currency;

    #[tokio::test]
    async fn bundled_catalog_resolves_by_id_and_model_name() {
        let catalog = StaticCatalog::bundled().expect("bundled data parses");

        let by_id = catalog.resolve("vf8").await.expect("resolves by id");
        let by_name = catalog
            .resolve("vf-8")
            .await
            .expect("resolves by slugified name");
        assert_eq!(by_id.id, by_name.id);
        assert!(!by_id.trims.is_empty());
        assert!(by_id.on_road_cost_schema.is_some());
    }

    #[tokio::test]
    async fn unknown_slug_is_not_found() {
        let catalog = StaticCatalog::bundled().expect("bundled data parses");

        match catalog.resolve("vf-99").await {
            Err(CatalogError::NotFound(slug)) => assert_eq!(slug, "vf-99"),
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn promotions_default_to_record_promotions() {
        let catalog = StaticCatalog::bundled().expect("bundled data parses");
        let promotions = catalog.promotions("vf-8").await.expect("promotions");
        assert!(!promotions.is_empty());
    }

    #[test]
    fn rejects_duplicate_trim_codes() {
        let raw = r#"{
            "id": "dup",
            "brand": "VinFast",
            "modelName": "Dup",
            "shortDescription": "",
            "heroMedia": { "type": "image", "url": "/hero.jpg" },
            "trims": [
                { "code": "eco", "name": "Eco", "price": { "currency": "VND", "value": 1 } },
                { "code": "eco", "name": "Eco again", "price": { "currency": "VND", "value": 2 } }
            ],
            "colors": { "exterior": [], "interior": [] }
        }"#;

        match StaticCatalog::from_reader(raw.as_bytes()) {
            Err(CatalogError::DuplicateCode { code, .. }) => assert_eq!(code, "eco"),
            other => panic!("expected duplicate code error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_negative_surcharges() {
        let raw = r#"[{
            "id": "neg",
            "brand": "VinFast",
            "modelName": "Neg",
            "shortDescription": "",
            "heroMedia": { "type": "image", "url": "/hero.jpg" },
            "trims": [],
            "colors": {
                "exterior": [
                    { "code": "red", "name": "Red", "price": { "currency": "VND", "value": -5 } }
                ],
                "interior": []
            }
        }]"#;

        assert!(matches!(
            StaticCatalog::from_reader(raw.as_bytes()),
            Err(CatalogError::NegativeAmount { .. })
        ));
    }

    #[test]
    fn rejects_colors_priced_in_another_currency() {
        let raw = r#"{
            "id": "mixed",
            "brand": "VinFast",
            "modelName": "Mixed",
            "shortDescription": "",
            "heroMedia": { "type": "image", "url": "/hero.jpg" },
            "trims": [
                { "code": "eco", "name": "Eco", "price": { "currency": "VND", "value": 1000000000 } }
            ],
            "colors": {
                "exterior": [
                    { "code": "red", "name": "Red", "price": { "currency": "USD", "value": 500 } }
                ],
                "interior": []
            }
        }"#;

        match StaticCatalog::from_reader(raw.as_bytes()) {
            Err(CatalogError::CurrencyMismatch {
                item,
                expected,
                found,
                ..
            }) => {
                assert_eq!(item, "red");
                assert_eq!(expected, Currency::Vnd);
                assert_eq!(found, Currency::Usd);
            }
            other => panic!("expected currency mismatch, got {other:?}"),
        }
    }

    #[test]
    fn rejects_trims_priced_in_different_currencies() {
        let raw = r#"{
            "id": "mixed",
            "brand": "VinFast",
            "modelName": "Mixed",
            "shortDescription": "",
            "heroMedia": { "type": "image", "url": "/hero.jpg" },
            "trims": [
                { "code": "eco", "name": "Eco", "price": { "currency": "VND", "value": 1000000000 } },
                { "code": "plus", "name": "Plus", "price": { "currency": "USD", "value": 45000 } }
            ],
            "colors": { "exterior": [], "interior": [] }
        }"#;

        assert!(matches!(
            StaticCatalog::from_reader(raw.as_bytes()),
            Err(CatalogError::CurrencyMismatch { ref item, .. }) if item == "plus"
        ));
    }
}
