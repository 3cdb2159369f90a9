use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CatalogError;
use crate::format::slugify;

/// Full reference record backing a single model detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarDetail {
    pub id: String,
    pub brand: String,
    pub model_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_year: Option<u16>,
    pub short_description: String,
    pub hero_media: MediaAsset,
    pub trims: Vec<Trim>,
    pub colors: ColorPalette,
    #[serde(default)]
    pub media: Vec<MediaAsset>,
    #[serde(default)]
    pub specifications: Vec<SpecSection>,
    #[serde(default)]
    pub key_features: Vec<FeatureItem>,
    #[serde(default)]
    pub promotions: Vec<Promotion>,
    #[serde(default)]
    pub accessories: Vec<Accessory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_road_cost_schema: Option<OnRoadCostSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparisons: Option<ComparisonSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brochure: Option<Brochure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<Seo>,
}

impl CarDetail {
    pub fn trim(&self, code: &str) -> Option<&Trim> {
        self.trims.iter().find(|trim| trim.code == code)
    }

    pub fn exterior(&self, code: &str) -> Option<&ColorOption> {
        self.colors.exterior.iter().find(|color| color.code == code)
    }

    pub fn interior(&self, code: &str) -> Option<&ColorOption> {
        self.colors.interior.iter().find(|color| color.code == code)
    }

    /// A slug addresses a record either by id or by its slugified model name.
    pub fn matches_slug(&self, model_slug: &str) -> bool {
        self.id == model_slug || slugify(&self.model_name) == model_slug
    }

    /// Currency every price in the record is quoted in, taken from the first trim.
    pub fn currency(&self) -> Option<Currency> {
        self.trims.first().map(|trim| trim.price.currency)
    }

    pub fn page_title(&self) -> String {
        self.seo
            .as_ref()
            .and_then(|seo| seo.title.clone())
            .unwrap_or_else(|| format!("{} {}", self.brand, self.model_name))
    }

    /// Reject records whose codes collide, whose amounts are negative, or
    /// whose prices are quoted in more than one currency.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let currency = self.currency().unwrap_or_default();
        let mut trim_codes = HashSet::new();
        for trim in &self.trims {
            if !trim_codes.insert(trim.code.as_str()) {
                return Err(CatalogError::DuplicateCode {
                    model: self.id.clone(),
                    axis: CodeAxis::Trim,
                    code: trim.code.clone(),
                });
            }
            ensure_non_negative(&self.id, &trim.code, trim.price.value)?;
            ensure_currency(&self.id, &trim.code, currency, trim.price.currency)?;
        }

        for (axis, options) in [
            (CodeAxis::Exterior, &self.colors.exterior),
            (CodeAxis::Interior, &self.colors.interior),
        ] {
            let mut seen = HashSet::new();
            for color in options {
                if !seen.insert(color.code.as_str()) {
                    return Err(CatalogError::DuplicateCode {
                        model: self.id.clone(),
                        axis,
                        code: color.code.clone(),
                    });
                }
                if let Some(price) = &color.price {
                    ensure_non_negative(&self.id, &color.code, price.value)?;
                    ensure_currency(&self.id, &color.code, currency, price.currency)?;
                }
            }
        }

        if let Some(schema) = &self.on_road_cost_schema {
            for fee in &schema.fees {
                ensure_non_negative(&self.id, &fee.label, fee.value)?;
            }
        }

        for accessory in &self.accessories {
            if let Some(price) = accessory.price {
                ensure_non_negative(&self.id, &accessory.name, price)?;
            }
        }

        Ok(())
    }
}

fn ensure_non_negative(model: &str, item: &str, value: Decimal) -> Result<(), CatalogError> {
    if value < Decimal::ZERO {
        return Err(CatalogError::NegativeAmount {
            model: model.to_string(),
            item: item.to_string(),
            value,
        });
    }
    Ok(())
}

fn ensure_currency(
    model: &str,
    item: &str,
    expected: Currency,
    found: Currency,
) -> Result<(), CatalogError> {
    if expected != found {
        return Err(CatalogError::CurrencyMismatch {
            model: model.to_string(),
            item: item.to_string(),
            expected,
            found,
        });
    }
    Ok(())
}

/// Which closed list a reference code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeAxis {
    Trim,
    Exterior,
    Interior,
}

impl CodeAxis {
    pub const fn label(self) -> &'static str {
        match self {
            CodeAxis::Trim => "trim",
            CodeAxis::Exterior => "exterior color",
            CodeAxis::Interior => "interior color",
        }
    }
}

impl std::fmt::Display for CodeAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Currencies the reference data may quote prices in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Vnd,
    Usd,
}

impl Currency {
    /// Digits after the decimal separator for the smallest unit in circulation.
    pub const fn minor_units(self) -> u32 {
        match self {
            Currency::Vnd => 0,
            Currency::Usd => 2,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Currency::Vnd => "VND",
            Currency::Usd => "USD",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTag {
    #[serde(default)]
    pub currency: Currency,
    pub value: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAsset {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
}

/// Purchasable configuration tier of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trim {
    pub code: String,
    pub name: String,
    pub price: PriceTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub powertrain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transmission: Option<String>,
    #[serde(
        default,
        rename = "rangeWLTPKm",
        skip_serializing_if = "Option::is_none"
    )]
    pub range_wltp_km: Option<u32>,
    #[serde(default, rename = "zeroTo100", skip_serializing_if = "Option::is_none")]
    pub zero_to_100: Option<f32>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub highlight_features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorOption {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceTag>,
}

impl ColorOption {
    /// Surcharge for choosing this color; absent means included at no cost.
    pub fn surcharge(&self) -> Decimal {
        self.price
            .as_ref()
            .map(|price| price.value)
            .unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorPalette {
    #[serde(default)]
    pub exterior: Vec<ColorOption>,
    #[serde(default)]
    pub interior: Vec<ColorOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecItem {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecSection {
    pub title: String,
    pub items: Vec<SpecItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub title: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accessory {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// How a fee's amount derives from the schedule value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeeFormula {
    Fixed,
    PercentOfBase,
}

impl FeeFormula {
    pub const fn label(self) -> &'static str {
        match self {
            FeeFormula::Fixed => "fixed",
            FeeFormula::PercentOfBase => "percentOfBase",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeRule {
    pub label: String,
    pub formula: FeeFormula,
    pub value: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BasePriceSource {
    #[default]
    SelectedTrim,
}

/// Named fee schedule applied on top of the vehicle price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnRoadCostSchema {
    #[serde(default)]
    pub base_price_source: BasePriceSource,
    pub fees: Vec<FeeRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonColumn {
    pub trim_code: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub label: String,
    pub values: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSpec {
    pub columns: Vec<ComparisonColumn>,
    pub rows: Vec<ComparisonRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brochure {
    pub pdf_url: String,
    #[serde(default, rename = "sizeMB", skip_serializing_if = "Option::is_none")]
    pub size_mb: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
}
